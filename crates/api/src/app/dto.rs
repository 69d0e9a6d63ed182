use serde::{Deserialize, Serialize};

use inkshop_core::{Money, SessionId};
use inkshop_events::EventEnvelope;
use inkshop_shop::{Item, ItemName, Selection, StorefrontEvent};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    /// Checkbox state keyed by item name; omitted means nothing selected.
    #[serde(default)]
    pub selection: Selection,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: SessionId,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub items: Vec<Item>,
    pub version: u64,
}

#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub message: String,
    pub purchased: Vec<ItemName>,
    pub total: Money,
    /// Catalog after the purchase, so the UI can re-render without a second call.
    pub catalog: Vec<Item>,
}

#[derive(Debug, Serialize)]
pub struct PurchasesResponse {
    pub purchased: Vec<ItemName>,
    pub spent: Money,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub events: Vec<EventEnvelope<StorefrontEvent>>,
}
