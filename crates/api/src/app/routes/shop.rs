use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    response::IntoResponse,
};
use chrono::Utc;
use inkshop_core::AggregateRoot;

use crate::app::{
    dto, errors,
    services::{self, AppServices, SessionHandle},
};
use crate::context::SessionContext;

pub async fn list_catalog(Extension(handle): Extension<SessionHandle>) -> Json<dto::CatalogResponse> {
    let session = services::lock(&handle);
    let storefront = session.storefront();
    Json(dto::CatalogResponse {
        items: storefront.catalog().items().to_vec(),
        version: storefront.version(),
    })
}

pub async fn purchase(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Extension(handle): Extension<SessionHandle>,
    body: Result<Json<dto::PurchaseRequest>, JsonRejection>,
) -> axum::response::Response {
    let session_id = session.session_id();
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!(%session_id, error = %rejection, "malformed purchase body");
            return errors::json_error(rejection.status(), "invalid_body", rejection.body_text());
        }
    };

    // Read selection, partition and write back under one lock.
    let result = {
        let mut guard = services::lock(&handle);
        guard.purchase(&body.selection, Utc::now()).map(|receipt| {
            let storefront = guard.storefront();
            (receipt, storefront.catalog().items().to_vec(), storefront.version())
        })
    };

    let (receipt, catalog, version) = match result {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(%session_id, error = %e, "purchase rejected");
            return errors::domain_error_to_response(e);
        }
    };

    if receipt.events.is_empty() {
        tracing::debug!(%session_id, "purchase with nothing selected");
    } else {
        tracing::info!(
            %session_id,
            items = receipt.purchased().len(),
            total = %receipt.total(),
            "purchase completed"
        );
        services.publish(
            session_id,
            "shop.catalog_updated",
            serde_json::json!({
                "kind": "catalog_updated",
                "purchased": receipt.purchased(),
                "remaining": catalog.len(),
                "version": version,
            }),
        );
    }

    Json(dto::PurchaseResponse {
        message: receipt.message(services.currency()),
        purchased: receipt.purchased().to_vec(),
        total: receipt.total(),
        catalog,
    })
    .into_response()
}

pub async fn list_purchases(
    Extension(handle): Extension<SessionHandle>,
) -> Json<dto::PurchasesResponse> {
    let session = services::lock(&handle);
    let storefront = session.storefront();
    Json(dto::PurchasesResponse {
        purchased: storefront.purchase_log().entries().to_vec(),
        spent: storefront.spent(),
    })
}

pub async fn history(Extension(handle): Extension<SessionHandle>) -> Json<dto::HistoryResponse> {
    let session = services::lock(&handle);
    Json(dto::HistoryResponse {
        events: session.history().to_vec(),
    })
}
