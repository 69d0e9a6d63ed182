use axum::{
    Router,
    routing::{delete, get, post},
};

pub mod sessions;
pub mod shop;
pub mod system;

/// Router for all session-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/catalog", get(shop::list_catalog))
        .route("/purchase", post(shop::purchase))
        .route("/purchases", get(shop::list_purchases))
        .route("/history", get(shop::history))
        .route("/stream", get(system::stream))
        .route("/sessions/current", delete(sessions::end_session))
}
