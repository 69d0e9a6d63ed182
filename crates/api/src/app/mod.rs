//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: session store, per-session state, realtime channel
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use crate::config::Config;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &Config) -> Router {
    let services = Arc::new(services::AppServices::new(config));

    // Session-scoped routes: require a live `x-session-id`.
    let scoped = routes::router().layer(axum::middleware::from_fn_with_state(
        services.clone(),
        middleware::session_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/sessions", post(routes::sessions::create_session))
        .merge(scoped)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
