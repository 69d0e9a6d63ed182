//! HTTP API: session-scoped storefront over axum.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
