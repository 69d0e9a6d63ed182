use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use inkshop_core::SessionId;

use crate::app::{errors, services::AppServices};
use crate::context::SessionContext;

/// Header carrying the id returned by `POST /sessions`.
pub const SESSION_HEADER: &str = "x-session-id";

/// Resolve the request's session and expose it to handlers as extensions
/// (`SessionContext` + `SessionHandle`).
pub async fn session_middleware(
    State(services): State<Arc<AppServices>>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let session_id = extract_session_id(req.headers())?;

    let handle = services.sessions().get(session_id).ok_or_else(|| {
        tracing::warn!(%session_id, "request for unknown session");
        errors::json_error(StatusCode::NOT_FOUND, "unknown_session", "no such session")
    })?;

    req.extensions_mut().insert(SessionContext::new(session_id));
    req.extensions_mut().insert(handle);

    Ok(next.run(req).await)
}

fn extract_session_id(headers: &HeaderMap) -> Result<SessionId, Response> {
    let header = headers.get(SESSION_HEADER).ok_or_else(|| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "missing_session",
            format!("{SESSION_HEADER} header is required"),
        )
    })?;

    let raw = header.to_str().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "session id is not ASCII")
    })?;

    raw.parse().map_err(|e: inkshop_core::DomainError| {
        tracing::warn!(error = %e, "rejected malformed session id");
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string())
    })
}
