use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::{dto, errors, services::AppServices};
use crate::context::SessionContext;

pub async fn create_session(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let session_id = match services.sessions().create() {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "session not created");
            return errors::domain_error_to_response(e);
        }
    };

    tracing::info!(%session_id, open_sessions = services.sessions().len(), "session created");

    (
        StatusCode::CREATED,
        Json(dto::SessionCreatedResponse { session_id }),
    )
        .into_response()
}

pub async fn end_session(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> StatusCode {
    let session_id = session.session_id();
    if services.sessions().remove(session_id) {
        tracing::info!(%session_id, "session ended");
    }
    StatusCode::NO_CONTENT
}
