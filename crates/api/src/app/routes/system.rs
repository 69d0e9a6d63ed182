use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::sse::Event as SseEvent};

use crate::app::services::{self, AppServices};
use crate::context::SessionContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Server-sent catalog change notifications for the calling session.
pub async fn stream(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Sse<impl tokio_stream::Stream<Item = Result<SseEvent, std::convert::Infallible>>>
{
    services::session_sse_stream(services, session.session_id())
}
