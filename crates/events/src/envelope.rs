use serde::{Deserialize, Serialize};
use uuid::Uuid;

use inkshop_core::SessionId;

use crate::Event;

/// Envelope for an event, containing session + stream metadata.
///
/// - Every session owns exactly one stream; `session_id` names it.
/// - `sequence_number` starts at 1 and increases by one per event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    session_id: SessionId,
    event_type: String,
    sequence_number: u64,
    payload: E,
}

impl<E: Event> EventEnvelope<E> {
    /// Wrap `payload` as the `sequence_number`-th event of the session stream.
    pub fn seal(session_id: SessionId, sequence_number: u64, payload: E) -> Self {
        Self::new(
            Uuid::now_v7(),
            session_id,
            payload.event_type(),
            sequence_number,
            payload,
        )
    }
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        session_id: SessionId,
        event_type: impl Into<String>,
        sequence_number: u64,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            session_id,
            event_type: event_type.into(),
            sequence_number,
            payload,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}
