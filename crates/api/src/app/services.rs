use std::{
    collections::HashMap,
    convert::Infallible,
    sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock},
    time::{Duration, Instant},
};

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

use inkshop_core::{DomainError, DomainResult, SessionId};
use inkshop_events::EventEnvelope;
use inkshop_shop::{Catalog, PurchaseReceipt, Selection, Storefront, StorefrontEvent};

use crate::config::Config;

/// Notification fanned out to `/stream` subscribers of one session.
#[derive(Debug, Clone, Serialize)]
pub struct RealtimeMessage {
    pub session_id: SessionId,
    pub topic: String,
    pub payload: serde_json::Value,
}

/// One visitor's storefront plus the events it has committed.
#[derive(Debug)]
pub struct Session {
    storefront: Storefront,
    history: Vec<EventEnvelope<StorefrontEvent>>,
}

impl Session {
    pub fn new(storefront: Storefront) -> Self {
        Self {
            storefront,
            history: Vec::new(),
        }
    }

    pub fn storefront(&self) -> &Storefront {
        &self.storefront
    }

    pub fn history(&self) -> &[EventEnvelope<StorefrontEvent>] {
        &self.history
    }

    /// Run a purchase and record the resulting events in the session stream.
    pub fn purchase(
        &mut self,
        selection: &Selection,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<PurchaseReceipt> {
        let receipt = self.storefront.purchase(selection, occurred_at)?;
        let session_id = self.storefront.session_id();
        for event in &receipt.events {
            let sequence_number = self.history.len() as u64 + 1;
            self.history
                .push(EventEnvelope::seal(session_id, sequence_number, event.clone()));
        }
        Ok(receipt)
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// Lock a session for the duration of one read or purchase.
///
/// Session operations never panic mid-update, so a poisoned lock still holds
/// consistent state.
pub fn lock(handle: &SessionHandle) -> MutexGuard<'_, Session> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct SessionEntry {
    handle: SessionHandle,
    last_seen: Mutex<Instant>,
}

impl SessionEntry {
    fn is_idle(&self, now: Instant, idle_timeout: Duration) -> bool {
        let last_seen = *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner);
        now.saturating_duration_since(last_seen) > idle_timeout
    }
}

/// Live sessions, each with its own independent storefront.
///
/// A session unused for longer than `idle_timeout` is gone: lookups no longer
/// find it and it stops counting towards `max_sessions`.
#[derive(Debug)]
pub struct SessionStore {
    inner: RwLock<HashMap<SessionId, SessionEntry>>,
    seed: Catalog,
    max_sessions: usize,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(seed: Catalog, max_sessions: usize, idle_timeout: Duration) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            seed,
            max_sessions,
            idle_timeout,
        }
    }

    /// Open a new session seeded with a fresh copy of the catalog.
    pub fn create(&self) -> DomainResult<SessionId> {
        self.create_at(Instant::now())
    }

    /// Resolve a live session and mark it as used.
    pub fn get(&self, session_id: SessionId) -> Option<SessionHandle> {
        self.get_at(session_id, Instant::now())
    }

    /// Returns `false` if the session did not exist.
    pub fn remove(&self, session_id: SessionId) -> bool {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.remove(&session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn create_at(&self, now: Instant) -> DomainResult<SessionId> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        self.evict_idle_locked(&mut map, now);
        if map.len() >= self.max_sessions {
            return Err(DomainError::conflict(format!(
                "session limit reached ({})",
                self.max_sessions
            )));
        }

        let session_id = SessionId::new();
        let storefront = Storefront::open(session_id, self.seed.clone());
        map.insert(
            session_id,
            SessionEntry {
                handle: Arc::new(Mutex::new(Session::new(storefront))),
                last_seen: Mutex::new(now),
            },
        );
        Ok(session_id)
    }

    fn get_at(&self, session_id: SessionId, now: Instant) -> Option<SessionHandle> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let entry = map.get(&session_id)?;
        if entry.is_idle(now, self.idle_timeout) {
            return None;
        }
        *entry.last_seen.lock().unwrap_or_else(PoisonError::into_inner) = now;
        Some(entry.handle.clone())
    }

    fn evict_idle_locked(&self, map: &mut HashMap<SessionId, SessionEntry>, now: Instant) {
        let before = map.len();
        map.retain(|_, entry| !entry.is_idle(now, self.idle_timeout));
        let evicted = before - map.len();
        if evicted > 0 {
            tracing::info!(evicted, open_sessions = map.len(), "idle sessions evicted");
        }
    }
}

pub struct AppServices {
    sessions: SessionStore,
    currency: String,
    realtime_tx: broadcast::Sender<RealtimeMessage>,
}

impl AppServices {
    pub fn new(config: &Config) -> Self {
        // Realtime channel (SSE): lossy broadcast, session-filtered in handlers.
        let (realtime_tx, _realtime_rx) = broadcast::channel::<RealtimeMessage>(256);

        Self {
            sessions: SessionStore::new(
                config.catalog.clone(),
                config.max_sessions,
                config.session_idle_timeout,
            ),
            currency: config.currency.clone(),
            realtime_tx,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn realtime_tx(&self) -> &broadcast::Sender<RealtimeMessage> {
        &self.realtime_tx
    }

    /// Broadcast to the session's subscribers (lossy; dropped if nobody listens).
    pub fn publish(&self, session_id: SessionId, topic: &str, payload: serde_json::Value) {
        let _ = self.realtime_tx.send(RealtimeMessage {
            session_id,
            topic: topic.to_string(),
            payload,
        });
    }
}

pub fn session_sse_stream(
    services: Arc<AppServices>,
    session_id: SessionId,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.realtime_tx().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(move |msg| match msg {
        Ok(m) if m.session_id == session_id => {
            let data = serde_json::to_string(&m.payload).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event(m.topic).data(data)))
        }
        _ => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
