//! Bounded session store

use std::num::NonZeroUsize;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use lru::LruCache;
use tokio::sync::Mutex;

use super::{Role, SessionHandle, Turn};
use crate::config::SessionConfig;
use crate::{Error, Result};

struct Slot {
    session: SessionHandle,
    last_active: Instant,
    created_at: DateTime<Utc>,
}

impl Slot {
    fn age_secs(&self) -> i64 {
        (Utc::now() - self.created_at).num_seconds()
    }
}

/// Process-wide session store
///
/// The map lock is only held for lookups and bookkeeping, never while a
/// session lock is awaited.
pub struct SessionStore {
    slots: Mutex<LruCache<String, Slot>>,
    idle_ttl: Duration,
}

impl SessionStore {
    /// Create a store with the given bounds
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        let slots = NonZeroUsize::new(config.max_sessions)
            .map_or_else(LruCache::unbounded, LruCache::new);
        Self {
            slots: Mutex::new(slots),
            idle_ttl: config.idle_ttl,
        }
    }

    /// Idle past the ttl and not held by an in-flight request
    fn is_expired(&self, slot: &Slot, now: Instant) -> bool {
        now.duration_since(slot.last_active) > self.idle_ttl && !slot.session.is_busy()
    }

    /// Return the session for `id`, creating an empty one if needed
    ///
    /// Idempotent: repeated calls for the same live key return the same
    /// session. An idle-expired session is replaced by a fresh one.
    pub async fn ensure(&self, id: &str) -> SessionHandle {
        let now = Instant::now();
        let mut slots = self.slots.lock().await;

        if let Some(slot) = slots.get_mut(id) {
            if !self.is_expired(slot, now) {
                slot.last_active = now;
                return slot.session.clone();
            }
            tracing::debug!(
                session_id = id,
                age_secs = slot.age_secs(),
                "session idle past ttl, starting fresh"
            );
        }

        let session = SessionHandle::new(id);
        let slot = Slot {
            session: session.clone(),
            last_active: now,
            created_at: Utc::now(),
        };
        if let Some((evicted, old)) = slots.push(id.to_string(), slot)
            && evicted != id
        {
            tracing::info!(
                session_id = %evicted,
                age_secs = old.age_secs(),
                "session store full, evicted least recently used"
            );
        }
        tracing::debug!(session_id = id, sessions = slots.len(), "session created");

        session
    }

    /// Look up a live session without creating one
    pub async fn get(&self, id: &str) -> Option<SessionHandle> {
        let now = Instant::now();
        let mut slots = self.slots.lock().await;
        let slot = slots.get_mut(id)?;
        if self.is_expired(slot, now) {
            return None;
        }
        slot.last_active = now;
        Some(slot.session.clone())
    }

    /// Mark `session` as active now, if it is still the one stored under `id`
    pub async fn touch(&self, id: &str, session: &SessionHandle) {
        let mut slots = self.slots.lock().await;
        if let Some(slot) = slots.peek_mut(id)
            && slot.session.same_session(session)
        {
            slot.last_active = Instant::now();
        }
    }

    /// Append a turn to an existing session
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] if `id` has no live session
    pub async fn append_turn(&self, id: &str, role: Role, content: impl Into<String>) -> Result<()> {
        let session = self
            .get(id)
            .await
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        session.lock().await.push(role, content);
        Ok(())
    }

    /// Remove a session entirely
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] if `id` has no live session
    pub async fn end(&self, id: &str) -> Result<()> {
        let now = Instant::now();
        let removed = self.slots.lock().await.pop(id);

        match removed {
            Some(slot) if !self.is_expired(&slot, now) => {
                tracing::debug!(session_id = id, age_secs = slot.age_secs(), "session ended");
                Ok(())
            }
            _ => Err(Error::SessionNotFound(id.to_string())),
        }
    }

    /// Snapshot of a session's turns
    pub async fn transcript(&self, id: &str) -> Option<Vec<Turn>> {
        let session = {
            let slots = self.slots.lock().await;
            slots.peek(id).map(|slot| slot.session.clone())?
        };
        let turns = session.lock().await.turns().to_vec();
        Some(turns)
    }

    /// Whether a live session exists for `id`
    pub async fn contains(&self, id: &str) -> bool {
        let now = Instant::now();
        self.slots
            .lock()
            .await
            .peek(id)
            .is_some_and(|slot| !self.is_expired(slot, now))
    }

    /// Number of stored sessions (including idle ones not yet swept)
    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every session idle past the ttl, returning how many were removed
    pub async fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut slots = self.slots.lock().await;

        let expired: Vec<String> = slots
            .iter()
            .filter(|(_, slot)| self.is_expired(slot, now))
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            if let Some(slot) = slots.pop(id) {
                tracing::trace!(session_id = %id, age_secs = slot.age_secs(), "session expired");
            }
        }

        if !expired.is_empty() {
            tracing::debug!(evicted = expired.len(), remaining = slots.len(), "evicted idle sessions");
        }

        expired.len()
    }

    /// Periodically evict idle sessions until the store is dropped
    #[must_use]
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        let store: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(store) = store.upgrade() else {
                    break;
                };
                store.evict_idle().await;
            }
        })
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}
