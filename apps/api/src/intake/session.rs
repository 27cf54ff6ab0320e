//! Per-upload session context: the extracted profile waiting for a save
//! decision. Replaces process-global "current record" state.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::profile::models::Profile;

#[derive(Debug, Clone)]
pub struct PendingProfile {
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
    /// Set once a save hit an existing email; cleared only by resolve/discard.
    pub awaiting_decision: bool,
}

/// Result of claiming a session for its duplicate decision.
#[derive(Debug)]
pub enum Claim {
    /// Removed from the store; the caller now owns the decision.
    Claimed(PendingProfile),
    /// Live, but no duplicate is pending. Left in place.
    NotAwaiting,
    Missing,
}

/// Live sessions keyed by id. Expired sessions are pruned on every access.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, PendingProfile>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn create(&self, profile: Profile) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.inner.lock().await;
        self.prune(&mut sessions);
        sessions.insert(
            id,
            PendingProfile {
                profile,
                created_at: Utc::now(),
                awaiting_decision: false,
            },
        );
        debug!("Session {id} created ({} live)", sessions.len());
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<PendingProfile> {
        let mut sessions = self.inner.lock().await;
        self.prune(&mut sessions);
        sessions.get(&id).cloned()
    }

    /// Returns `false` if the session no longer exists.
    pub async fn mark_awaiting_decision(&self, id: Uuid) -> bool {
        let mut sessions = self.inner.lock().await;
        self.prune(&mut sessions);
        match sessions.get_mut(&id) {
            Some(s) => {
                s.awaiting_decision = true;
                true
            }
            None => false,
        }
    }

    pub async fn remove(&self, id: Uuid) -> Option<PendingProfile> {
        let mut sessions = self.inner.lock().await;
        self.prune(&mut sessions);
        let removed = sessions.remove(&id);
        if removed.is_some() {
            debug!("Session {id} closed");
        }
        removed
    }

    /// Atomically removes a session awaiting a duplicate decision, so only one
    /// caller can resolve it.
    pub async fn claim_decision(&self, id: Uuid) -> Claim {
        let mut sessions = self.inner.lock().await;
        self.prune(&mut sessions);
        match sessions.get(&id) {
            None => Claim::Missing,
            Some(s) if !s.awaiting_decision => Claim::NotAwaiting,
            Some(_) => match sessions.remove(&id) {
                Some(pending) => Claim::Claimed(pending),
                None => Claim::Missing,
            },
        }
    }

    /// Puts a claimed session back after its decision failed to apply.
    pub async fn restore(&self, id: Uuid, pending: PendingProfile) {
        let mut sessions = self.inner.lock().await;
        sessions.insert(id, pending);
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        let mut sessions = self.inner.lock().await;
        self.prune(&mut sessions);
        sessions.len()
    }

    fn prune(&self, sessions: &mut HashMap<Uuid, PendingProfile>) {
        let now = Utc::now();
        sessions.retain(|_, s| now - s.created_at < self.ttl);
    }
}
