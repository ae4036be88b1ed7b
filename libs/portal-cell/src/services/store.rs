use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::models::PortalError;
use crate::services::session::PortalSession;

pub type SessionHandle = Arc<Mutex<PortalSession>>;

struct StoredSession {
    handle: SessionHandle,
    touched: Instant,
}

/// In-memory portal sessions. Each session has its own mutex so events for
/// one customer are applied in order without blocking the others.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, StoredSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: PortalSession) -> SessionHandle {
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(
            id,
            StoredSession {
                handle: Arc::clone(&handle),
                touched: Instant::now(),
            },
        );
        debug!("Portal session {} opened", id);
        handle
    }

    /// Looks the session up and marks it as recently used.
    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, PortalError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or(PortalError::SessionNotFound(id))?;
        entry.touched = Instant::now();
        Ok(Arc::clone(&entry.handle))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), PortalError> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                debug!("Portal session {} closed", id);
                Ok(())
            }
            None => Err(PortalError::SessionNotFound(id)),
        }
    }

    /// Drops every session not looked up for at least `ttl`. Returns how
    /// many were dropped.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|id, entry| {
            let keep = entry.touched.elapsed() < ttl;
            if !keep {
                debug!("Portal session {} expired", id);
            }
            keep
        });

        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
