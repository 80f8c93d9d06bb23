//! In-process session store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use super::model::{Session, SessionSnapshot};
use super::traits::{SessionGuard, SessionStore};
use crate::error::IntakeError;

/// Sessions held in memory for the life of the process.
///
/// The map lock is only held to insert or look up an entry; each session has
/// its own mutex so turns on different sessions never wait on each other.
/// Entries are never evicted.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self) -> String {
        let mut sessions = self.sessions.write().await;
        let mut id = Uuid::new_v4().to_string();
        while sessions.contains_key(&id) {
            id = Uuid::new_v4().to_string();
        }
        sessions.insert(id.clone(), Arc::new(Mutex::new(Session::new(id.clone()))));
        info!(session_id = %id, live = sessions.len(), "Session created");
        id
    }

    async fn checkout(&self, id: &str) -> Result<SessionGuard, IntakeError> {
        let entry = {
            let sessions = self.sessions.read().await;
            sessions.get(id).cloned()
        };
        match entry {
            Some(session) => Ok(session.lock_owned().await),
            None => {
                debug!(session_id = %id, "Unknown session");
                Err(IntakeError::InvalidSession { id: id.to_string() })
            }
        }
    }

    async fn snapshot(&self, id: &str) -> Option<SessionSnapshot> {
        let entry = {
            let sessions = self.sessions.read().await;
            sessions.get(id).cloned()
        }?;
        let session = entry.lock().await;
        Some(session.snapshot())
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
