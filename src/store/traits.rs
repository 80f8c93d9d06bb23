//! `SessionStore` trait: the single seam between the dialogue pipeline and
//! session persistence.

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use super::model::{Session, SessionSnapshot};
use crate::error::IntakeError;

/// Exclusive handle on one session. Holding it serialises every
/// read-modify-write of that session; other sessions are unaffected.
pub type SessionGuard = OwnedMutexGuard<Session>;

/// Keyed session storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create an empty session and return its id.
    async fn create(&self) -> String;

    /// Lock a session for the duration of one turn.
    async fn checkout(&self, id: &str) -> Result<SessionGuard, IntakeError>;

    /// Copy of a session's current state, if it exists.
    async fn snapshot(&self, id: &str) -> Option<SessionSnapshot>;

    /// Number of live sessions.
    async fn len(&self) -> usize;
}
