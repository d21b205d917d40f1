//! Device-local session context.
//!
//! The screen never touches storage directly; it is handed a
//! [`SessionContext`] so tests can substitute an in-memory store.

mod file;
mod memory;

use crate::error::SessionError;
use crate::models::UserMetadata;
use async_trait::async_trait;
use secrecy::Secret;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

/// A logged-in session: bearer token plus the metadata stored at login.
#[derive(Debug)]
pub struct StoredSession {
    pub token: Secret<String>,
    pub metadata: Option<UserMetadata>,
}

impl StoredSession {
    pub fn new(token: impl Into<String>, metadata: Option<UserMetadata>) -> Self {
        Self {
            token: Secret::new(token.into()),
            metadata,
        }
    }
}

#[async_trait]
pub trait SessionContext: Send + Sync {
    /// Current session, or `None` when logged out.
    async fn get(&self) -> Result<Option<StoredSession>, SessionError>;

    /// Persist a session, replacing any existing one.
    async fn store(&self, session: StoredSession) -> Result<(), SessionError>;

    /// Remove token and metadata. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<(), SessionError>;
}
