use super::{SessionContext, StoredSession};
use crate::error::SessionError;
use crate::models::UserMetadata;
use async_trait::async_trait;
use secrecy::ExposeSecret;
use tokio::sync::RwLock;

/// Process-local session store.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: RwLock<Option<(String, Option<UserMetadata>)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: StoredSession) -> Self {
        Self {
            inner: RwLock::new(Some((
                session.token.expose_secret().clone(),
                session.metadata,
            ))),
        }
    }
}

#[async_trait]
impl SessionContext for MemorySessionStore {
    async fn get(&self) -> Result<Option<StoredSession>, SessionError> {
        let guard = self.inner.read().await;
        Ok(guard
            .as_ref()
            .map(|(token, metadata)| StoredSession::new(token.clone(), metadata.clone())))
    }

    async fn store(&self, session: StoredSession) -> Result<(), SessionError> {
        *self.inner.write().await = Some((session.token.expose_secret().clone(), session.metadata));
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        *self.inner.write().await = None;
        Ok(())
    }
}
