use super::{SessionContext, StoredSession};
use crate::error::SessionError;
use crate::models::UserMetadata;
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// On-disk layout, keyed the same way as the mobile app's local storage.
#[derive(Serialize, Deserialize)]
struct SessionFile {
    auth_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_metadata: Option<UserMetadata>,
}

/// Session persisted as a JSON file.
///
/// The file is re-read on every `get` so a login performed by another
/// process is picked up without restarting.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionContext for FileSessionStore {
    async fn get(&self) -> Result<Option<StoredSession>, SessionError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let file: SessionFile = serde_json::from_slice(&raw)?;
        if file.auth_token.is_empty() {
            return Ok(None);
        }

        Ok(Some(StoredSession::new(file.auth_token, file.user_metadata)))
    }

    async fn store(&self, session: StoredSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let file = SessionFile {
            auth_token: session.token.expose_secret().clone(),
            user_metadata: session.metadata,
        };
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(&file)?).await?;

        tracing::debug!(path = %self.path.display(), "Session stored");
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
