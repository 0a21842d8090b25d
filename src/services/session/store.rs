use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::services::cache::{CacheClient, CacheError};
use crate::services::session::types::{Session, SessionId};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("session encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Token store: one JSON value per browser session, replaced whole on write.
///
/// Writers are the login handler (`save`), the logout handler and the
/// session-expiry path (`clear`). Everything else only reads.
#[derive(Clone)]
pub struct SessionStore {
    cache: Arc<dyn CacheClient>,
    ttl: Duration,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("backend", &self.cache.backend_name())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionStore {
    pub fn new(cache: Arc<dyn CacheClient>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    fn key(id: &SessionId) -> String {
        format!("session:{id}")
    }

    pub async fn load(&self, id: &SessionId) -> Result<Option<Session>, SessionError> {
        let Some(raw) = self.cache.get_string(&Self::key(id)).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) if session.has_token() => Ok(Some(session)),
            Ok(_) => Ok(None),
            Err(err) => {
                // A corrupt entry is indistinguishable from "logged out".
                warn!(session_id = %id, error = %err, "discarding undecodable session");
                Ok(None)
            }
        }
    }

    /// Current bearer token, read fresh on every call.
    pub async fn token(&self, id: &SessionId) -> Result<Option<String>, SessionError> {
        Ok(self.load(id).await?.map(|s| s.token))
    }

    pub async fn save(&self, id: &SessionId, session: &Session) -> Result<(), SessionError> {
        let value = serde_json::to_string(session)?;
        self.cache
            .set_with_ttl(&Self::key(id), &value, self.ttl)
            .await?;
        Ok(())
    }

    /// Returns whether a session was present. Clearing twice is a no-op.
    pub async fn clear(&self, id: &SessionId) -> Result<bool, SessionError> {
        Ok(self.cache.del(&Self::key(id)).await? > 0)
    }
}
