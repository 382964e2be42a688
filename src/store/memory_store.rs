use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::ClientResult;
use crate::session::Session;
use crate::store::SessionStore;

/// In-memory session store for tests and one-shot runs
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    inner: Arc<Mutex<Option<Session>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a session
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(session))),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self) -> ClientResult<Option<Session>> {
        Ok(self.inner.lock().await.clone())
    }

    async fn save(&self, session: &Session) -> ClientResult<()> {
        *self.inner.lock().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        *self.inner.lock().await = None;
        Ok(())
    }
}
