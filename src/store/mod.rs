pub mod file_store;
pub mod memory_store;

pub use file_store::FileSessionStore;
pub use memory_store::InMemorySessionStore;

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::session::Session;

/// Persistence for the client session, so a login survives between runs
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the saved session, `None` when nothing usable is stored
    async fn load(&self) -> ClientResult<Option<Session>>;

    /// Overwrite the saved session
    async fn save(&self, session: &Session) -> ClientResult<()>;

    /// Forget the saved session
    async fn clear(&self) -> ClientResult<()>;
}
