//! Mutation + reload as one unit.
//!
//! A screen action sends one mutating request and then reloads the project
//! list it shows. [`run`] ties the two together against a [`ProjectCache`]:
//!
//! 1. snapshot the cache and apply the optional optimistic edit
//! 2. send the request; on failure restore the snapshot and return the error
//! 3. reload; on success replace the cache with the server's list
//! 4. if only the reload failed, keep the mutation result and mark the cache
//!    stale so the screen can say so instead of showing old data as current

use std::future::Future;

use crate::error::{ClientError, ClientResult};
use crate::models::Project;
use crate::session::ProjectCache;

/// Result of a completed mutation
#[derive(Debug)]
pub struct ActionOutcome<T> {
    pub value: T,
    /// Error from the follow-up reload, if it failed
    pub reload_error: Option<ClientError>,
}

impl<T> ActionOutcome<T> {
    /// True when the cache now matches the server
    pub fn reconciled(&self) -> bool {
        self.reload_error.is_none()
    }
}

/// No optimistic edit: the cache changes only after the reload
pub fn pessimistic(_: &mut ProjectCache) {}

pub async fn run<T, O, Req, ReqFut, Rel, RelFut>(
    cache: &mut ProjectCache,
    optimistic: O,
    request: Req,
    reload: Rel,
) -> ClientResult<ActionOutcome<T>>
where
    O: FnOnce(&mut ProjectCache),
    Req: FnOnce() -> ReqFut,
    ReqFut: Future<Output = ClientResult<T>>,
    Rel: FnOnce() -> RelFut,
    RelFut: Future<Output = ClientResult<Vec<Project>>>,
{
    let snapshot = cache.clone();
    optimistic(cache);

    let value = match request().await {
        Ok(value) => value,
        Err(e) => {
            *cache = snapshot;
            return Err(e);
        }
    };

    match reload().await {
        Ok(projects) => {
            cache.replace_all(projects);
            Ok(ActionOutcome {
                value,
                reload_error: None,
            })
        }
        Err(e) => {
            tracing::warn!(error = %e, "Reload after mutation failed, project list is stale");
            cache.mark_stale();
            Ok(ActionOutcome {
                value,
                reload_error: Some(e),
            })
        }
    }
}
