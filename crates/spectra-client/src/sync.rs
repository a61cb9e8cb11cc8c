//! Generic optimistic-update helper.
//!
//! Every mutating operation follows the same contract: capture an undo
//! snapshot, apply the anticipated state to the cache, issue the request
//! without holding the lock, then reconcile with the server response or
//! roll back to the snapshot. Funnelling all mutations through one helper
//! keeps the snapshot/rollback pairing uniform instead of hand-rolling it
//! per operation.

use std::future::Future;

use tokio::sync::RwLock;

/// Run one optimistic mutation against a store.
///
/// `snapshot` captures the undo data (and may itself mutate, e.g. a delete
/// removes the entity and returns it); returning `None` means the target
/// entity is no longer in the cache and the whole operation is a silent
/// no-op — no request is issued. `apply` performs any remaining optimistic
/// mutation. On request success `reconcile` merges the server response; on
/// failure `rollback` restores the snapshot exactly and the error is
/// returned to the caller for logging/notification.
///
/// The write guard is held for the synchronous snapshot+apply step and for
/// reconcile/rollback, never across the awaited request.
pub(crate) async fn with_optimistic_update<St, Snap, Out, E, Fut>(
    store: &RwLock<St>,
    snapshot: impl FnOnce(&mut St) -> Option<Snap>,
    apply: impl FnOnce(&mut St),
    request: impl FnOnce() -> Fut,
    reconcile: impl FnOnce(&mut St, &Out),
    rollback: impl FnOnce(&mut St, Snap),
) -> Result<Option<Out>, E>
where
    Fut: Future<Output = Result<Out, E>>,
{
    let snap = {
        let mut guard = store.write().await;
        let Some(snap) = snapshot(&mut guard) else {
            return Ok(None);
        };
        apply(&mut guard);
        snap
    };

    match request().await {
        Ok(out) => {
            let mut guard = store.write().await;
            reconcile(&mut guard, &out);
            Ok(Some(out))
        }
        Err(err) => {
            let mut guard = store.write().await;
            rollback(&mut guard, snap);
            Err(err)
        }
    }
}
