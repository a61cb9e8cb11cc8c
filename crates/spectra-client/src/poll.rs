//! Poll-driven refresh loops for server-side jobs.
//!
//! A watcher is a spawned task ticking at the configured fixed interval
//! (no backoff, no jitter, no retry cap). Each tick first checks the
//! cached status — an optimistic cancel or a terminal refresh makes the
//! guarding condition false and stops rescheduling — then issues a
//! refresh. Dropping the handle aborts the task, so an in-flight refresh
//! from a dead watcher can never write into the cache.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use spectra_api::SpectraService;
use spectra_core::models::ChannelsSet;

use crate::Client;

/// Handle to a running poll loop; aborts the loop on drop.
pub struct Watcher {
    handle: JoinHandle<()>,
}

impl Watcher {
    /// True once the loop has observed a terminal state and exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Poll a smart set's build status while it is `building`.
pub fn watch_build<S>(client: Arc<Client<S>>, set_id: impl Into<String>) -> Watcher
where
    S: SpectraService + 'static,
{
    let set_id = set_id.into();
    let handle = tokio::spawn(async move {
        let mut ticker = time::interval(client.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Consume the immediate first tick; the first refresh happens one
        // full interval after the watcher starts.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let building = client
                .sets()
                .await
                .get(&set_id)
                .map(ChannelsSet::is_building)
                .unwrap_or(false);
            if !building {
                tracing::debug!(set = %set_id, "build no longer in progress, watcher stopping");
                break;
            }
            match client.refresh_build_status(&set_id).await {
                Some(set) => {
                    if set.build_status.map_or(true, |s| s.is_terminal()) {
                        tracing::info!(set = %set_id, status = ?set.build_status, "build reached terminal state");
                        break;
                    }
                }
                // Transient refresh failure: keep polling.
                None => {}
            }
        }
    });
    Watcher { handle }
}

/// Poll an analysis task's status while it is pending or running.
pub fn watch_task<S>(client: Arc<Client<S>>, task_id: impl Into<String>) -> Watcher
where
    S: SpectraService + 'static,
{
    let task_id = task_id.into();
    let handle = tokio::spawn(async move {
        let mut ticker = time::interval(client.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let in_progress = client
                .tasks()
                .await
                .get(&task_id)
                .map(|t| !t.status.is_terminal())
                .unwrap_or(false);
            if !in_progress {
                break;
            }
            match client.refresh_task(&task_id).await {
                Some(task) => {
                    if task.status.is_terminal() {
                        break;
                    }
                }
                None => {}
            }
        }
    });
    Watcher { handle }
}
