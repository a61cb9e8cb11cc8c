//! Client orchestration for the SPECTRA channel-analysis service.
//!
//! [`Client`] owns the shared in-memory caches and applies every mutating
//! operation through the optimistic-update contract: apply locally first,
//! reconcile with the server response on success, roll back to the exact
//! pre-mutation snapshot on failure. Failures are logged, surfaced as
//! [`Notice`]s and communicated through sentinel return values; they are
//! never propagated as errors to the calling view.

mod filters;
mod notify;
mod poll;
mod sync;

#[cfg(test)]
pub(crate) mod testutil;

use std::time::Duration;

use chrono::Utc;
use tokio::sync::{RwLock, RwLockReadGuard};
use uuid::Uuid;

use spectra_api::{AddChannelsOutcome, SpectraService};
use spectra_core::config::AppConfig;
use spectra_core::models::{
    AnalysisTask, AnalysisTaskBasic, BuildStatus, ChannelsSet, CreateSetRequest, FilterSelection,
    SetKind, SetPatch,
};
use spectra_core::store::{FiltersStore, SetsStore, TasksStore};

pub use notify::{Notice, NoticeEntry, NoticeLog};
pub use poll::{watch_build, watch_task, Watcher};
use sync::with_optimistic_update;

/// The client: one service transport plus the shared collection caches.
///
/// Generic over [`SpectraService`] so tests drive the full synchronizer
/// against a scripted mock without HTTP.
pub struct Client<S: SpectraService> {
    service: S,
    sets: RwLock<SetsStore>,
    filters: RwLock<FiltersStore>,
    tasks: RwLock<TasksStore>,
    notices: NoticeLog,
    poll_interval: Duration,
}

impl<S: SpectraService> Client<S> {
    pub fn new(service: S, config: &AppConfig) -> Self {
        Self::with_poll_interval(service, config.build.poll_interval())
    }

    pub fn with_poll_interval(service: S, poll_interval: Duration) -> Self {
        Self {
            service,
            sets: RwLock::new(SetsStore::new()),
            filters: RwLock::new(FiltersStore::new()),
            tasks: RwLock::new(TasksStore::new()),
            notices: NoticeLog::new(),
            poll_interval,
        }
    }

    // ── Cache reads ─────────────────────────────────────────────

    pub async fn sets(&self) -> RwLockReadGuard<'_, SetsStore> {
        self.sets.read().await
    }

    pub async fn filters(&self) -> RwLockReadGuard<'_, FiltersStore> {
        self.filters.read().await
    }

    pub async fn tasks(&self) -> RwLockReadGuard<'_, TasksStore> {
        self.tasks.read().await
    }

    pub fn notices(&self) -> &NoticeLog {
        &self.notices
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    fn op_failed(&self, operation: &'static str, err: &S::Error) {
        tracing::warn!(operation, error = %err, "operation failed, cache rolled back");
        self.notices.push(Notice::OperationFailed {
            operation,
            message: err.to_string(),
        });
    }

    // ── Fetch-and-replace reads (no optimistic step) ────────────

    /// Fetch the full set listing and replace the cached collection.
    pub async fn load_sets(&self) -> bool {
        match self.service.list_sets().await {
            Ok(sets) => {
                self.sets.write().await.replace_all(sets);
                true
            }
            Err(err) => {
                self.op_failed("load_sets", &err);
                false
            }
        }
    }

    /// Fetch one set and merge it into the cache. On failure the cache is
    /// left untouched and a notice is raised; the caller may retry.
    pub async fn refresh_set(&self, id: &str) -> Option<ChannelsSet> {
        let result = self.service.get_set(id).await;
        self.merge_refreshed(result, "refresh_set").await
    }

    /// Fetch the authoritative build status/progress for a smart set and
    /// merge the returned entity into the cache.
    pub async fn refresh_build_status(&self, id: &str) -> Option<ChannelsSet> {
        let result = self.service.build_status(id).await;
        self.merge_refreshed(result, "refresh_build_status").await
    }

    async fn merge_refreshed(
        &self,
        result: Result<ChannelsSet, S::Error>,
        operation: &'static str,
    ) -> Option<ChannelsSet> {
        match result {
            Ok(set) => {
                self.sets.write().await.upsert(set.clone());
                Some(set)
            }
            Err(err) => {
                self.op_failed(operation, &err);
                None
            }
        }
    }

    // ── Mutations ───────────────────────────────────────────────

    /// Create a set. A provisional entity with a temporary id appears in
    /// the cache immediately; the server entity replaces it on success, and
    /// it is removed again on failure. Smart-set requests surface with
    /// `build_status = pending` until the first refresh reports otherwise.
    pub async fn create_set(&self, req: CreateSetRequest) -> Option<ChannelsSet> {
        if let Some(criteria) = &req.build_criteria {
            if let Err(err) = criteria.validate() {
                tracing::warn!(error = %err, "rejected create request client-side");
                self.notices.push(Notice::OperationFailed {
                    operation: "create_set",
                    message: err.to_string(),
                });
                return None;
            }
        }

        let temp_id = format!("tmp-{}", Uuid::new_v4());
        let provisional = ChannelsSet {
            id: temp_id.clone(),
            name: req.name.clone(),
            description: req.description.clone(),
            is_public: req.is_public,
            is_predefined: false,
            is_owned_by_user: true,
            created_at: Utc::now(),
            channel_count: 0,
            channels: Vec::new(),
            all_parsed: true,
            kind: if req.build_criteria.is_some() {
                SetKind::Smart
            } else {
                SetKind::Manual
            },
            build_criteria: req.build_criteria.clone(),
            build_status: req.build_criteria.as_ref().map(|_| BuildStatus::Pending),
            build_progress: None,
        };

        let result = with_optimistic_update(
            &self.sets,
            |_| Some(temp_id.clone()),
            |st| st.insert(provisional),
            || self.service.create_set(&req),
            |st, out: &ChannelsSet| st.reconcile_created(&temp_id, out.clone()),
            |st, tid| {
                st.remove(&tid);
            },
        )
        .await;

        match result {
            Ok(out) => out,
            Err(err) => {
                self.op_failed("create_set", &err);
                None
            }
        }
    }

    /// Patch a set's own fields. Silent no-op when the id is no longer
    /// cached.
    pub async fn update_set(&self, id: &str, patch: SetPatch) -> Option<ChannelsSet> {
        let result = with_optimistic_update(
            &self.sets,
            |st| st.snapshot(id),
            |st| st.apply_patch(id, &patch),
            || self.service.update_set(id, &patch),
            |st, out: &ChannelsSet| st.upsert(out.clone()),
            |st, snap| st.restore(snap),
        )
        .await;

        match result {
            Ok(out) => out,
            Err(err) => {
                self.op_failed("update_set", &err);
                None
            }
        }
    }

    /// Delete a set. The entity disappears immediately and is re-inserted
    /// at its original position if the request fails.
    pub async fn delete_set(&self, id: &str) -> bool {
        let result = with_optimistic_update(
            &self.sets,
            |st| st.remove(id),
            |_| {},
            || self.service.delete_set(id),
            |_, _| {},
            |st, (pos, set)| st.restore_at(pos, set),
        )
        .await;

        match result {
            Ok(done) => done.is_some(),
            Err(err) => {
                self.op_failed("delete_set", &err);
                false
            }
        }
    }

    /// Add channels by username. Unparsed membership records appear
    /// immediately (duplicates skipped); on success the set is refetched
    /// rather than merged from partial results, and a partial outcome
    /// raises a distinguished notice.
    pub async fn add_channels(
        &self,
        id: &str,
        usernames: Vec<String>,
    ) -> Option<AddChannelsOutcome> {
        let now = Utc::now();
        let result = with_optimistic_update(
            &self.sets,
            |st| {
                st.get(id)?;
                Some(st.append_channels(id, &usernames, now))
            },
            |_| {},
            || self.service.add_channels(id, &usernames),
            |_, _| {},
            |st, appended| st.drop_channels(id, &appended),
        )
        .await;

        match result {
            Ok(None) => None,
            Ok(Some(outcome)) => {
                if outcome.is_partial() || outcome.all_failed() {
                    self.notices.push(Notice::PartiallyCompleted {
                        operation: "add_channels",
                        failed: outcome.failed.clone(),
                    });
                }
                // The add response carries no authoritative membership;
                // refetch the single set to reconcile.
                let refreshed = self.service.get_set(id).await;
                self.merge_refreshed(refreshed, "refresh_set").await;
                Some(outcome)
            }
            Err(err) => {
                self.op_failed("add_channels", &err);
                None
            }
        }
    }

    /// Remove channels by username; rollback restores the exact removed
    /// records in their original order.
    pub async fn remove_channels(&self, id: &str, usernames: Vec<String>) -> bool {
        let result = with_optimistic_update(
            &self.sets,
            |st| {
                st.get(id)?;
                Some(st.remove_channels(id, &usernames))
            },
            |_| {},
            || self.service.remove_channels(id, &usernames),
            |_, _| {},
            |st, removed| st.restore_channels(id, removed),
        )
        .await;

        match result {
            Ok(done) => done.is_some(),
            Err(err) => {
                self.op_failed("remove_channels", &err);
                false
            }
        }
    }

    /// Request cancellation of a running build. The cached status flips to
    /// `cancelled` before the request resolves; the previous full entity is
    /// restored verbatim if the request fails. The operation does not
    /// validate the current state client-side — the server is the judge.
    pub async fn cancel_build(&self, id: &str) -> bool {
        let result = with_optimistic_update(
            &self.sets,
            |st| st.snapshot(id),
            |st| st.set_build_status(id, BuildStatus::Cancelled),
            || self.service.cancel_build(id),
            |_, _| {},
            |st, snap| st.restore(snap),
        )
        .await;

        match result {
            Ok(done) => done.is_some(),
            Err(err) => {
                self.op_failed("cancel_build", &err);
                false
            }
        }
    }

    // ── Analysis tasks ──────────────────────────────────────────

    pub async fn load_tasks(&self) -> bool {
        match self.service.list_tasks().await {
            Ok(tasks) => {
                self.tasks.write().await.replace_all(tasks);
                true
            }
            Err(err) => {
                self.op_failed("load_tasks", &err);
                false
            }
        }
    }

    /// Fetch a task's detail payload and refresh its cached list row.
    pub async fn refresh_task(&self, id: &str) -> Option<AnalysisTask> {
        match self.service.get_task(id).await {
            Ok(task) => {
                self.tasks.write().await.upsert(task.basic());
                Some(task)
            }
            Err(err) => {
                self.op_failed("refresh_task", &err);
                None
            }
        }
    }

    /// Start an analysis run over the selected filters.
    pub async fn start_analysis(
        &self,
        set_id: &str,
        selection: &FilterSelection,
    ) -> Option<AnalysisTaskBasic> {
        match self.service.start_analysis(set_id, selection.selected()).await {
            Ok(task) => {
                self.tasks.write().await.upsert(task.clone());
                Some(task)
            }
            Err(err) => {
                self.op_failed("start_analysis", &err);
                None
            }
        }
    }
}
