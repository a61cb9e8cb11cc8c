//! Scripted mock service and model builders for synchronizer/poller tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::Utc;
use thiserror::Error;

use spectra_api::{AddChannelsOutcome, SpectraService};
use spectra_core::models::{
    AnalysisFilter, AnalysisTask, AnalysisTaskBasic, BuildStatus, ChannelInSet, ChannelsSet,
    CreateSetRequest, NewCustomFilter, SetKind, SetPatch, SmartSetBuildProgress, TaskStatus,
    TaskSummary,
};

#[derive(Debug, Clone, Error)]
#[error("mock service error: {0}")]
pub(crate) struct MockError(pub String);

pub(crate) type Queue<T> = Mutex<VecDeque<Result<T, MockError>>>;

/// Script a success response onto a queue.
pub(crate) fn ok<T>(queue: &Queue<T>, value: T) {
    queue.lock().unwrap().push_back(Ok(value));
}

/// Script a failure response onto a queue.
pub(crate) fn fail<T>(queue: &Queue<T>, message: &str) {
    queue.lock().unwrap().push_back(Err(MockError(message.into())));
}

/// A `SpectraService` whose responses are scripted per endpoint. Every call
/// is recorded; an unscripted call fails, which keeps tests honest about
/// exactly which requests an operation issues.
#[derive(Default)]
pub(crate) struct MockService {
    /// When set, every call sleeps this long before responding, so tests
    /// with a paused clock can observe the optimistic state mid-flight.
    latency: Mutex<Option<std::time::Duration>>,
    pub list_sets: Queue<Vec<ChannelsSet>>,
    pub get_set: Queue<ChannelsSet>,
    pub create_set: Queue<ChannelsSet>,
    pub update_set: Queue<ChannelsSet>,
    pub delete_set: Queue<()>,
    pub add_channels: Queue<AddChannelsOutcome>,
    pub remove_channels: Queue<()>,
    pub cancel_build: Queue<()>,
    pub build_status: Queue<ChannelsSet>,
    pub list_filters: Queue<Vec<AnalysisFilter>>,
    pub create_custom_filter: Queue<AnalysisFilter>,
    pub delete_custom_filter: Queue<()>,
    pub list_tasks: Queue<Vec<AnalysisTaskBasic>>,
    pub get_task: Queue<AnalysisTask>,
    pub start_analysis: Queue<AnalysisTaskBasic>,
    calls: Mutex<Vec<String>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_latency(&self, latency: std::time::Duration) {
        *self.latency.lock().unwrap() = Some(latency);
    }

    async fn take<T>(&self, queue: &Queue<T>, call: String) -> Result<T, MockError> {
        self.calls.lock().unwrap().push(call.clone());
        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(MockError(format!("unscripted call: {call}"))))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls whose name starts with `prefix`.
    pub fn calls_for(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

impl SpectraService for MockService {
    type Error = MockError;

    async fn list_sets(&self) -> Result<Vec<ChannelsSet>, MockError> {
        self.take(&self.list_sets, "list_sets".into()).await
    }

    async fn get_set(&self, id: &str) -> Result<ChannelsSet, MockError> {
        self.take(&self.get_set, format!("get_set:{id}")).await
    }

    async fn create_set(&self, req: &CreateSetRequest) -> Result<ChannelsSet, MockError> {
        self.take(&self.create_set, format!("create_set:{}", req.name)).await
    }

    async fn update_set(&self, id: &str, _patch: &SetPatch) -> Result<ChannelsSet, MockError> {
        self.take(&self.update_set, format!("update_set:{id}")).await
    }

    async fn delete_set(&self, id: &str) -> Result<(), MockError> {
        self.take(&self.delete_set, format!("delete_set:{id}")).await
    }

    async fn add_channels(
        &self,
        id: &str,
        _usernames: &[String],
    ) -> Result<AddChannelsOutcome, MockError> {
        self.take(&self.add_channels, format!("add_channels:{id}")).await
    }

    async fn remove_channels(&self, id: &str, _usernames: &[String]) -> Result<(), MockError> {
        self.take(&self.remove_channels, format!("remove_channels:{id}")).await
    }

    async fn cancel_build(&self, id: &str) -> Result<(), MockError> {
        self.take(&self.cancel_build, format!("cancel_build:{id}")).await
    }

    async fn build_status(&self, id: &str) -> Result<ChannelsSet, MockError> {
        self.take(&self.build_status, format!("build_status:{id}")).await
    }

    async fn list_filters(&self) -> Result<Vec<AnalysisFilter>, MockError> {
        self.take(&self.list_filters, "list_filters".into()).await
    }

    async fn create_custom_filter(
        &self,
        req: &NewCustomFilter,
    ) -> Result<AnalysisFilter, MockError> {
        self.take(
            &self.create_custom_filter,
            format!("create_custom_filter:{}", req.name),
        )
        .await
    }

    async fn delete_custom_filter(&self, id: &str) -> Result<(), MockError> {
        self.take(&self.delete_custom_filter, format!("delete_custom_filter:{id}")).await
    }

    async fn list_tasks(&self) -> Result<Vec<AnalysisTaskBasic>, MockError> {
        self.take(&self.list_tasks, "list_tasks".into()).await
    }

    async fn get_task(&self, id: &str) -> Result<AnalysisTask, MockError> {
        self.take(&self.get_task, format!("get_task:{id}")).await
    }

    async fn start_analysis(
        &self,
        set_id: &str,
        _filter_ids: &[String],
    ) -> Result<AnalysisTaskBasic, MockError> {
        self.take(&self.start_analysis, format!("start_analysis:{set_id}")).await
    }
}

// ── Model builders ──────────────────────────────────────────────

pub(crate) fn manual_set(id: &str, usernames: &[&str]) -> ChannelsSet {
    let channels: Vec<ChannelInSet> = usernames
        .iter()
        .map(|u| ChannelInSet {
            username: (*u).to_string(),
            is_parsed: true,
            added_at: Utc::now(),
        })
        .collect();
    ChannelsSet {
        id: id.into(),
        name: format!("set {id}"),
        description: None,
        is_public: false,
        is_predefined: false,
        is_owned_by_user: true,
        created_at: Utc::now(),
        channel_count: channels.len(),
        channels,
        all_parsed: true,
        kind: SetKind::Manual,
        build_criteria: None,
        build_status: None,
        build_progress: None,
    }
}

pub(crate) fn smart_set(id: &str, status: BuildStatus, accepted: u32, target: u32) -> ChannelsSet {
    let mut set = manual_set(id, &[]);
    set.kind = SetKind::Smart;
    set.build_status = Some(status);
    set.build_progress = Some(SmartSetBuildProgress {
        current_batch: 1,
        channels_accepted: accepted,
        channels_analyzed: accepted * 2,
        target_count: target,
        success_rate: 0.5,
    });
    set
}

pub(crate) fn custom_filter(id: &str, name: &str) -> AnalysisFilter {
    AnalysisFilter {
        id: id.into(),
        name: name.into(),
        description: None,
        prompt: Some("prompt".into()),
        is_custom: true,
        created_at: Utc::now(),
    }
}

pub(crate) fn task_basic(id: &str, set_id: &str, status: TaskStatus) -> AnalysisTaskBasic {
    AnalysisTaskBasic {
        id: id.into(),
        set_id: set_id.into(),
        status,
        filter_ids: vec!["f1".into()],
        created_at: Utc::now(),
    }
}

pub(crate) fn task_detail(id: &str, set_id: &str, status: TaskStatus) -> AnalysisTask {
    AnalysisTask {
        id: id.into(),
        set_id: set_id.into(),
        status,
        filter_ids: vec!["f1".into()],
        created_at: Utc::now(),
        summary: TaskSummary::default(),
        results: Vec::new(),
    }
}
