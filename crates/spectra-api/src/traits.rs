//! Trait definition for the SPECTRA backend.
//!
//! The REST client implements this trait; the client crate is written
//! against it so the synchronizer and poller can be tested with a mock
//! service instead of a live server.

use std::future::Future;

use spectra_core::models::{
    AnalysisFilter, AnalysisTask, AnalysisTaskBasic, ChannelsSet, CreateSetRequest,
    NewCustomFilter, SetPatch,
};

/// The SPECTRA channel-analysis service interface.
pub trait SpectraService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    // ── Channel sets ────────────────────────────────────────────

    fn list_sets(&self) -> impl Future<Output = Result<Vec<ChannelsSet>, Self::Error>> + Send;

    fn get_set(&self, id: &str) -> impl Future<Output = Result<ChannelsSet, Self::Error>> + Send;

    /// Create a set; a request carrying `build_criteria` starts a smart-set
    /// build server-side.
    fn create_set(
        &self,
        req: &CreateSetRequest,
    ) -> impl Future<Output = Result<ChannelsSet, Self::Error>> + Send;

    fn update_set(
        &self,
        id: &str,
        patch: &SetPatch,
    ) -> impl Future<Output = Result<ChannelsSet, Self::Error>> + Send;

    fn delete_set(&self, id: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn add_channels(
        &self,
        id: &str,
        usernames: &[String],
    ) -> impl Future<Output = Result<AddChannelsOutcome, Self::Error>> + Send;

    fn remove_channels(
        &self,
        id: &str,
        usernames: &[String],
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    // ── Smart-set builds ────────────────────────────────────────

    /// Request cancellation of a running build (server-directed; not an
    /// abort of any in-flight HTTP request).
    fn cancel_build(&self, id: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Fetch the set with its latest build status and progress.
    fn build_status(&self, id: &str)
        -> impl Future<Output = Result<ChannelsSet, Self::Error>> + Send;

    // ── Filters ─────────────────────────────────────────────────

    fn list_filters(&self)
        -> impl Future<Output = Result<Vec<AnalysisFilter>, Self::Error>> + Send;

    fn create_custom_filter(
        &self,
        req: &NewCustomFilter,
    ) -> impl Future<Output = Result<AnalysisFilter, Self::Error>> + Send;

    fn delete_custom_filter(&self, id: &str)
        -> impl Future<Output = Result<(), Self::Error>> + Send;

    // ── Analysis tasks ──────────────────────────────────────────

    fn list_tasks(&self)
        -> impl Future<Output = Result<Vec<AnalysisTaskBasic>, Self::Error>> + Send;

    fn get_task(&self, id: &str) -> impl Future<Output = Result<AnalysisTask, Self::Error>> + Send;

    fn start_analysis(
        &self,
        set_id: &str,
        filter_ids: &[String],
    ) -> impl Future<Output = Result<AnalysisTaskBasic, Self::Error>> + Send;
}

/// Per-item result of an add-channels request. The server accepts what it
/// can and reports the rest, so one request can partially succeed.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct AddChannelsOutcome {
    pub added: Vec<String>,
    pub failed: Vec<String>,
}

impl AddChannelsOutcome {
    pub fn is_partial(&self) -> bool {
        !self.added.is_empty() && !self.failed.is_empty()
    }

    pub fn all_failed(&self) -> bool {
        self.added.is_empty() && !self.failed.is_empty()
    }
}
