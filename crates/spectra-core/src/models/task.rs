use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a server-side analysis task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// List-view projection of an analysis task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisTaskBasic {
    pub id: String,
    pub set_id: String,
    pub status: TaskStatus,
    pub filter_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Summary counts reported with a task's detail payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub channels_total: u32,
    pub channels_processed: u32,
    pub channels_accepted: u32,
}

/// One channel scored against one filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelFilterResult {
    pub username: String,
    pub filter_id: String,
    pub score: f64,
    pub accepted: bool,
}

/// Full analysis task detail: the basic projection plus results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisTask {
    pub id: String,
    pub set_id: String,
    pub status: TaskStatus,
    pub filter_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub summary: TaskSummary,
    pub results: Vec<ChannelFilterResult>,
}

impl AnalysisTask {
    /// The list-view projection of this task.
    pub fn basic(&self) -> AnalysisTaskBasic {
        AnalysisTaskBasic {
            id: self.id.clone(),
            set_id: self.set_id.clone(),
            status: self.status,
            filter_ids: self.filter_ids.clone(),
            created_at: self.created_at,
        }
    }
}
