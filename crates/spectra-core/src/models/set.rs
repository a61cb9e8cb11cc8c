use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SpectraError;

/// Number of channels the server analyzes per build batch (server contract).
pub const BUILD_BATCH_SIZE: u32 = 20;

/// Acceptance threshold applied when a build request does not override it.
pub const DEFAULT_ACCEPTANCE_THRESHOLD: f64 = 0.7;

/// Inclusive bounds for a smart-set target channel count.
pub const MIN_TARGET_COUNT: u32 = 10;
pub const MAX_TARGET_COUNT: u32 = 1000;

/// Lifecycle status of a smart-set build job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    Pending,
    Building,
    Completed,
    Failed,
    Cancelled,
}

impl BuildStatus {
    /// Terminal states accept no further automatic transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Building => "building",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a set's membership is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetKind {
    Manual,
    Smart,
}

/// Immutable parameters of a smart-set build request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartSetBuildCriteria {
    pub filter_ids: Vec<String>,
    pub target_count: u32,
    pub acceptance_threshold: f64,
    pub batch_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
}

impl SmartSetBuildCriteria {
    /// Build criteria with the fixed batch size and default threshold.
    pub fn new(filter_ids: Vec<String>, target_count: u32) -> Result<Self, SpectraError> {
        let criteria = Self {
            filter_ids,
            target_count,
            acceptance_threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
            batch_size: BUILD_BATCH_SIZE,
            custom_prompt: None,
        };
        criteria.validate()?;
        Ok(criteria)
    }

    pub fn validate(&self) -> Result<(), SpectraError> {
        if self.filter_ids.is_empty() {
            return Err(SpectraError::Criteria("filter_ids must not be empty".into()));
        }
        if !(MIN_TARGET_COUNT..=MAX_TARGET_COUNT).contains(&self.target_count) {
            return Err(SpectraError::Criteria(format!(
                "target_count {} outside {MIN_TARGET_COUNT}..={MAX_TARGET_COUNT}",
                self.target_count
            )));
        }
        if !(0.0..=1.0).contains(&self.acceptance_threshold) {
            return Err(SpectraError::Criteria(format!(
                "acceptance_threshold {} outside [0, 1]",
                self.acceptance_threshold
            )));
        }
        Ok(())
    }
}

/// Snapshot of a build's advancement, as last reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartSetBuildProgress {
    pub current_batch: u32,
    pub channels_accepted: u32,
    pub channels_analyzed: u32,
    pub target_count: u32,
    pub success_rate: f64,
}

impl SmartSetBuildProgress {
    /// Percentage of the target reached, clamped to 0..=100.
    ///
    /// A zero target would divide by zero; it reports 0 instead. The server
    /// can briefly report more accepted channels than the target (the last
    /// batch overshoots), which clamps to 100.
    pub fn percentage(&self) -> u8 {
        if self.target_count == 0 {
            return 0;
        }
        let pct = (self.channels_accepted as f64 / self.target_count as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }
}

/// Membership record of one channel inside a set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInSet {
    pub username: String,
    pub is_parsed: bool,
    pub added_at: DateTime<Utc>,
}

/// A named collection of Telegram channel references.
///
/// `build_criteria`/`build_status`/`build_progress` are present only for
/// smart sets; `build_progress` only once a build has been running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelsSet {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_public: bool,
    pub is_predefined: bool,
    pub is_owned_by_user: bool,
    pub created_at: DateTime<Utc>,
    pub channel_count: usize,
    pub channels: Vec<ChannelInSet>,
    pub all_parsed: bool,
    /// Wire name is `type`.
    #[serde(rename = "type")]
    pub kind: SetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_criteria: Option<SmartSetBuildCriteria>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_status: Option<BuildStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_progress: Option<SmartSetBuildProgress>,
}

impl ChannelsSet {
    pub fn is_smart(&self) -> bool {
        self.kind == SetKind::Smart
    }

    /// True while the server is still growing this set.
    pub fn is_building(&self) -> bool {
        self.build_status == Some(BuildStatus::Building)
    }

    /// Derived build progress, when a build has reported any.
    pub fn progress_percent(&self) -> Option<u8> {
        self.build_progress.as_ref().map(|p| p.percentage())
    }

    pub fn contains_channel(&self, username: &str) -> bool {
        self.channels.iter().any(|c| c.username == username)
    }

    /// Restore the `channel_count == channels.len()` invariant after a
    /// membership mutation.
    pub fn recount(&mut self) {
        self.channel_count = self.channels.len();
    }

    /// Shallow-merge the requested fields over the current entity.
    pub fn apply_patch(&mut self, patch: &SetPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(is_public) = patch.is_public {
            self.is_public = is_public;
        }
    }
}

/// Body of a create-set request; `build_criteria` makes it a smart set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSetRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_criteria: Option<SmartSetBuildCriteria>,
}

/// Partial update of a set's own fields (not its membership).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}
