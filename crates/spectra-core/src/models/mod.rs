pub mod filter;
pub mod set;
pub mod task;

pub use filter::{AnalysisFilter, FilterSelection, NewCustomFilter};
pub use set::{
    BuildStatus, ChannelInSet, ChannelsSet, CreateSetRequest, SetKind, SetPatch,
    SmartSetBuildCriteria, SmartSetBuildProgress,
};
pub use task::{AnalysisTask, AnalysisTaskBasic, ChannelFilterResult, TaskStatus, TaskSummary};
