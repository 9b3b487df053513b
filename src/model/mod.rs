mod commit;
mod pipeline;
mod sprint;
mod work_item;

pub use commit::{Commit, UNKNOWN_AUTHOR};
pub use pipeline::{PipelineRun, RunOutcome};
pub use sprint::{SprintContext, SprintDuration, SprintState, UNKNOWN_DURATION, UNNAMED_SPRINT};
pub use work_item::{Priority, StatusBucket, WorkItem, WorkType};
