use serde::Serialize;

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Serialize)]
pub enum RunOutcome {
    Success,
    Failure,
    Cancelled,
    Other,
}

/// One build-pipeline run observed during the sprint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineRun {
    pub id: String,
    pub name: String,
    pub outcome: RunOutcome,
}

impl PipelineRun {
    pub fn new(id: impl ToString, name: impl ToString, outcome: RunOutcome) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            outcome,
        }
    }
}
