use crate::model::{Priority, WorkType};
use serde::Serialize;

/// Everything derived from one sprint's records. Built once by the
/// aggregator and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsModel {
    pub total_items: usize,
    pub done_items: usize,
    pub commit_count: usize,
    /// Integer percentage in `[0, 100]`.
    pub completion_rate: u32,
    pub story_points: StoryPoints,
    pub work_types: Vec<TypeShare>,
    pub priority_resolution: Vec<PriorityResolution>,
    pub contributors: Vec<Contributor>,
    pub quality: Quality,
    pub velocity: Velocity,
    pub risk: RiskAssessment,
    pub build_health: BuildHealth,
    pub achievements: Vec<String>,
    pub action_items: Vec<String>,
    pub next_steps: Vec<String>,
}

impl MetricsModel {
    pub fn open_items(&self) -> usize {
        self.total_items - self.done_items
    }

    pub fn type_share(&self, work_type: WorkType) -> Option<&TypeShare> {
        self.work_types.iter().find(|share| share.work_type == work_type)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StoryPoints {
    pub planned: f64,
    pub completed: f64,
}

/// Count and share of one work type. Each percentage is rounded on its own,
/// so the shares of a sprint need not add up to exactly 100.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct TypeShare {
    pub work_type: WorkType,
    pub count: usize,
    pub done: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Serialize)]
pub enum ResolutionBucket {
    /// Items flagged as blockers, whatever their priority.
    Blockers,
    Priority(Priority),
}

impl ResolutionBucket {
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionBucket::Blockers => "Blockers",
            ResolutionBucket::Priority(priority) => priority.label(),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum ResolutionStatus {
    NotApplicable,
    Complete,
    InProgress,
}

impl ResolutionStatus {
    pub fn from_counts(resolved: usize, total: usize) -> Self {
        if total == 0 {
            ResolutionStatus::NotApplicable
        } else if resolved == total {
            ResolutionStatus::Complete
        } else {
            ResolutionStatus::InProgress
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResolutionStatus::NotApplicable => "N/A",
            ResolutionStatus::Complete => "Complete",
            ResolutionStatus::InProgress => "In Progress",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct PriorityResolution {
    pub bucket: ResolutionBucket,
    pub resolved: usize,
    pub total: usize,
    pub rate: u32,
    pub status: ResolutionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contributor {
    pub name: String,
    pub commits: usize,
    pub issues: usize,
    /// Points of Done items assigned to this contributor.
    pub story_points: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum QualityScore {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
    NotApplicable,
}

impl QualityScore {
    pub fn label(&self) -> &'static str {
        match self {
            QualityScore::Excellent => "Excellent",
            QualityScore::Good => "Good",
            QualityScore::Fair => "Fair",
            QualityScore::NeedsImprovement => "Needs Improvement",
            QualityScore::NotApplicable => "N/A",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quality {
    pub total_items: usize,
    pub bugs: usize,
    pub bugs_resolved: usize,
    /// Bug share of all items, as an integer percentage.
    pub bug_ratio: u32,
    pub score: QualityScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Velocity {
    pub planned: f64,
    pub actual: f64,
    pub percentage: u32,
    /// `round(actual * forecast_growth_factor)`. A fixed optimistic-growth
    /// rule, not a forecast model.
    pub predicted_next_sprint: u64,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    /// Not-done items that are Critical priority or flagged as blockers.
    pub open_critical: usize,
    pub open_blockers: usize,
    pub factors: Vec<String>,
    /// Paired by position with `factors` when there are any.
    pub mitigations: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
pub struct BuildHealth {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub success_rate: u32,
}

impl BuildHealth {
    pub fn has_runs(&self) -> bool {
        self.total > 0
    }
}
