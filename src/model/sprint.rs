use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::fmt;

pub const UNNAMED_SPRINT: &str = "Unnamed Sprint";
pub const UNKNOWN_DURATION: &str = "TBD";

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Serialize)]
pub enum SprintState {
    Active,
    Closed,
    Unknown,
}

impl SprintState {
    pub fn label(&self) -> &'static str {
        match self {
            SprintState::Active => "Active",
            SprintState::Closed => "Closed",
            SprintState::Unknown => "Unknown",
        }
    }
}

/// Calendar-day length of a sprint.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Serialize)]
pub struct SprintDuration {
    pub days: i64,
}

impl SprintDuration {
    /// `None` unless both dates are known and `until` is not before `since`.
    pub fn between(
        since: Option<&DateTime<FixedOffset>>,
        until: Option<&DateTime<FixedOffset>>,
    ) -> Option<Self> {
        let (since, until) = (since?, until?);
        let days = (until.date_naive() - since.date_naive()).num_days();
        (days >= 0).then_some(Self { days })
    }
}

impl fmt::Display for SprintDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.days {
            7 => f.write_str("1 week"),
            14 => f.write_str("2 weeks"),
            21 => f.write_str("3 weeks"),
            days => write!(f, "{days} days"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SprintContext {
    pub name: String,
    pub since: Option<DateTime<FixedOffset>>,
    pub until: Option<DateTime<FixedOffset>>,
    pub state: SprintState,
    pub goal: Option<String>,
    pub duration: Option<SprintDuration>,
}

// Create
impl SprintContext {
    pub fn new(
        name: impl ToString,
        since: Option<DateTime<FixedOffset>>,
        until: Option<DateTime<FixedOffset>>,
        state: SprintState,
    ) -> Self {
        let duration = SprintDuration::between(since.as_ref(), until.as_ref());
        Self {
            name: name.to_string(),
            since,
            until,
            state,
            goal: None,
            duration,
        }
    }

    pub fn unnamed() -> Self {
        Self::new(UNNAMED_SPRINT, None, None, SprintState::Unknown)
    }

    pub fn with_goal(mut self, goal: impl ToString) -> Self {
        let goal = goal.to_string();
        self.goal = (!goal.trim().is_empty()).then_some(goal);
        self
    }
}

// Display
impl SprintContext {
    pub fn duration_label(&self) -> String {
        self.duration
            .map(|duration| duration.to_string())
            .unwrap_or_else(|| UNKNOWN_DURATION.to_string())
    }

    /// File-name friendly form of the name, e.g. `sprint-14`.
    pub fn slug(&self) -> String {
        let slug = self
            .name
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        if slug.is_empty() {
            "sprint-report".to_string()
        } else {
            slug
        }
    }

    pub fn date_range_label(&self) -> String {
        let format = |date: &Option<DateTime<FixedOffset>>| {
            date.map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| UNKNOWN_DURATION.to_string())
        };
        format!("{} - {}", format(&self.since), format(&self.until))
    }
}
