use serde::Serialize;
use std::fmt;

/// Canonical work-item kind. Every item carries exactly one.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Serialize)]
pub enum WorkType {
    Story,
    Bug,
    Task,
    Epic,
    Improvement,
    Other,
}

impl WorkType {
    /// Fixed display order used by every breakdown.
    pub const ALL: [WorkType; 6] = [
        WorkType::Story,
        WorkType::Bug,
        WorkType::Task,
        WorkType::Epic,
        WorkType::Improvement,
        WorkType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WorkType::Story => "Story",
            WorkType::Bug => "Bug",
            WorkType::Task => "Task",
            WorkType::Epic => "Epic",
            WorkType::Improvement => "Improvement",
            WorkType::Other => "Other",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            WorkType::Story => "Stories",
            WorkType::Bug => "Bugs",
            WorkType::Task => "Tasks",
            WorkType::Epic => "Epics",
            WorkType::Improvement => "Improvements",
            WorkType::Other => "Other Items",
        }
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status bucket used for aggregate math. The source status string is kept
/// separately on [`WorkItem::status_name`] for display.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Serialize)]
pub enum StatusBucket {
    Todo,
    InProgress,
    Done,
    Other,
}

impl StatusBucket {
    pub fn is_done(&self) -> bool {
        matches!(self, StatusBucket::Done)
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusBucket::Todo => "To Do",
            StatusBucket::InProgress => "In Progress",
            StatusBucket::Done => "Done",
            StatusBucket::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
    None,
}

impl Priority {
    /// Priorities that get a row in the resolution breakdown.
    pub const RANKED: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::None => "None",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkItem {
    pub id: String,
    pub title: String,
    pub work_type: WorkType,
    pub status: StatusBucket,
    /// Status exactly as the tracker reported it.
    pub status_name: String,
    pub priority: Priority,
    /// Set when the tracker flags the item as blocking, through its priority,
    /// its type or a `blocker` label.
    pub blocker: bool,
    pub assignee: Option<String>,
    /// Always finite and `>= 0`.
    pub story_points: f64,
}

// Create
impl WorkItem {
    pub fn new(
        id: impl ToString,
        title: impl ToString,
        work_type: WorkType,
        status: StatusBucket,
        priority: Priority,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            work_type,
            status,
            status_name: status.label().to_string(),
            priority,
            blocker: false,
            assignee: None,
            story_points: 0.0,
        }
    }

    pub fn with_assignee(mut self, assignee: impl ToString) -> Self {
        self.assignee = Some(assignee.to_string());
        self
    }

    pub fn with_points(mut self, story_points: f64) -> Self {
        self.story_points = if story_points.is_finite() && story_points > 0.0 {
            story_points
        } else {
            0.0
        };
        self
    }

    pub fn with_status_name(mut self, status_name: impl ToString) -> Self {
        self.status_name = status_name.to_string();
        self
    }

    pub fn as_blocker(mut self) -> Self {
        self.blocker = true;
        self
    }
}

// Queries
impl WorkItem {
    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }

    /// Critical priority or blocker flag, the signal risk assessment counts.
    pub fn is_critical_or_blocker(&self) -> bool {
        self.priority == Priority::Critical || self.blocker
    }
}
