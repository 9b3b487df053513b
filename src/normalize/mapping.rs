use crate::model::{Priority, RunOutcome, SprintState, StatusBucket, WorkType};

fn key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn status_bucket(raw: &str) -> StatusBucket {
    match key(raw).as_str() {
        "done" | "resolved" | "closed" | "complete" | "completed" => StatusBucket::Done,
        "in progress" | "in review" | "in development" | "review" | "code review" | "testing" => {
            StatusBucket::InProgress
        }
        "to do" | "todo" | "open" | "backlog" | "new" | "selected for development" => {
            StatusBucket::Todo
        }
        _ => StatusBucket::Other,
    }
}

pub fn priority(raw: &str) -> Priority {
    match key(raw).as_str() {
        "blocker" | "highest" | "critical" | "p0" => Priority::Critical,
        "high" | "major" | "p1" => Priority::High,
        "medium" | "normal" | "p2" => Priority::Medium,
        "low" | "lowest" | "minor" | "trivial" | "p3" | "p4" => Priority::Low,
        _ => Priority::None,
    }
}

pub fn work_type(raw: &str) -> WorkType {
    match key(raw).as_str() {
        "story" | "user story" => WorkType::Story,
        "bug" | "defect" => WorkType::Bug,
        "task" | "sub-task" | "subtask" => WorkType::Task,
        "epic" => WorkType::Epic,
        "improvement" | "enhancement" => WorkType::Improvement,
        _ => WorkType::Other,
    }
}

pub fn is_blocker_signal(raw: &str) -> bool {
    key(raw) == "blocker"
}

pub fn sprint_state(raw: &str) -> SprintState {
    match key(raw).as_str() {
        "active" | "open" | "started" => SprintState::Active,
        "closed" | "complete" | "completed" | "ended" => SprintState::Closed,
        _ => SprintState::Unknown,
    }
}

pub fn run_outcome(raw: &str) -> RunOutcome {
    match key(raw).as_str() {
        "success" | "passed" | "fixed" => RunOutcome::Success,
        "failure" | "failed" | "error" | "broken" | "timed_out" => RunOutcome::Failure,
        "cancelled" | "canceled" | "skipped" => RunOutcome::Cancelled,
        _ => RunOutcome::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_are_case_insensitive() {
        assert_eq!(status_bucket("RESOLVED"), StatusBucket::Done);
        assert_eq!(status_bucket(" In Review "), StatusBucket::InProgress);
        assert_eq!(status_bucket("Backlog"), StatusBucket::Todo);
        assert_eq!(status_bucket("Waiting for QA"), StatusBucket::Other);
    }

    #[test]
    fn priorities_collapse_to_five_buckets() {
        assert_eq!(priority("Blocker"), Priority::Critical);
        assert_eq!(priority("Major"), Priority::High);
        assert_eq!(priority("P2"), Priority::Medium);
        assert_eq!(priority("Trivial"), Priority::Low);
        assert_eq!(priority(""), Priority::None);
    }

    #[test]
    fn unknown_types_are_other() {
        assert_eq!(work_type("Sub-task"), WorkType::Task);
        assert_eq!(work_type("Spike"), WorkType::Other);
    }

    #[test]
    fn run_outcomes() {
        assert_eq!(run_outcome("SUCCESS"), RunOutcome::Success);
        assert_eq!(run_outcome("timed_out"), RunOutcome::Failure);
        assert_eq!(run_outcome("in_progress"), RunOutcome::Other);
    }
}
