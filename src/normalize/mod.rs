//! Record normalizer: raw tracker, VCS and CI JSON into canonical records.
//!
//! Individual malformed records are dropped and counted, never fatal. Only a
//! top-level input of the wrong JSON shape is rejected.

pub mod fields;
pub mod mapping;

use crate::error::{ReportError, Result};
use crate::model::{Commit, PipelineRun, SprintContext, WorkItem};
use fields::{parse_datetime, probe_str, string_list, story_points, FieldPath};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

const ITEM_ID: [FieldPath; 2] = [FieldPath::new("key", &["key"]), FieldPath::new("id", &["id"])];
const ITEM_TITLE: [FieldPath; 3] = [
    FieldPath::new("fields.summary", &["fields", "summary"]),
    FieldPath::new("summary", &["summary"]),
    FieldPath::new("title", &["title"]),
];
const ITEM_TYPE: [FieldPath; 4] = [
    FieldPath::new("fields.issuetype.name", &["fields", "issuetype", "name"]),
    FieldPath::new("issuetype.name", &["issuetype", "name"]),
    FieldPath::new("type", &["type"]),
    FieldPath::new("issueType", &["issueType"]),
];
const ITEM_STATUS: [FieldPath; 3] = [
    FieldPath::new("fields.status.name", &["fields", "status", "name"]),
    FieldPath::new("status.name", &["status", "name"]),
    FieldPath::new("status", &["status"]),
];
const ITEM_PRIORITY: [FieldPath; 3] = [
    FieldPath::new("fields.priority.name", &["fields", "priority", "name"]),
    FieldPath::new("priority.name", &["priority", "name"]),
    FieldPath::new("priority", &["priority"]),
];
const ITEM_ASSIGNEE: [FieldPath; 5] = [
    FieldPath::new("fields.assignee.displayName", &["fields", "assignee", "displayName"]),
    FieldPath::new("fields.assignee.name", &["fields", "assignee", "name"]),
    FieldPath::new("assignee.displayName", &["assignee", "displayName"]),
    FieldPath::new("assignee.name", &["assignee", "name"]),
    FieldPath::new("assignee", &["assignee"]),
];
const ITEM_LABELS: [FieldPath; 2] = [
    FieldPath::new("fields.labels", &["fields", "labels"]),
    FieldPath::new("labels", &["labels"]),
];

const COMMIT_SHA: [FieldPath; 2] = [FieldPath::new("sha", &["sha"]), FieldPath::new("id", &["id"])];
const COMMIT_MESSAGE: [FieldPath; 2] = [
    FieldPath::new("message", &["message"]),
    FieldPath::new("commit.message", &["commit", "message"]),
];
const COMMIT_AUTHOR: [FieldPath; 5] = [
    FieldPath::new("author", &["author"]),
    FieldPath::new("commit.author.name", &["commit", "author", "name"]),
    FieldPath::new("author.name", &["author", "name"]),
    FieldPath::new("author.login", &["author", "login"]),
    FieldPath::new("author_name", &["author_name"]),
];
const COMMIT_TIMESTAMP: [FieldPath; 4] = [
    FieldPath::new("timestamp", &["timestamp"]),
    FieldPath::new("date", &["date"]),
    FieldPath::new("commit.author.date", &["commit", "author", "date"]),
    FieldPath::new("commit.committer.date", &["commit", "committer", "date"]),
];
const COMMIT_URL: [FieldPath; 2] = [
    FieldPath::new("html_url", &["html_url"]),
    FieldPath::new("url", &["url"]),
];

const SPRINT_NAME: [FieldPath; 1] = [FieldPath::new("name", &["name"])];
const SPRINT_START: [FieldPath; 3] = [
    FieldPath::new("startDate", &["startDate"]),
    FieldPath::new("start_date", &["start_date"]),
    FieldPath::new("start", &["start"]),
];
const SPRINT_END: [FieldPath; 3] = [
    FieldPath::new("endDate", &["endDate"]),
    FieldPath::new("end_date", &["end_date"]),
    FieldPath::new("end", &["end"]),
];
const SPRINT_STATE: [FieldPath; 1] = [FieldPath::new("state", &["state"])];
const SPRINT_GOAL: [FieldPath; 1] = [FieldPath::new("goal", &["goal"])];

const RUN_ID: [FieldPath; 1] = [FieldPath::new("id", &["id"])];
const RUN_NAME: [FieldPath; 2] = [
    FieldPath::new("name", &["name"]),
    FieldPath::new("workflow", &["workflow"]),
];
const RUN_OUTCOME: [FieldPath; 3] = [
    FieldPath::new("conclusion", &["conclusion"]),
    FieldPath::new("result", &["result"]),
    FieldPath::new("status", &["status"]),
];

/// Records rejected during normalization, per input kind.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct DroppedRecords {
    pub work_items: usize,
    pub commits: usize,
    pub pipeline_runs: usize,
}

impl DroppedRecords {
    pub fn total(&self) -> usize {
        self.work_items + self.commits + self.pipeline_runs
    }
}

/// Canonical, fully materialized inputs of one sprint run.
#[derive(Debug, Clone)]
pub struct SprintRecords {
    pub items: Vec<WorkItem>,
    pub commits: Vec<Commit>,
    pub runs: Vec<PipelineRun>,
    pub sprint: SprintContext,
    pub dropped: DroppedRecords,
}

impl SprintRecords {
    /// Attaches normalized pipeline runs.
    pub fn with_pipeline_runs(mut self, raw_runs: &Value) -> Result<Self> {
        let (runs, dropped) = normalize_pipeline_runs(raw_runs)?;
        self.runs = runs;
        self.dropped.pipeline_runs = dropped;
        Ok(self)
    }
}

pub fn normalize(raw_items: &Value, raw_commits: &Value, raw_sprint: &Value) -> Result<SprintRecords> {
    let (items, dropped_items) = normalize_work_items(raw_items)?;
    let (commits, dropped_commits) = normalize_commits(raw_commits)?;
    let sprint = normalize_sprint(raw_sprint)?;
    debug!(
        items = items.len(),
        commits = commits.len(),
        sprint = %sprint.name,
        "normalized sprint records"
    );
    Ok(SprintRecords {
        items,
        commits,
        runs: vec![],
        sprint,
        dropped: DroppedRecords {
            work_items: dropped_items,
            commits: dropped_commits,
            pipeline_runs: 0,
        },
    })
}

fn records<'a>(raw: &'a Value, input: &'static str) -> Result<&'a Vec<Value>> {
    raw.as_array()
        .ok_or_else(|| ReportError::invalid_input(input, "an array", raw))
}

/// Work items in input order; items without an id or with an already seen
/// id are dropped.
pub fn normalize_work_items(raw: &Value) -> Result<(Vec<WorkItem>, usize)> {
    let mut seen = HashSet::new();
    let mut items = Vec::new();
    let mut dropped = 0;
    for (index, raw_item) in records(raw, "work items")?.iter().enumerate() {
        let Some(item) = work_item(raw_item) else {
            warn!(index, "dropping work item without an id");
            dropped += 1;
            continue;
        };
        if !seen.insert(item.id.clone()) {
            warn!(index, id = %item.id, "dropping duplicate work item");
            dropped += 1;
            continue;
        }
        items.push(item);
    }
    Ok((items, dropped))
}

fn work_item(raw: &Value) -> Option<WorkItem> {
    let id = probe_str(raw, &ITEM_ID)?;
    let title = probe_str(raw, &ITEM_TITLE).unwrap_or_else(|| id.clone());
    let type_name = probe_str(raw, &ITEM_TYPE).unwrap_or_default();
    let status_name = probe_str(raw, &ITEM_STATUS).unwrap_or_else(|| "Unknown".to_string());
    let priority_name = probe_str(raw, &ITEM_PRIORITY).unwrap_or_default();
    let labels = string_list(raw, &ITEM_LABELS);

    let mut item = WorkItem::new(
        id,
        title,
        mapping::work_type(&type_name),
        mapping::status_bucket(&status_name),
        mapping::priority(&priority_name),
    )
    .with_status_name(status_name)
    .with_points(story_points(raw));
    if let Some(assignee) = probe_str(raw, &ITEM_ASSIGNEE) {
        item = item.with_assignee(assignee);
    }
    if mapping::is_blocker_signal(&priority_name)
        || mapping::is_blocker_signal(&type_name)
        || labels.iter().any(|label| mapping::is_blocker_signal(label))
    {
        item = item.as_blocker();
    }
    Some(item)
}

/// Commits in input order; commits without a sha or with an already seen
/// sha are dropped.
pub fn normalize_commits(raw: &Value) -> Result<(Vec<Commit>, usize)> {
    let mut seen = HashSet::new();
    let mut commits = Vec::new();
    let mut dropped = 0;
    for (index, raw_commit) in records(raw, "commits")?.iter().enumerate() {
        let Some(commit) = commit(raw_commit) else {
            warn!(index, "dropping commit without a sha");
            dropped += 1;
            continue;
        };
        if !seen.insert(commit.sha.clone()) {
            warn!(index, sha = %commit.sha, "dropping duplicate commit");
            dropped += 1;
            continue;
        }
        commits.push(commit);
    }
    Ok((commits, dropped))
}

fn commit(raw: &Value) -> Option<Commit> {
    let sha = probe_str(raw, &COMMIT_SHA)?;
    let message = probe_str(raw, &COMMIT_MESSAGE).unwrap_or_default();
    let author = probe_str(raw, &COMMIT_AUTHOR).unwrap_or_default();
    let mut commit = Commit::new(sha, message, author);
    if let Some(timestamp) = probe_str(raw, &COMMIT_TIMESTAMP) {
        match parse_datetime(&timestamp) {
            Some(timestamp) => commit = commit.with_timestamp(timestamp),
            None => warn!(sha = %commit.sha, %timestamp, "ignoring unparseable commit timestamp"),
        }
    }
    if let Some(url) = probe_str(raw, &COMMIT_URL) {
        commit = commit.with_url(url);
    }
    Some(commit)
}

/// `null` yields an unnamed sprint with unknown dates.
pub fn normalize_sprint(raw: &Value) -> Result<SprintContext> {
    if raw.is_null() {
        return Ok(SprintContext::unnamed());
    }
    if !raw.is_object() {
        return Err(ReportError::invalid_input("sprint meta", "an object or null", raw));
    }
    let name = probe_str(raw, &SPRINT_NAME).unwrap_or_else(|| crate::model::UNNAMED_SPRINT.to_string());
    let since = sprint_date(raw, &SPRINT_START, "start");
    let until = sprint_date(raw, &SPRINT_END, "end");
    let state = probe_str(raw, &SPRINT_STATE)
        .map(|state| mapping::sprint_state(&state))
        .unwrap_or(crate::model::SprintState::Unknown);
    let mut sprint = SprintContext::new(name, since, until, state);
    if let Some(goal) = probe_str(raw, &SPRINT_GOAL) {
        sprint = sprint.with_goal(goal);
    }
    if sprint.since.is_some() && sprint.until.is_some() && sprint.duration.is_none() {
        warn!(sprint = %sprint.name, "sprint ends before it starts, duration unknown");
    }
    Ok(sprint)
}

fn sprint_date(
    raw: &Value,
    paths: &[FieldPath],
    which: &'static str,
) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    let value = probe_str(raw, paths)?;
    let parsed = parse_datetime(&value);
    if parsed.is_none() {
        warn!(which, %value, "ignoring unparseable sprint date");
    }
    parsed
}

pub fn normalize_pipeline_runs(raw: &Value) -> Result<(Vec<PipelineRun>, usize)> {
    let mut runs = Vec::new();
    let mut dropped = 0;
    for (index, raw_run) in records(raw, "pipeline runs")?.iter().enumerate() {
        let Some(id) = probe_str(raw_run, &RUN_ID) else {
            warn!(index, "dropping pipeline run without an id");
            dropped += 1;
            continue;
        };
        let name = probe_str(raw_run, &RUN_NAME).unwrap_or_else(|| id.clone());
        let outcome = probe_str(raw_run, &RUN_OUTCOME).unwrap_or_default();
        runs.push(PipelineRun::new(id, name, mapping::run_outcome(&outcome)));
    }
    Ok((runs, dropped))
}
