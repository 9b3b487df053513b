use pretty_assertions::assert_eq;
use serde_json::json;
use sprint_report::analyze::{aggregate, Analyzer, Heuristics, MetricsModel};
use sprint_report::model::{Commit, Priority, StatusBucket, WorkItem, WorkType};
use sprint_report::normalize::{normalize, SprintRecords};
use sprint_report::report::{build, render_all, Format, SectionId};
use sprint_report::ReportError;

fn item(id: &str, status: StatusBucket, priority: Priority) -> WorkItem {
    WorkItem::new(id, format!("Item {id}"), WorkType::Task, status, priority)
}

fn records(items: Vec<WorkItem>, commits: Vec<Commit>) -> SprintRecords {
    let mut records = normalize(&json!([]), &json!([]), &json!({"name": "Sprint 7"})).unwrap();
    records.items = items;
    records.commits = commits;
    records
}

fn render(metrics: &MetricsModel, records: &SprintRecords) -> Vec<(Format, String)> {
    let document = build(metrics, records, &Heuristics::default(), None);
    render_all(&document, &Format::ALL)
}

/// Cells of the first table row whose first cell is `label`.
fn table_row(format: Format, output: &str, label: &str) -> Option<Vec<String>> {
    output.lines().find_map(|line| {
        let cells = match format {
            Format::Html => line
                .split("<td>")
                .skip(1)
                .map(|cell| cell.split("</td>").next().unwrap_or_default().to_string())
                .collect::<Vec<_>>(),
            Format::Wiki | Format::Markdown => line
                .split('|')
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .map(str::to_string)
                .collect(),
        };
        (cells.first().map(String::as_str) == Some(label)).then_some(cells)
    })
}

fn section_titles(format: Format, output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| match format {
            Format::Wiki => line.strip_prefix("h2. ").map(str::to_string),
            Format::Markdown => line.strip_prefix("## ").map(str::to_string),
            Format::Html => line
                .strip_prefix("<h2>")
                .and_then(|rest| rest.strip_suffix("</h2>"))
                .map(|title| title.replace("&amp;", "&")),
        })
        .collect()
}

#[test]
fn six_of_ten_done_is_sixty_percent() {
    let items = (0..10)
        .map(|i| {
            let status = if i < 6 { StatusBucket::Done } else { StatusBucket::InProgress };
            item(&format!("A-{i}"), status, Priority::Medium)
        })
        .collect::<Vec<_>>();
    let metrics = aggregate(&items, &[], &Heuristics::default());
    assert_eq!(metrics.completion_rate, 60);

    let records = records(items, vec![]);
    for (format, output) in render(&metrics, &records) {
        assert_eq!(
            table_row(format, &output, "Completion Rate"),
            Some(vec!["Completion Rate".to_string(), "60%".to_string()]),
            "{format:?}"
        );
    }
}

#[test]
fn empty_sprint_is_total() {
    let metrics = aggregate(&[], &[], &Heuristics::default());
    assert_eq!(metrics.completion_rate, 0);
    assert_eq!(metrics.quality.score.label(), "N/A");
    assert_eq!(metrics.risk.level.label(), "LOW");
    assert!(metrics.contributors.is_empty());

    let records = records(vec![], vec![]);
    let outputs = render(&metrics, &records);
    assert_eq!(outputs.len(), 3);
    for (_, output) in outputs {
        assert!(!output.is_empty());
    }
}

#[test]
fn three_open_critical_items_are_medium_risk() {
    let items = vec![
        item("C-1", StatusBucket::Done, Priority::Critical),
        item("C-2", StatusBucket::Todo, Priority::Critical),
        item("C-3", StatusBucket::InProgress, Priority::Critical),
        item("C-4", StatusBucket::Todo, Priority::Critical),
    ];
    let metrics = aggregate(&items, &[], &Heuristics::default());
    assert_eq!(metrics.risk.open_critical, 3);
    assert_eq!(metrics.risk.level.label(), "MEDIUM");
}

#[test]
fn contributors_are_ranked_by_composite_score() {
    let commits = vec![
        Commit::new("a1", "first", "A"),
        Commit::new("a2", "second", "A"),
        Commit::new("b1", "third", "B"),
    ];
    let items = vec![item("D-1", StatusBucket::Done, Priority::Medium)
        .with_assignee("A")
        .with_points(5.0)];
    let metrics = aggregate(&items, &commits, &Heuristics::default());

    let top = &metrics.contributors[0];
    assert_eq!(top.name, "A");
    assert_eq!((top.commits, top.issues, top.story_points), (2, 1, 5.0));
    assert_eq!(top.score, 4.0);
    assert_eq!(metrics.contributors[1].name, "B");
    assert_eq!(metrics.contributors[1].score, 1.0);
}

#[test]
fn every_format_has_the_same_sections() {
    let items = vec![
        item("E-1", StatusBucket::Done, Priority::High).with_assignee("Ann"),
        item("E-2", StatusBucket::Todo, Priority::Low),
    ];
    let records = records(items, vec![Commit::new("e1", "fix | pipe & <tag>", "Ann")]);
    let metrics = records.analyze(&Heuristics::default());
    let document = build(&metrics, &records, &Heuristics::default(), None);
    let expected = SectionId::CANONICAL
        .iter()
        .map(|id| id.title())
        .collect::<Vec<_>>();
    assert_eq!(document.titles(), expected);

    for (format, output) in render_all(&document, &Format::ALL) {
        assert_eq!(section_titles(format, &output), document.titles(), "{format:?}");
    }
}

#[test]
fn multi_line_text_cannot_add_sections() {
    let items = vec![
        WorkItem::new(
            "EP-1",
            "Payments\n## Rollout\nh2. Rollout\n---",
            WorkType::Epic,
            StatusBucket::InProgress,
            Priority::High,
        ),
        item("T-1", StatusBucket::Done, Priority::Low),
    ];
    let mut records = records(items, vec![]);
    records.sprint = records
        .sprint
        .clone()
        .with_goal("Ship refunds\n## Stretch goals\n- more\n<h2>Extra</h2>");
    let metrics = records.analyze(&Heuristics::default());
    let document = build(&metrics, &records, &Heuristics::default(), None);

    for (format, output) in render_all(&document, &Format::ALL) {
        assert_eq!(section_titles(format, &output), document.titles(), "{format:?}");
    }
}

#[test]
fn raw_tracker_export_flows_through() {
    let raw_items = json!([
        {
            "key": "PAY-1",
            "fields": {
                "summary": "Refund flow",
                "issuetype": {"name": "Story"},
                "status": {"name": "Closed"},
                "priority": {"name": "High"},
                "assignee": {"displayName": "Ann"},
                "customfield_10016": 3
            }
        },
        {"id": "PAY-2", "title": "Crash on save", "type": "Bug", "status": "Open", "story_points": "2"},
        {"fields": {"summary": "no id"}},
        {"key": "PAY-1", "fields": {"summary": "duplicate"}}
    ]);
    let raw_commits = json!([
        {"sha": "abc123", "message": "Refund flow\n\nDetails", "author": "Ann", "timestamp": "2024-03-05T10:00:00Z"},
        {"sha": "def456", "message": "Anonymous", "author": ""}
    ]);
    let raw_sprint = json!({"name": "Sprint 14", "startDate": "2024-03-01", "endDate": "2024-03-15", "state": "closed"});

    let records = normalize(&raw_items, &raw_commits, &raw_sprint)
        .unwrap()
        .with_pipeline_runs(&json!([
            {"id": 1, "name": "ci", "conclusion": "success"},
            {"id": 2, "name": "ci", "conclusion": "failure"}
        ]))
        .unwrap();
    assert_eq!(records.items.len(), 2);
    assert_eq!(records.dropped.work_items, 2);
    assert_eq!(records.commits[1].author, "Unknown");
    assert_eq!(records.sprint.duration_label(), "2 weeks");

    let metrics = records.analyze(&Heuristics::default());
    assert_eq!(metrics.completion_rate, 50);
    assert_eq!(metrics.story_points.planned, 5.0);
    assert_eq!(metrics.story_points.completed, 3.0);
    assert_eq!(metrics.build_health.success_rate, 50);

    let document = build(&metrics, &records, &Heuristics::default(), Some("2024-03-16 09:00".into()));
    assert_eq!(document.metadata.title, "Sprint Report: Sprint 14");
    let wiki = render_all(&document, &[Format::Wiki]).remove(0).1;
    assert!(wiki.starts_with("h1. Sprint Report: Sprint 14\n"));
}

#[test]
fn wrong_top_level_shape_is_rejected() {
    let err = normalize(&json!({"key": "A-1"}), &json!([]), &json!(null)).unwrap_err();
    assert!(matches!(err, ReportError::InvalidInput { input: "work items", .. }));
    let err = normalize(&json!([]), &json!(null), &json!(null)).unwrap_err();
    assert!(matches!(err, ReportError::InvalidInput { input: "commits", .. }));
    let err = normalize(&json!([]), &json!([]), &json!("Sprint 1")).unwrap_err();
    assert!(matches!(err, ReportError::InvalidInput { input: "sprint meta", .. }));
}
