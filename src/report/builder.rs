//! Section builder: metrics plus normalized records into the ordered,
//! format-neutral report sections.
//!
//! All number formatting happens here. Renderers print the cells as given.

use crate::analyze::{format_points, Heuristics, MetricsModel};
use crate::model::{WorkItem, WorkType};
use crate::normalize::SprintRecords;
use crate::report::document::{Metadata, ReportDocument, Section, SectionId, Table};
use itertools::{EitherOrBoth, Itertools};
use tracing::debug;

/// Types listed under Deliverables, in order.
const DELIVERABLE_TYPES: [WorkType; 3] = [WorkType::Bug, WorkType::Story, WorkType::Task];

pub fn build(
    metrics: &MetricsModel,
    records: &SprintRecords,
    heuristics: &Heuristics,
    generated_at: Option<String>,
) -> ReportDocument {
    let builder = SectionBuilder {
        metrics,
        records,
        heuristics,
    };
    let sections = SectionId::CANONICAL
        .iter()
        .map(|&id| builder.section(id))
        .collect::<Vec<_>>();
    debug!(sections = sections.len(), sprint = %records.sprint.name, "built report document");

    ReportDocument {
        metadata: Metadata {
            title: format!("Sprint Report: {}", records.sprint.name),
            sprint_name: records.sprint.name.clone(),
            date_range: records.sprint.date_range_label(),
            duration: records.sprint.duration_label(),
            state: records.sprint.state.label().to_string(),
            generated_at,
            dropped: records.dropped,
        },
        sections,
    }
}

struct SectionBuilder<'a> {
    metrics: &'a MetricsModel,
    records: &'a SprintRecords,
    heuristics: &'a Heuristics,
}

impl SectionBuilder<'_> {
    fn section(&self, id: SectionId) -> Section {
        match id {
            SectionId::ExecutiveSummary => self.executive_summary(),
            SectionId::SprintGoals => self.sprint_goals(),
            SectionId::Deliverables => self.deliverables(),
            SectionId::SprintComparison => self.sprint_comparison(),
            SectionId::WorkBreakdown => self.work_breakdown(),
            SectionId::Epics => self.items_of_type(id, WorkType::Epic),
            SectionId::Improvements => self.items_of_type(id, WorkType::Improvement),
            SectionId::PriorityResolution => self.priority_resolution(),
            SectionId::TopContributors => self.top_contributors(),
            SectionId::QualityMetrics => self.quality_metrics(),
            SectionId::VelocityAnalysis => self.velocity_analysis(),
            SectionId::RiskAssessment => self.risk_assessment(),
            SectionId::ActionItems => Section::new(id).numbered(self.metrics.action_items.clone()),
            SectionId::NextSteps => Section::new(id).numbered(self.metrics.next_steps.clone()),
            SectionId::Acknowledgements => self.acknowledgements(),
        }
    }

    fn executive_summary(&self) -> Section {
        let m = self.metrics;
        let sprint = &self.records.sprint;
        let mut section = Section::new(SectionId::ExecutiveSummary).paragraph(format!(
            "{} ({}, {}) completed {} of {} work items ({}% completion) and delivered {} of {} planned story points across {} commits.",
            sprint.name,
            sprint.date_range_label(),
            sprint.duration_label(),
            m.done_items,
            m.total_items,
            m.completion_rate,
            format_points(m.story_points.completed),
            format_points(m.story_points.planned),
            m.commit_count,
        ));
        let dropped = self.records.dropped.total();
        if dropped > 0 {
            section = section.paragraph(format!(
                "{dropped} malformed record(s) were skipped during import."
            ));
        }
        section.table(
            Table::new(&["Metric", "Value"])
                .row(cells(["Completion Rate", &percent(m.completion_rate)]))
                .row(cells([
                    "Work Items Completed",
                    &format!("{} / {}", m.done_items, m.total_items),
                ]))
                .row(cells([
                    "Story Points Completed",
                    &format!(
                        "{} / {}",
                        format_points(m.story_points.completed),
                        format_points(m.story_points.planned)
                    ),
                ]))
                .row(cells(["Open Items", &m.open_items().to_string()]))
                .row(cells(["Commits", &m.commit_count.to_string()]))
                .row(cells(["Quality Score", m.quality.score.label()]))
                .row(cells(["Risk Level", m.risk.level.label()])),
        )
    }

    fn sprint_goals(&self) -> Section {
        let mut section = Section::new(SectionId::SprintGoals);
        if let Some(goal) = &self.records.sprint.goal {
            section = section.paragraph(format!("Sprint goal: {goal}"));
        }
        let mut objectives = DELIVERABLE_TYPES
            .iter()
            .filter_map(|&work_type| self.metrics.type_share(work_type))
            .filter(|share| share.count > 0)
            .map(|share| {
                format!(
                    "{}: {} of {} completed",
                    share.work_type.plural(),
                    share.done,
                    share.count
                )
            })
            .collect::<Vec<_>>();
        objectives.extend(self.items(WorkType::Epic).map(|epic| {
            format!("Advance epic {}: {}", epic.id, epic.title)
        }));
        if self.metrics.story_points.planned > 0.0 {
            objectives.push(format!(
                "Deliver {} planned story points",
                format_points(self.metrics.story_points.planned)
            ));
        }
        if objectives.is_empty() {
            objectives.push("No objectives recorded for this sprint".to_string());
        }
        section.bullets(objectives)
    }

    fn deliverables(&self) -> Section {
        let mut section = Section::new(SectionId::Deliverables);
        for work_type in DELIVERABLE_TYPES {
            let done = self
                .items(work_type)
                .filter(|item| item.is_done())
                .collect::<Vec<_>>();
            if done.is_empty() {
                section = section.paragraph(format!(
                    "No {} completed.",
                    work_type.plural().to_lowercase()
                ));
                continue;
            }
            let table = done.iter().fold(
                Table::new(&["Key", "Summary", "Assignee", "Points"])
                    .with_caption(format!("{} ({} completed)", work_type.plural(), done.len())),
                |table, item| {
                    table.row(vec![
                        item.id.clone(),
                        item.title.clone(),
                        assignee(item),
                        format_points(item.story_points),
                    ])
                },
            );
            section = section.table(table);
        }
        section
    }

    fn sprint_comparison(&self) -> Section {
        let m = self.metrics;
        let factor = self.heuristics.previous_sprint_factor;
        let estimate = |current: f64| (current * factor).round().max(0.0);
        let row = |label: &str, current: f64, suffix: &str| {
            let previous = estimate(current);
            vec![
                label.to_string(),
                format!("{}{suffix}", format_points(previous)),
                format!("{}{suffix}", format_points(current)),
                signed(current - previous),
            ]
        };
        Section::new(SectionId::SprintComparison)
            .paragraph(format!(
                "No history is available for the previous sprint. Its values are estimated as {}x the current sprint and are not historical data.",
                format_points(factor)
            ))
            .table(
                Table::new(&["Metric", "Previous (estimated)", "Current", "Change"])
                    .row(row("Completion Rate", m.completion_rate as f64, "%"))
                    .row(row("Items Completed", m.done_items as f64, ""))
                    .row(row("Story Points Completed", m.story_points.completed, ""))
                    .row(row("Commits", m.commit_count as f64, "")),
            )
    }

    fn work_breakdown(&self) -> Section {
        let shares = self
            .metrics
            .work_types
            .iter()
            .filter(|share| share.count > 0)
            .collect::<Vec<_>>();
        let section = Section::new(SectionId::WorkBreakdown);
        if shares.is_empty() {
            return section.paragraph("No work items in this sprint.");
        }
        let table = shares.iter().fold(
            Table::new(&["Type", "Count", "Completed", "Share"]),
            |table, share| {
                table.row(vec![
                    share.work_type.label().to_string(),
                    share.count.to_string(),
                    share.done.to_string(),
                    percent(share.percentage),
                ])
            },
        );
        section
            .table(table)
            .paragraph("Shares are rounded per type and may not add up to exactly 100%.")
    }

    fn items_of_type(&self, id: SectionId, work_type: WorkType) -> Section {
        let items = self.items(work_type).collect::<Vec<_>>();
        let section = Section::new(id);
        if items.is_empty() {
            return section.paragraph(format!(
                "No {} tracked in this sprint.",
                work_type.plural().to_lowercase()
            ));
        }
        section.table(items.iter().fold(
            Table::new(&["Key", "Summary", "Status", "Assignee", "Points"]),
            |table, item| {
                table.row(vec![
                    item.id.clone(),
                    item.title.clone(),
                    item.status_name.clone(),
                    assignee(item),
                    format_points(item.story_points),
                ])
            },
        ))
    }

    fn priority_resolution(&self) -> Section {
        let table = self.metrics.priority_resolution.iter().fold(
            Table::new(&["Priority", "Resolved", "Total", "Rate", "Status"]),
            |table, resolution| {
                table.row(vec![
                    resolution.bucket.label().to_string(),
                    resolution.resolved.to_string(),
                    resolution.total.to_string(),
                    percent(resolution.rate),
                    resolution.status.label().to_string(),
                ])
            },
        );
        Section::new(SectionId::PriorityResolution).table(table)
    }

    fn top_contributors(&self) -> Section {
        let section = Section::new(SectionId::TopContributors);
        if self.metrics.contributors.is_empty() {
            return section.paragraph("No contributor activity recorded.");
        }
        let table = self.metrics.contributors.iter().enumerate().fold(
            Table::new(&["Rank", "Contributor", "Commits", "Issues", "Story Points", "Score"]),
            |table, (index, contributor)| {
                table.row(vec![
                    (index + 1).to_string(),
                    contributor.name.clone(),
                    contributor.commits.to_string(),
                    contributor.issues.to_string(),
                    format_points(contributor.story_points),
                    format!("{:.1}", contributor.score),
                ])
            },
        );
        section.table(table).paragraph(format!(
            "Score = commits + assigned issues + completed story points / {}.",
            format_points(self.heuristics.story_points_weight_divisor)
        ))
    }

    fn quality_metrics(&self) -> Section {
        let quality = &self.metrics.quality;
        let build = &self.metrics.build_health;
        let mut table = Table::new(&["Metric", "Value"])
            .row(cells(["Total Work Items", &quality.total_items.to_string()]))
            .row(cells(["Bugs", &quality.bugs.to_string()]))
            .row(cells(["Bugs Resolved", &quality.bugs_resolved.to_string()]))
            .row(cells(["Bug Ratio", &percent(quality.bug_ratio)]))
            .row(cells(["Quality Score", quality.score.label()]));
        if build.has_runs() {
            table.push(cells(["Pipeline Runs", &build.total.to_string()]));
            table.push(cells(["Successful Runs", &build.succeeded.to_string()]));
            table.push(cells(["Failed Runs", &build.failed.to_string()]));
            table.push(cells(["Cancelled Runs", &build.cancelled.to_string()]));
            table.push(cells(["Build Success Rate", &percent(build.success_rate)]));
        } else {
            table.push(cells(["Pipeline Runs", "No pipeline data"]));
        }
        Section::new(SectionId::QualityMetrics).table(table)
    }

    fn velocity_analysis(&self) -> Section {
        let velocity = &self.metrics.velocity;
        let growth = (self.heuristics.forecast_growth_factor - 1.0) * 100.0;
        Section::new(SectionId::VelocityAnalysis)
            .table(
                Table::new(&["Metric", "Value"])
                    .row(cells([
                        "Planned Velocity",
                        &format!("{} points", format_points(velocity.planned)),
                    ]))
                    .row(cells([
                        "Actual Velocity",
                        &format!("{} points", format_points(velocity.actual)),
                    ]))
                    .row(cells(["Velocity Percentage", &percent(velocity.percentage)]))
                    .row(cells([
                        "Predicted Next Sprint",
                        &format!("{} points", velocity.predicted_next_sprint),
                    ])),
            )
            .paragraph(format!(
                "The next-sprint figure applies a fixed {growth:.0}% growth heuristic to the actual velocity. It is not a statistical forecast."
            ))
    }

    fn risk_assessment(&self) -> Section {
        let risk = &self.metrics.risk;
        let section = Section::new(SectionId::RiskAssessment).paragraph(format!(
            "Risk level: {} ({} open critical or blocking item(s))",
            risk.level.label(),
            risk.open_critical
        ));
        if risk.factors.is_empty() {
            return section
                .paragraph("No significant risk factors identified. Recommended practices:")
                .bullets(risk.mitigations.clone());
        }
        let table = risk
            .factors
            .iter()
            .zip_longest(risk.mitigations.iter())
            .fold(Table::new(&["Risk Factor", "Mitigation"]), |table, pair| {
                let (factor, mitigation) = match pair {
                    EitherOrBoth::Both(factor, mitigation) => (factor.clone(), mitigation.clone()),
                    EitherOrBoth::Left(factor) => (factor.clone(), String::new()),
                    EitherOrBoth::Right(mitigation) => (String::new(), mitigation.clone()),
                };
                table.row(vec![factor, mitigation])
            });
        section.table(table)
    }

    fn acknowledgements(&self) -> Section {
        let section = Section::new(SectionId::Acknowledgements);
        if self.metrics.contributors.is_empty() {
            return section.paragraph("Thanks to the whole team for their work this sprint.");
        }
        section
            .paragraph(format!(
                "Thanks to everyone who contributed to {}.",
                self.records.sprint.name
            ))
            .bullets(
                self.metrics
                    .contributors
                    .iter()
                    .map(|contributor| {
                        format!(
                            "{}: {} commit(s), {} issue(s), {} story point(s)",
                            contributor.name,
                            contributor.commits,
                            contributor.issues,
                            format_points(contributor.story_points)
                        )
                    })
                    .collect(),
            )
    }

    fn items(&self, work_type: WorkType) -> impl Iterator<Item = &WorkItem> + '_ {
        self.records
            .items
            .iter()
            .filter(move |item| item.work_type == work_type)
    }
}

fn cells<const N: usize>(values: [&str; N]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn percent(value: u32) -> String {
    format!("{value}%")
}

fn signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{}", format_points(value))
    } else {
        format!("-{}", format_points(-value))
    }
}

fn assignee(item: &WorkItem) -> String {
    item.assignee
        .clone()
        .unwrap_or_else(|| "Unassigned".to_string())
}
