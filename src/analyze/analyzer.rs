use crate::analyze::contributors::rank_contributors;
use crate::analyze::heuristics::Heuristics;
use crate::analyze::model::{
    BuildHealth, MetricsModel, PriorityResolution, Quality, QualityScore, ResolutionBucket,
    ResolutionStatus, StoryPoints, TypeShare, Velocity,
};
use crate::analyze::narrative::{self, NarrativeFacts};
use crate::analyze::risk::assess_risk;
use crate::analyze::{percent, ratio};
use crate::model::{Commit, PipelineRun, Priority, RunOutcome, WorkItem, WorkType};
use crate::normalize::SprintRecords;
use tracing::debug;

pub trait Analyzer {
    fn analyze(&self, heuristics: &Heuristics) -> MetricsModel;
}

impl Analyzer for SprintRecords {
    fn analyze(&self, heuristics: &Heuristics) -> MetricsModel {
        let mut metrics = aggregate(&self.items, &self.commits, heuristics);
        metrics.build_health = build_health(&self.runs);
        metrics
    }
}

/// Pure aggregation over normalized records. Total over every input,
/// including empty slices: ratios with a zero denominator are 0.
pub fn aggregate(items: &[WorkItem], commits: &[Commit], heuristics: &Heuristics) -> MetricsModel {
    let total_items = items.len();
    let done_items = items.iter().filter(|item| item.is_done()).count();
    let completion_rate = percent(done_items as f64, total_items as f64);

    let story_points = StoryPoints {
        planned: items.iter().map(|item| item.story_points).sum(),
        completed: items
            .iter()
            .filter(|item| item.is_done())
            .map(|item| item.story_points)
            .sum(),
    };
    let velocity = velocity(&story_points, heuristics);
    let quality = quality(items, heuristics);
    let risk = assess_risk(items, heuristics);

    let facts = NarrativeFacts {
        completion_rate,
        open_items: total_items - done_items,
        unassigned_open_items: items
            .iter()
            .filter(|item| !item.is_done() && item.assignee.is_none())
            .count(),
        resolved_critical: items
            .iter()
            .filter(|item| item.is_done() && item.is_critical_or_blocker())
            .count(),
        story_points: &story_points,
        quality: &quality,
        velocity: &velocity,
        risk: &risk,
    };
    let achievements = narrative::achievements(&facts, heuristics);
    let action_items = narrative::action_items(&facts, heuristics);
    let next_steps = narrative::next_steps(&facts);

    debug!(
        total_items,
        done_items,
        completion_rate,
        commits = commits.len(),
        risk = risk.level.label(),
        "aggregated sprint metrics"
    );

    MetricsModel {
        total_items,
        done_items,
        commit_count: commits.len(),
        completion_rate,
        story_points,
        work_types: work_type_breakdown(items),
        priority_resolution: priority_resolution(items),
        contributors: rank_contributors(items, commits, heuristics),
        quality,
        velocity,
        risk,
        build_health: BuildHealth::default(),
        achievements,
        action_items,
        next_steps,
    }
}

/// One entry per [`WorkType`], in its fixed order, including zero counts.
pub fn work_type_breakdown(items: &[WorkItem]) -> Vec<TypeShare> {
    WorkType::ALL
        .iter()
        .map(|&work_type| {
            let of_type = items.iter().filter(|item| item.work_type == work_type);
            let (count, done) = of_type.fold((0, 0), |(count, done), item| {
                (count + 1, done + usize::from(item.is_done()))
            });
            TypeShare {
                work_type,
                count,
                done,
                percentage: percent(count as f64, items.len() as f64),
            }
        })
        .collect()
}

/// Blockers first, then Critical, High, Medium and Low.
pub fn priority_resolution(items: &[WorkItem]) -> Vec<PriorityResolution> {
    let buckets = std::iter::once(ResolutionBucket::Blockers)
        .chain(Priority::RANKED.iter().map(|&p| ResolutionBucket::Priority(p)));
    buckets
        .map(|bucket| {
            let in_bucket = items.iter().filter(|item| match bucket {
                ResolutionBucket::Blockers => item.blocker,
                ResolutionBucket::Priority(priority) => item.priority == priority,
            });
            let (total, resolved) = in_bucket.fold((0, 0), |(total, resolved), item| {
                (total + 1, resolved + usize::from(item.is_done()))
            });
            PriorityResolution {
                bucket,
                resolved,
                total,
                rate: percent(resolved as f64, total as f64),
                status: ResolutionStatus::from_counts(resolved, total),
            }
        })
        .collect()
}

pub fn quality(items: &[WorkItem], heuristics: &Heuristics) -> Quality {
    let total_items = items.len();
    let bugs = items
        .iter()
        .filter(|item| item.work_type == WorkType::Bug)
        .collect::<Vec<_>>();
    let bug_ratio = ratio(bugs.len() as f64, total_items as f64);
    let score = if total_items == 0 {
        QualityScore::NotApplicable
    } else if bug_ratio <= heuristics.quality_excellent_max_bug_ratio {
        QualityScore::Excellent
    } else if bug_ratio <= heuristics.quality_good_max_bug_ratio {
        QualityScore::Good
    } else if bug_ratio <= heuristics.quality_fair_max_bug_ratio {
        QualityScore::Fair
    } else {
        QualityScore::NeedsImprovement
    };
    Quality {
        total_items,
        bugs: bugs.len(),
        bugs_resolved: bugs.iter().filter(|bug| bug.is_done()).count(),
        bug_ratio: percent(bugs.len() as f64, total_items as f64),
        score,
    }
}

pub fn velocity(story_points: &StoryPoints, heuristics: &Heuristics) -> Velocity {
    Velocity {
        planned: story_points.planned,
        actual: story_points.completed,
        percentage: percent(story_points.completed, story_points.planned),
        predicted_next_sprint: forecast(story_points.completed, heuristics),
    }
}

/// `round(actual * forecast_growth_factor)`.
pub fn forecast(actual_velocity: f64, heuristics: &Heuristics) -> u64 {
    let predicted = (actual_velocity * heuristics.forecast_growth_factor).round();
    if predicted.is_finite() && predicted > 0.0 {
        predicted as u64
    } else {
        0
    }
}

pub fn build_health(runs: &[PipelineRun]) -> BuildHealth {
    let count = |outcome: RunOutcome| runs.iter().filter(|run| run.outcome == outcome).count();
    let succeeded = count(RunOutcome::Success);
    BuildHealth {
        total: runs.len(),
        succeeded,
        failed: count(RunOutcome::Failure),
        cancelled: count(RunOutcome::Cancelled),
        success_rate: percent(succeeded as f64, runs.len() as f64),
    }
}
