use crate::analyze::heuristics::Heuristics;
use crate::analyze::model::Contributor;
use crate::model::{Commit, WorkItem};
use indexmap::IndexMap;

/// Ranks people by `commits + issues + done_points / divisor`.
///
/// Commit authors are visited first, then assignees, and the map keeps
/// first-seen order, so equal scores rank in that order. Unassigned items do
/// not count for anybody.
pub fn rank_contributors(
    items: &[WorkItem],
    commits: &[Commit],
    heuristics: &Heuristics,
) -> Vec<Contributor> {
    let mut contributors: IndexMap<&str, Contributor> = IndexMap::new();

    for commit in commits {
        contributors
            .entry(commit.author.as_str())
            .or_insert_with(|| new_contributor(&commit.author))
            .commits += 1;
    }
    for item in items {
        let Some(assignee) = item.assignee.as_deref() else {
            continue;
        };
        let contributor = contributors
            .entry(assignee)
            .or_insert_with(|| new_contributor(assignee));
        contributor.issues += 1;
        if item.is_done() {
            contributor.story_points += item.story_points;
        }
    }

    let mut ranked = contributors
        .into_values()
        .map(|mut contributor| {
            contributor.score = score(&contributor, heuristics);
            contributor
        })
        .collect::<Vec<_>>();
    // Stable sort keeps first-seen order among equal scores.
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(heuristics.top_contributors);
    ranked
}

fn new_contributor(name: &str) -> Contributor {
    Contributor {
        name: name.to_string(),
        commits: 0,
        issues: 0,
        story_points: 0.0,
        score: 0.0,
    }
}

pub fn score(contributor: &Contributor, heuristics: &Heuristics) -> f64 {
    let points = if heuristics.story_points_weight_divisor > 0.0 {
        contributor.story_points / heuristics.story_points_weight_divisor
    } else {
        0.0
    };
    contributor.commits as f64 + contributor.issues as f64 + points
}
