//! Threshold rules that turn numbers into narrative bullets.
//!
//! These read like findings but are plain rules of thumb over completion
//! rate, delivered points and resolved critical work. They describe the
//! sprint; they do not predict anything.

use crate::analyze::heuristics::Heuristics;
use crate::analyze::model::{Quality, RiskAssessment, RiskLevel, StoryPoints, Velocity};
use crate::analyze::format_points;

/// Inputs the narrative rules look at.
pub struct NarrativeFacts<'a> {
    pub completion_rate: u32,
    pub open_items: usize,
    pub unassigned_open_items: usize,
    pub resolved_critical: usize,
    pub story_points: &'a StoryPoints,
    pub quality: &'a Quality,
    pub velocity: &'a Velocity,
    pub risk: &'a RiskAssessment,
}

pub fn achievements(facts: &NarrativeFacts<'_>, heuristics: &Heuristics) -> Vec<String> {
    let mut achievements = Vec::new();
    if facts.completion_rate >= heuristics.outstanding_completion_rate {
        achievements.push(format!(
            "Outstanding completion rate of {}%",
            facts.completion_rate
        ));
    } else if facts.completion_rate >= heuristics.strong_completion_rate {
        achievements.push(format!("Strong completion rate of {}%", facts.completion_rate));
    }
    if facts.story_points.completed > 0.0 {
        achievements.push(format!(
            "Delivered {} story points",
            format_points(facts.story_points.completed)
        ));
    }
    if facts.resolved_critical > 0 {
        achievements.push(format!(
            "Resolved {} critical-priority issue(s)",
            facts.resolved_critical
        ));
    }
    if facts.quality.bugs_resolved > 0 {
        achievements.push(format!("Fixed {} bug(s)", facts.quality.bugs_resolved));
    }
    if achievements.is_empty() {
        achievements.push("Sprint closed with lessons to carry into the next iteration".to_string());
    }
    achievements
}

pub fn action_items(facts: &NarrativeFacts<'_>, heuristics: &Heuristics) -> Vec<String> {
    let mut actions = Vec::new();
    if facts.completion_rate < heuristics.strong_completion_rate {
        actions.push("Review sprint scope and estimation accuracy".to_string());
    }
    if facts.risk.open_critical > 0 {
        actions.push(format!(
            "Prioritize {} open critical or blocking issue(s)",
            facts.risk.open_critical
        ));
    }
    if facts.quality.total_items > 0
        && facts.quality.bugs as f64 / facts.quality.total_items as f64
            > heuristics.quality_good_max_bug_ratio
    {
        actions.push("Reserve capacity for bug reduction next sprint".to_string());
    }
    if facts.velocity.planned > 0.0 && facts.velocity.percentage < heuristics.velocity_rebaseline_rate {
        actions.push("Re-baseline the sprint commitment against delivered velocity".to_string());
    }
    if facts.unassigned_open_items > 0 {
        actions.push(format!(
            "Assign owners to {} unassigned open item(s)",
            facts.unassigned_open_items
        ));
    }
    if actions.is_empty() {
        actions.push("Maintain current practices".to_string());
    }
    actions
}

pub fn next_steps(facts: &NarrativeFacts<'_>) -> Vec<String> {
    let mut steps = vec![format!(
        "Plan the next sprint around {} story points (growth heuristic)",
        facts.velocity.predicted_next_sprint
    )];
    if facts.open_items > 0 {
        steps.push(format!(
            "Carry over or re-plan {} unfinished item(s)",
            facts.open_items
        ));
    }
    if facts.risk.level == RiskLevel::High {
        steps.push("Escalate high-risk items to stakeholders".to_string());
    }
    steps.push("Hold the sprint retrospective and record outcomes".to_string());
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::model::QualityScore;

    fn facts<'a>(
        completion_rate: u32,
        points: &'a StoryPoints,
        quality: &'a Quality,
        velocity: &'a Velocity,
        risk: &'a RiskAssessment,
    ) -> NarrativeFacts<'a> {
        NarrativeFacts {
            completion_rate,
            open_items: 0,
            unassigned_open_items: 0,
            resolved_critical: 0,
            story_points: points,
            quality,
            velocity,
            risk,
        }
    }

    fn fixtures() -> (StoryPoints, Quality, Velocity, RiskAssessment) {
        (
            StoryPoints::default(),
            Quality {
                total_items: 0,
                bugs: 0,
                bugs_resolved: 0,
                bug_ratio: 0,
                score: QualityScore::NotApplicable,
            },
            Velocity {
                planned: 0.0,
                actual: 0.0,
                percentage: 0,
                predicted_next_sprint: 0,
            },
            RiskAssessment {
                level: RiskLevel::Low,
                open_critical: 0,
                open_blockers: 0,
                factors: vec![],
                mitigations: vec![],
            },
        )
    }

    #[test]
    fn completion_bands() {
        let (points, quality, velocity, risk) = fixtures();
        let heuristics = Heuristics::default();
        let top = achievements(&facts(95, &points, &quality, &velocity, &risk), &heuristics);
        assert_eq!(top[0], "Outstanding completion rate of 95%");
        let strong = achievements(&facts(70, &points, &quality, &velocity, &risk), &heuristics);
        assert_eq!(strong[0], "Strong completion rate of 70%");
        let weak = achievements(&facts(40, &points, &quality, &velocity, &risk), &heuristics);
        assert_eq!(weak.len(), 1);
        assert!(weak[0].starts_with("Sprint closed"));
    }

    #[test]
    fn low_completion_asks_for_scope_review() {
        let (points, quality, velocity, risk) = fixtures();
        let actions = action_items(
            &facts(50, &points, &quality, &velocity, &risk),
            &Heuristics::default(),
        );
        assert_eq!(actions, vec!["Review sprint scope and estimation accuracy".to_string()]);
    }

    #[test]
    fn next_steps_start_with_forecast() {
        let (points, quality, mut velocity, risk) = fixtures();
        velocity.predicted_next_sprint = 22;
        let steps = next_steps(&facts(100, &points, &quality, &velocity, &risk));
        assert!(steps[0].contains("22 story points"));
        assert!(steps.last().unwrap().contains("retrospective"));
    }
}
