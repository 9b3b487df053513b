use crate::analyze::heuristics::Heuristics;
use crate::analyze::model::{RiskAssessment, RiskLevel};
use crate::analyze::ratio;
use crate::model::{Priority, WorkItem};

const DEFAULT_MITIGATIONS: [&str; 2] = [
    "Continue monitoring sprint progress in daily stand-ups",
    "Keep backlog refinement on its regular cadence",
];

pub const OPEN_ISSUES_FACTOR: &str = "High number of open issues";

pub fn assess_risk(items: &[WorkItem], heuristics: &Heuristics) -> RiskAssessment {
    let open = items.iter().filter(|item| !item.is_done()).collect::<Vec<_>>();
    let open_critical = open
        .iter()
        .filter(|item| item.is_critical_or_blocker())
        .count();
    let open_blockers = open.iter().filter(|item| item.blocker).count();
    let open_critical_priority = open
        .iter()
        .filter(|item| item.priority == Priority::Critical)
        .count();

    let level = if open_critical > heuristics.risk_high_open_critical {
        RiskLevel::High
    } else if open_critical > heuristics.risk_medium_open_critical {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    let mut factors = Vec::new();
    let mut mitigations = Vec::new();
    if ratio(open.len() as f64, items.len() as f64) > heuristics.risk_open_issue_ratio {
        factors.push(OPEN_ISSUES_FACTOR.to_string());
        mitigations.push(format!(
            "Re-prioritize the {} open of {} items and carry over only committed work",
            open.len(),
            items.len()
        ));
    }
    if open_blockers > 0 {
        factors.push(format!("{open_blockers} unresolved blocker(s)"));
        mitigations.push("Escalate blockers in stand-up and assign a single owner to each".to_string());
    }
    if open_critical_priority > 0 {
        factors.push(format!(
            "{open_critical_priority} critical-priority issue(s) still open"
        ));
        mitigations.push("Swarm on critical issues before pulling in new work".to_string());
    }
    if factors.is_empty() {
        mitigations = DEFAULT_MITIGATIONS.iter().map(|m| m.to_string()).collect();
    }

    RiskAssessment {
        level,
        open_critical,
        open_blockers,
        factors,
        mitigations,
    }
}
