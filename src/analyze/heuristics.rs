//! Tunable heuristics behind the derived metrics.
//!
//! None of these are statistics. They are fixed rules of thumb, named so a
//! test can pin exact output and a caller can swap one without touching the
//! aggregation code. A partial JSON document overrides individual values:
//!
//! ```json
//! { "forecast_growth_factor": 1.05, "top_contributors": 5 }
//! ```

use serde::Deserialize;
use std::fs;

/// Next-sprint forecast is `round(actual_velocity * FORECAST_GROWTH_FACTOR)`.
pub const FORECAST_GROWTH_FACTOR: f64 = 1.1;
/// Estimated previous sprint is `round(current * PREVIOUS_SPRINT_FACTOR)`.
/// There is no historical source; the comparison is labeled as estimated.
pub const PREVIOUS_SPRINT_FACTOR: f64 = 0.9;
/// Completed story points weigh `points / STORY_POINTS_WEIGHT_DIVISOR` in the
/// contributor score, so one large estimate cannot dominate the ranking.
pub const STORY_POINTS_WEIGHT_DIVISOR: f64 = 5.0;
pub const TOP_CONTRIBUTORS: usize = 10;

/// Upper bounds of the bug ratio for Excellent, Good and Fair.
pub const QUALITY_EXCELLENT_MAX_BUG_RATIO: f64 = 0.10;
pub const QUALITY_GOOD_MAX_BUG_RATIO: f64 = 0.20;
pub const QUALITY_FAIR_MAX_BUG_RATIO: f64 = 0.30;

/// Open critical/blocker items strictly above which risk is HIGH.
pub const RISK_HIGH_OPEN_CRITICAL: usize = 3;
/// Open critical/blocker items strictly above which risk is MEDIUM.
pub const RISK_MEDIUM_OPEN_CRITICAL: usize = 1;
/// Open-to-total ratio strictly above which open work is a risk factor.
pub const RISK_OPEN_ISSUE_RATIO: f64 = 0.3;

pub const OUTSTANDING_COMPLETION_RATE: u32 = 90;
pub const STRONG_COMPLETION_RATE: u32 = 70;
/// Velocity percentage under which the commitment should be re-baselined.
pub const VELOCITY_REBASELINE_RATE: u32 = 80;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    pub forecast_growth_factor: f64,
    pub previous_sprint_factor: f64,
    pub story_points_weight_divisor: f64,
    pub top_contributors: usize,
    pub quality_excellent_max_bug_ratio: f64,
    pub quality_good_max_bug_ratio: f64,
    pub quality_fair_max_bug_ratio: f64,
    pub risk_high_open_critical: usize,
    pub risk_medium_open_critical: usize,
    pub risk_open_issue_ratio: f64,
    pub outstanding_completion_rate: u32,
    pub strong_completion_rate: u32,
    pub velocity_rebaseline_rate: u32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            forecast_growth_factor: FORECAST_GROWTH_FACTOR,
            previous_sprint_factor: PREVIOUS_SPRINT_FACTOR,
            story_points_weight_divisor: STORY_POINTS_WEIGHT_DIVISOR,
            top_contributors: TOP_CONTRIBUTORS,
            quality_excellent_max_bug_ratio: QUALITY_EXCELLENT_MAX_BUG_RATIO,
            quality_good_max_bug_ratio: QUALITY_GOOD_MAX_BUG_RATIO,
            quality_fair_max_bug_ratio: QUALITY_FAIR_MAX_BUG_RATIO,
            risk_high_open_critical: RISK_HIGH_OPEN_CRITICAL,
            risk_medium_open_critical: RISK_MEDIUM_OPEN_CRITICAL,
            risk_open_issue_ratio: RISK_OPEN_ISSUE_RATIO,
            outstanding_completion_rate: OUTSTANDING_COMPLETION_RATE,
            strong_completion_rate: STRONG_COMPLETION_RATE,
            velocity_rebaseline_rate: VELOCITY_REBASELINE_RATE,
        }
    }
}

// Create
impl Heuristics {
    pub fn from_config(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let json_str = fs::read_to_string(path)?;
        Ok(Self::parse(&json_str)?)
    }

    pub fn parse(json_str: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_other_defaults() {
        let heuristics = Heuristics::parse(r#"{"forecast_growth_factor": 1.25}"#).unwrap();
        assert_eq!(heuristics.forecast_growth_factor, 1.25);
        assert_eq!(heuristics.previous_sprint_factor, PREVIOUS_SPRINT_FACTOR);
        assert_eq!(heuristics.top_contributors, TOP_CONTRIBUTORS);
    }

    #[test]
    fn unknown_shape_is_an_error() {
        assert!(Heuristics::parse(r#"{"top_contributors": "ten"}"#).is_err());
    }
}
