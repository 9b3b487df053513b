pub mod analyzer;
pub mod contributors;
pub mod heuristics;
pub mod model;
pub mod narrative;
pub mod risk;

pub use analyzer::{aggregate, Analyzer};
pub use heuristics::Heuristics;
pub use model::*;

/// `part / whole`, or 0 when `whole` is not positive.
pub fn ratio(part: f64, whole: f64) -> f64 {
    if whole > 0.0 && part.is_finite() && whole.is_finite() {
        part / whole
    } else {
        0.0
    }
}

/// `round(part / whole * 100)` as an integer, 0 on a zero denominator.
pub fn percent(part: f64, whole: f64) -> u32 {
    let percent = (ratio(part, whole) * 100.0).round();
    if percent > 0.0 {
        percent as u32
    } else {
        0
    }
}

/// Story points without a trailing `.0`: `5`, `2.5`.
pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{points:.0}")
    } else {
        let formatted = format!("{points:.2}");
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
