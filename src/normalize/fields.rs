//! Field lookup over raw tracker/VCS JSON.
//!
//! Raw records arrive in more than one shape, so every canonical field is
//! read through an ordered list of candidate paths. The first path holding a
//! non-null value wins.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde_json::Value;

/// A named location inside a raw record, e.g. `fields.customfield_10016`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FieldPath {
    pub name: &'static str,
    pub path: &'static [&'static str],
}

impl FieldPath {
    pub const fn new(name: &'static str, path: &'static [&'static str]) -> Self {
        Self { name, path }
    }

    pub fn lookup<'a>(&self, raw: &'a Value) -> Option<&'a Value> {
        let value = self
            .path
            .iter()
            .try_fold(raw, |value, key| value.as_object()?.get(*key))?;
        (!value.is_null()).then_some(value)
    }
}

/// Story point probe order. Trackers store estimates under custom fields
/// whose ids differ per installation; the common ones come first, then the
/// plain names used by exports and hand-written fixtures.
pub const STORY_POINT_FIELDS: [FieldPath; 9] = [
    FieldPath::new("fields.customfield_10016", &["fields", "customfield_10016"]),
    FieldPath::new("fields.customfield_10002", &["fields", "customfield_10002"]),
    FieldPath::new("fields.customfield_10004", &["fields", "customfield_10004"]),
    FieldPath::new("fields.customfield_10026", &["fields", "customfield_10026"]),
    FieldPath::new("fields.storyPoints", &["fields", "storyPoints"]),
    FieldPath::new("fields.story_points", &["fields", "story_points"]),
    FieldPath::new("storyPoints", &["storyPoints"]),
    FieldPath::new("story_points", &["story_points"]),
    FieldPath::new("points", &["points"]),
];

/// First non-null value among `paths`, with the path that produced it.
pub fn probe<'a>(raw: &'a Value, paths: &[FieldPath]) -> Option<(&'static str, &'a Value)> {
    paths
        .iter()
        .find_map(|field| field.lookup(raw).map(|value| (field.name, value)))
}

/// First non-empty string among `paths`. Numbers are stringified so numeric
/// ids survive.
pub fn probe_str(raw: &Value, paths: &[FieldPath]) -> Option<String> {
    paths.iter().find_map(|field| match field.lookup(raw)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Story points of a raw work item. The first non-null probe decides; a
/// value that is not a finite non-negative number counts as 0.
pub fn story_points(raw: &Value) -> f64 {
    let Some((_, value)) = probe(raw, &STORY_POINT_FIELDS) else {
        return 0.0;
    };
    let points = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match points {
        Some(points) if points.is_finite() && points >= 0.0 => points,
        _ => 0.0,
    }
}

/// Lower-case string values of an array field, e.g. labels.
pub fn string_list(raw: &Value, paths: &[FieldPath]) -> Vec<String> {
    paths
        .iter()
        .find_map(|field| field.lookup(raw)?.as_array())
        .map(|values| {
            values
                .iter()
                .filter_map(|value| value.as_str())
                .map(|value| value.trim().to_lowercase())
                .collect()
        })
        .unwrap_or_default()
}

/// Accepts RFC 3339, tracker timestamps with a `+0000` offset and plain
/// `YYYY-MM-DD` dates (taken as midnight UTC).
pub fn parse_datetime(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime);
    }
    if let Ok(datetime) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(datetime);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn probe_order_is_stable() {
        let names = STORY_POINT_FIELDS.iter().map(|f| f.name).collect::<Vec<_>>();
        assert_eq!(names[0], "fields.customfield_10016");
        assert_eq!(names[names.len() - 1], "points");
    }

    #[test]
    fn first_non_null_field_wins() {
        let raw = json!({
            "fields": {"customfield_10016": null, "customfield_10002": 3},
            "points": 8
        });
        assert_eq!(story_points(&raw), 3.0);
        assert_eq!(
            probe(&raw, &STORY_POINT_FIELDS).map(|(name, _)| name),
            Some("fields.customfield_10002")
        );
    }

    #[test]
    fn malformed_winner_counts_as_zero() {
        assert_eq!(story_points(&json!({"storyPoints": "five", "points": 5})), 0.0);
        assert_eq!(story_points(&json!({"points": -2})), 0.0);
        assert_eq!(story_points(&json!({"points": "2.5"})), 2.5);
        assert_eq!(story_points(&json!({"title": "no estimate"})), 0.0);
    }

    #[test]
    fn parses_common_date_shapes() {
        assert!(parse_datetime("2024-03-01T09:00:00Z").is_some());
        assert!(parse_datetime("2024-03-01T09:00:00.000+0000").is_some());
        assert_eq!(
            parse_datetime("2024-03-01").map(|d| d.to_rfc3339()),
            Some("2024-03-01T00:00:00+00:00".to_string())
        );
        assert_eq!(parse_datetime("next tuesday"), None);
    }
}
