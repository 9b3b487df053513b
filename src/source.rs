//! Raw inputs read from JSON files, standing in for tracker, VCS and CI
//! exports. Missing optional files read as empty input.

use serde_json::{from_str, Value};
use std::error::Error;
use std::fs;

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Parses the JSON document at `path`.
pub fn from_config(path: &str) -> Result<Value> {
    let json_str = fs::read_to_string(path)
        .map_err(|err| format!("Cannot read `{path}`: {err}"))?;
    let value: Value = from_str(&json_str).map_err(|err| format!("Not valid JSON in `{path}`: {err}"))?;
    Ok(value)
}

/// Reads an optional record list; `None` yields an empty array.
pub fn records_or_empty(path: Option<&str>) -> Result<Value> {
    match path {
        Some(path) => unwrap_records(from_config(path)?),
        None => Ok(Value::Array(vec![])),
    }
}

/// Tracker and CI exports often wrap the list, e.g. `{"issues": [...]}`.
/// The first known wrapper key holding an array is unwrapped; anything else
/// is passed through for the normalizer to judge.
pub fn unwrap_records(value: Value) -> Result<Value> {
    const WRAPPERS: [&str; 5] = ["issues", "commits", "workflow_runs", "runs", "values"];
    if let Value::Object(map) = &value {
        for key in WRAPPERS {
            if let Some(records @ Value::Array(_)) = map.get(key) {
                return Ok(records.clone());
            }
        }
    }
    Ok(value)
}
