//! Sprint activity reports.
//!
//! Raw work items, commits and pipeline runs of one sprint go through a
//! fixed, single-threaded pipeline:
//!
//! 1. [`normalize`] coerces raw JSON into canonical records,
//! 2. [`analyze`] aggregates them into a [`analyze::MetricsModel`],
//! 3. [`report::build`] lays the metrics out as ordered sections,
//! 4. a [`report::Renderer`] serializes the sections into one syntax.
//!
//! Every stage is a pure function of its inputs. Fetching records and
//! writing the output belong to the caller.

pub mod analyze;
pub mod error;
pub mod git;
pub mod model;
pub mod normalize;
pub mod report;
pub mod source;
pub mod utils;

pub use error::{ReportError, Result};
