use chrono::{DateTime, FixedOffset};
use serde::Serialize;

pub const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub author: String,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub url: Option<String>,
}

impl Commit {
    pub fn new(sha: impl ToString, message: impl ToString, author: impl ToString) -> Self {
        let author = author.to_string();
        Self {
            sha: sha.to_string(),
            message: message.to_string(),
            author: if author.trim().is_empty() {
                UNKNOWN_AUTHOR.to_string()
            } else {
                author
            },
            timestamp: None,
            url: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_url(mut self, url: impl ToString) -> Self {
        self.url = Some(url.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_author_falls_back_to_unknown() {
        assert_eq!(Commit::new("abc", "m", "  ").author, UNKNOWN_AUTHOR);
        assert_eq!(Commit::new("abc", "m", "Ann").author, "Ann");
    }

    #[test]
    fn timestamp_serializes_with_offset() {
        let timestamp = DateTime::parse_from_rfc3339("2024-03-05T10:00:00Z").unwrap();
        let commit = Commit::new("abc", "m", "Ann").with_timestamp(timestamp);
        let value = serde_json::to_value(&commit).unwrap();
        assert_eq!(value["timestamp"], "2024-03-05T10:00:00+00:00");
        assert!(value["url"].is_null());
    }
}
