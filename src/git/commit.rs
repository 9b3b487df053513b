use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use git2::{Error, Repository};
use serde_json::{json, Value};

/// Window of commit times to read. Open ends are unbounded.
#[derive(Debug, Clone, Default)]
pub struct CommitWindow {
    pub since: Option<DateTime<FixedOffset>>,
    pub until: Option<DateTime<FixedOffset>>,
}

impl CommitWindow {
    pub fn new(since: Option<DateTime<FixedOffset>>, until: Option<DateTime<FixedOffset>>) -> Self {
        Self { since, until }
    }

    /// `until` covers its whole calendar day.
    fn contains(&self, datetime: &DateTime<Utc>) -> bool {
        let after_since = self.since.map_or(true, |since| *datetime >= since);
        let before_until = self.until.map_or(true, |until| {
            datetime.with_timezone(until.offset()).date_naive() <= until.date_naive()
        });
        after_since && before_until
    }
}

pub trait GitCommitRepository {
    /// Commits reachable from HEAD inside `window`, newest first, in the raw
    /// flat commit shape the normalizer reads. `url_prefix` + sha forms the
    /// commit link when given.
    fn raw_commits(&self, window: &CommitWindow, url_prefix: Option<&str>) -> Result<Value, Error>;
}

impl GitCommitRepository for Repository {
    fn raw_commits(&self, window: &CommitWindow, url_prefix: Option<&str>) -> Result<Value, Error> {
        let commits = get_commits(self, window)?
            .iter()
            .map(|git_commit| git_commit_to_raw(git_commit, url_prefix))
            .collect::<Vec<_>>();
        Ok(Value::Array(commits))
    }
}

fn get_commits<'a>(repo: &'a Repository, window: &CommitWindow) -> Result<Vec<git2::Commit<'a>>, Error> {
    let mut revwalk = repo.revwalk()?;
    revwalk.push_head()?;
    let commits = revwalk
        .filter_map(|id| repo.find_commit(id.ok()?).ok())
        .filter(|commit| {
            commit_datetime(commit)
                .map(|datetime| window.contains(&datetime))
                .unwrap_or(false)
        })
        .collect();
    Ok(commits)
}

fn commit_datetime(commit: &git2::Commit<'_>) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(commit.time().seconds(), 0).single()
}

fn git_commit_to_raw(git_commit: &git2::Commit<'_>, url_prefix: Option<&str>) -> Value {
    let sha = git_commit.id().to_string();
    let author = git_commit.author();
    let timestamp = commit_datetime(git_commit).map(|datetime| datetime.to_rfc3339());
    let url = url_prefix.map(|prefix| format!("{}/{sha}", prefix.trim_end_matches('/')));
    json!({
        "sha": sha,
        "message": git_commit.message().unwrap_or(""),
        "author": author.name().unwrap_or(""),
        "timestamp": timestamp,
        "url": url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Signature, Time};
    use std::path::Path;

    fn commit_at(repo: &Repository, name: &str, seconds: i64, message: &str) {
        let signature = Signature::new(name, "dev@example.com", &Time::new(seconds, 0)).unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parent = repo
            .head()
            .ok()
            .and_then(|head| head.target())
            .map(|id| repo.find_commit(id).unwrap());
        let parents = parent.iter().collect::<Vec<_>>();
        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .unwrap();
    }

    fn date(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn init(path: &Path) -> Repository {
        let repo = Repository::init(path).unwrap();
        // 2024-02-28, 2024-03-05 and 2024-03-15 at noon UTC.
        commit_at(&repo, "Ann", 1_709_121_600, "before the sprint");
        commit_at(&repo, "Bob", 1_709_640_000, "inside the sprint");
        commit_at(&repo, "Ann", 1_710_504_000, "on the last day");
        repo
    }

    #[test]
    fn reads_commits_inside_window() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init(dir.path());
        let window = CommitWindow::new(
            Some(date("2024-03-01T00:00:00+00:00")),
            Some(date("2024-03-15T00:00:00+00:00")),
        );
        let raw = repo.raw_commits(&window, Some("https://git.example.com/app/commit/")).unwrap();
        let commits = raw.as_array().unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0]["message"], "on the last day");
        assert_eq!(commits[1]["author"], "Bob");
        let sha = commits[1]["sha"].as_str().unwrap();
        assert_eq!(
            commits[1]["url"],
            format!("https://git.example.com/app/commit/{sha}")
        );
    }

    #[test]
    fn open_window_reads_everything() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init(dir.path());
        let raw = repo.raw_commits(&CommitWindow::default(), None).unwrap();
        assert_eq!(raw.as_array().unwrap().len(), 3);
        assert!(raw[0]["url"].is_null());
    }
}
