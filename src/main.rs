use chrono::Local;
use clap::Parser;
use git2::Repository;
use indicatif::{MultiProgress, ProgressBar};
use serde_json::{json, Value};
use sprint_report::analyze::{Analyzer, Heuristics};
use sprint_report::git::{CommitWindow, GitCommitRepository};
use sprint_report::normalize::{normalize, normalize_sprint};
use sprint_report::report::{build, render_all, Format};
use sprint_report::source::{from_config, records_or_empty, unwrap_records, Result};
use sprint_report::utils::{MultiProgressNew, ProgressStyleTemplate};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug, Clone)]
#[command(name = "sprint-report", version, about = "Sprint metrics report generator")]
struct Args {
    /// Work items exported from the tracker (JSON array or `{"issues": [...]}`)
    #[arg(long = "issues")]
    issues_path: String,
    /// Commits as JSON; ignored when `--repo` is given
    #[arg(long = "commits")]
    commits_path: Option<String>,
    /// Local git repository to read the sprint's commits from
    #[arg(long = "repo")]
    repo_path: Option<String>,
    /// Prefix for commit links built from `--repo`
    #[arg(long = "commit-url")]
    commit_url: Option<String>,
    /// Build-pipeline runs as JSON
    #[arg(long = "pipelines")]
    pipelines_path: Option<String>,
    /// Sprint metadata as JSON (`name`, `startDate`, `endDate`, `state`, `goal`)
    #[arg(long = "sprint")]
    sprint_path: Option<String>,
    /// Heuristics overrides as JSON
    #[arg(long = "heuristics")]
    heuristics_path: Option<String>,
    /// Output formats, comma separated; all formats when omitted
    #[arg(long = "format", value_enum, value_delimiter = ',')]
    formats: Vec<Format>,
    #[arg(long = "out-dir", default_value = ".")]
    out_dir: String,
    /// Also write the sprint and its computed metrics as JSON to this path
    #[arg(long = "metrics")]
    metrics_path: Option<String>,
    /// Log as JSON lines
    #[arg(long = "log-json")]
    log_json: bool,
}

struct RawInputs {
    issues: Value,
    commits: Value,
    pipelines: Value,
    sprint: Value,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.log_json);
    if let Err(err) = run(&args).await {
        error!("{err}");
        std::process::exit(1);
    }
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(args: &Args) -> Result<()> {
    let heuristics = match &args.heuristics_path {
        Some(path) => Heuristics::from_config(path)?,
        None => Heuristics::default(),
    };
    let mut inputs = load_inputs(args).await?;
    if let Some(repo_path) = &args.repo_path {
        inputs.commits = repo_commits(repo_path, &inputs.sprint, args.commit_url.as_deref())?;
    }

    let records = normalize(&inputs.issues, &inputs.commits, &inputs.sprint)?
        .with_pipeline_runs(&inputs.pipelines)?;
    if records.dropped.total() > 0 {
        info!(
            work_items = records.dropped.work_items,
            commits = records.dropped.commits,
            pipeline_runs = records.dropped.pipeline_runs,
            "skipped malformed records"
        );
    }
    let metrics = records.analyze(&heuristics);
    let generated_at = Local::now().format("%Y-%m-%d %H:%M").to_string();
    let document = build(&metrics, &records, &heuristics, Some(generated_at));

    let formats = if args.formats.is_empty() {
        Format::ALL.to_vec()
    } else {
        args.formats.clone()
    };
    let out_dir = Path::new(&args.out_dir);
    fs::create_dir_all(out_dir)?;
    let slug = records.sprint.slug();
    for (format, output) in render_all(&document, &formats) {
        let path = out_dir.join(format!("{slug}.{}", format.extension()));
        fs::write(&path, output)?;
        info!(path = %path.display(), "✅ Report written");
    }
    if let Some(metrics_path) = &args.metrics_path {
        let dump = json!({ "sprint": &records.sprint, "metrics": &metrics });
        fs::write(PathBuf::from(metrics_path), serde_json::to_string_pretty(&dump)?)?;
        info!(path = %metrics_path, "✅ Metrics written");
    }
    Ok(())
}

async fn load_inputs(args: &Args) -> Result<RawInputs> {
    async fn load_input<F>(label: &str, pb: &ProgressBar, loader: F) -> Result<Value>
    where
        F: FnOnce() -> Result<Value>,
    {
        pb.set_message(format!("Reading {label} ..."));
        let value = loader();
        match &value {
            Ok(Value::Array(records)) => {
                pb.finish_with_message(format!("✅ Read {} {label}", records.len()))
            }
            Ok(_) => pb.finish_with_message(format!("✅ Read {label}")),
            Err(_) => pb.abandon_with_message(format!("❌ Cannot read {label}")),
        }
        value
    }

    let multi_progress = MultiProgress::default();
    let issues_pb = multi_progress.add_stage("issues", ProgressStyleTemplate::stage());
    let commits_pb = multi_progress.add_stage("commits", ProgressStyleTemplate::stage());
    let pipelines_pb = multi_progress.add_stage("pipelines", ProgressStyleTemplate::stage());
    let sprint_pb = multi_progress.add_stage("sprint", ProgressStyleTemplate::stage());

    let (issues, commits, pipelines, sprint) = futures::join!(
        load_input("work items", &issues_pb, || unwrap_records(from_config(&args.issues_path)?)),
        load_input("commits", &commits_pb, || {
            match &args.repo_path {
                Some(_) => Ok(Value::Array(vec![])),
                None => records_or_empty(args.commits_path.as_deref()),
            }
        }),
        load_input("pipeline runs", &pipelines_pb, || {
            records_or_empty(args.pipelines_path.as_deref())
        }),
        load_input("sprint", &sprint_pb, || match &args.sprint_path {
            Some(path) => from_config(path),
            None => Ok(Value::Null),
        }),
    );
    Ok(RawInputs {
        issues: issues?,
        commits: commits?,
        pipelines: pipelines?,
        sprint: sprint?,
    })
}

/// Commits of the sprint window read from a local repository.
fn repo_commits(repo_path: &str, raw_sprint: &Value, commit_url: Option<&str>) -> Result<Value> {
    let multi_progress = MultiProgress::default();
    let pb = multi_progress.add_with_style(ProgressBar::new_spinner(), ProgressStyleTemplate::only_message());
    pb.set_message(format!("Read git history of `{repo_path}` ..."));

    let sprint = normalize_sprint(raw_sprint)?;
    let window = CommitWindow::new(sprint.since, sprint.until);
    let repo = Repository::open(repo_path)?;
    let commits = repo.raw_commits(&window, commit_url)?;
    pb.finish_with_message(format!(
        "✅ Completed read git history (find {} commits)",
        commits.as_array().map_or(0, Vec::len)
    ));
    Ok(commits)
}
