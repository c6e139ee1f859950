//! groupcommit - CLI entry point.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use groupcommit::{
    ChangeGroup, GitSettings, GroupCommitConfig, GroupCommitter, GroupOverride,
    OrchestrationResult, RunMode, SystemGit,
};

/// How the result is printed on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// The full result as JSON
    Json,
    /// A short human-readable summary
    Text,
}

/// Group pending changes into conventional commits.
///
/// Without --apply and --confirm this only prints the plan.
#[derive(Parser, Debug)]
#[command(name = "groupcommit")]
#[command(version)]
struct Cli {
    /// Path inside the repository
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Only consider staged changes
    #[arg(long)]
    staged_only: bool,

    /// Commit whatever is already staged instead of staging each group
    #[arg(long)]
    no_auto_stage: bool,

    /// Leave dry-run mode (still requires --confirm to commit)
    #[arg(long)]
    apply: bool,

    /// Authorize staging, committing and pushing
    #[arg(long)]
    confirm: bool,

    /// Push once after all groups are committed
    #[arg(long)]
    push: bool,

    /// Add a Signed-off-by trailer to each commit
    #[arg(long)]
    signoff: bool,

    /// Per-group message overrides as JSON, or @path to a JSON file
    #[arg(long, value_name = "JSON|@FILE")]
    overrides: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Logs go to stderr so stdout carries only the JSON result.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<bool> {
    let overrides = match cli.overrides.as_deref() {
        Some(raw) => parse_overrides(raw)?,
        None => BTreeMap::new(),
    };

    let config = GroupCommitConfig {
        repo: cli.repo,
        include_unstaged: !cli.staged_only,
        auto_stage: !cli.no_auto_stage,
        dry_run: !cli.apply,
        push: cli.push,
        signoff: cli.signoff,
        confirm: cli.confirm,
        overrides,
    };

    if config.mode() == RunMode::PlanOnly && cli.apply {
        info!("--apply without --confirm: planning only");
    }

    let settings = GitSettings::from_env();
    let committer = GroupCommitter::new(SystemGit::new(settings));

    let result = committer
        .run(&config)
        .await
        .context("Grouped commit run failed")?;

    match cli.output {
        OutputFormat::Json => {
            let json = if cli.pretty {
                serde_json::to_string_pretty(&result)
            } else {
                serde_json::to_string(&result)
            }
            .context("Failed to serialize result")?;
            println!("{}", json);
        }
        OutputFormat::Text => print!("{}", render_text(&result)),
    }

    Ok(result.ok)
}

/// Parse `--overrides`, reading from a file when the value starts with `@`.
fn parse_overrides(raw: &str) -> Result<BTreeMap<ChangeGroup, GroupOverride>> {
    let content = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read overrides file {}", path))?,
        None => raw.to_string(),
    };

    serde_json::from_str(&content).context("Invalid --overrides JSON")
}

/// One line per group, then commit outcomes, push state and errors.
fn render_text(result: &OrchestrationResult) -> String {
    let mut out = String::new();

    if result.groups.is_empty() {
        out.push_str("No changes to commit.\n");
    }
    for plan in &result.groups {
        out.push_str(&format!(
            "{} ({} file(s)): {}\n",
            plan.name,
            plan.files.len(),
            plan.suggested_message.lines().next().unwrap_or("")
        ));
        for file in &plan.files {
            out.push_str(&format!("  {}\n", file));
        }
    }

    if let Some(commits) = &result.commits {
        out.push('\n');
        for record in commits {
            match &record.sha {
                Some(sha) => {
                    let short = sha.get(..7).unwrap_or(sha);
                    out.push_str(&format!("committed {} as {}\n", record.group, short));
                }
                None => out.push_str(&format!("failed    {}\n", record.group)),
            }
        }
    }

    match result.pushed {
        Some(true) => out.push_str("pushed\n"),
        Some(false) => out.push_str("push failed\n"),
        None => {}
    }

    if let Some(errors) = &result.errors {
        out.push_str("\nErrors:\n");
        for error in errors {
            out.push_str(&format!("  - {}\n", error));
        }
    }

    out
}
