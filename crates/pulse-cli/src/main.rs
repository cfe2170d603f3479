//! compass-pulse CLI
//!
//! The `pulse` command runs PR cycle-time metric collection and Compass
//! scorecard enforcement from CI.
//!
//! ## Commands
//!
//! - `metrics`: evaluate one pull request — find marker files, match them
//!   against the PR diff, compute cycle-time metrics, write the report,
//!   and post one Compass event per affected component
//! - `scorecard`: enforce that a component's scorecard status is PASSING
//! - `event`: post a single Compass event for one marker file

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

use pulse_atlassian::CompassClient;
use pulse_core::{AtlassianConfig, ComponentRef, Config, MetricsPipeline};
use pulse_github::GitHubClient;

#[derive(Parser)]
#[command(name = "pulse")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "PR cycle-time metrics and Compass scorecard enforcement", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a pull request and report cycle-time metrics
    ///
    /// Reads GITHUB_TOKEN, GITHUB_REPOSITORY, PR_NUMBER, METRICS_OUTPUT
    /// and the ATLASSIAN_* credentials from the environment.
    Metrics {
        /// Checkout root containing the marker files (default: current directory)
        #[arg(short, long, default_value = ".")]
        workspace: PathBuf,

        /// Deployment instant as RFC 3339 (default: now)
        #[arg(long)]
        deployed_at: Option<String>,
    },

    /// Check that a component's scorecard status is PASSING
    ///
    /// Reads ATLASSIAN_SITE, ATLASSIAN_API_USER and ATLASSIAN_API_TOKEN
    /// from the environment. Exits non-zero when the scorecard is missing
    /// or not passing.
    Scorecard {
        /// Path to the component's marker file
        #[arg(short, long, default_value = "./compass.yml")]
        file: PathBuf,

        /// Name of the scorecard to enforce
        #[arg(short, long)]
        name: String,
    },

    /// Post a single Compass event for one marker file
    Event {
        /// Path to the component's marker file
        #[arg(short, long, default_value = "./compass.yml")]
        file: PathBuf,

        /// Repository in owner/name form
        #[arg(short, long)]
        repository: String,

        /// Pull request number the event refers to
        #[arg(short, long)]
        pr: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    pulse_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Metrics {
            workspace,
            deployed_at,
        } => cmd_metrics(&workspace, deployed_at.as_deref()).await,
        Commands::Scorecard { file, name } => cmd_scorecard(&file, &name).await,
        Commands::Event {
            file,
            repository,
            pr,
        } => cmd_event(&file, &repository, pr).await,
    }
}

/// Run the full metrics pipeline for the configured pull request.
async fn cmd_metrics(workspace: &PathBuf, deployed_at: Option<&str>) -> Result<()> {
    let config = Config::from_env().context("Incomplete pipeline configuration")?;

    let deployed_at = match deployed_at {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("--deployed-at is not RFC 3339: {raw}"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let provider = GitHubClient::new(&config.github)?;
    let sink = CompassClient::new(&config.atlassian)?;

    let pipeline = MetricsPipeline::new(
        &config.github.repository,
        config.github.pr_number,
        workspace,
        &config.output_path,
    );
    let outcome = pipeline
        .run(&provider, &sink, deployed_at)
        .await
        .context("Metrics pipeline failed")?;

    let report = &outcome.report;
    println!("\nMetrics Summary:");
    println!("PR Cycle Time: {:.2} hours", report.pr_cycle_time);
    println!(
        "Time to First Review: {:.2} hours",
        report.time_to_first_review
    );
    println!("Time to Merge: {:.2} hours", report.time_to_merge);
    println!("Deployment Time: {:.2} hours", report.deployment_time);
    println!(
        "Total Components Affected: {}",
        report.affected_components.len()
    );
    println!("Total Compass Files: {}", report.compass_files.len());
    println!("Metrics written to {}", config.output_path.display());

    if !outcome.all_events_sent() {
        bail!(
            "{} of {} component events failed",
            outcome.events_failed,
            outcome.events_failed + outcome.events_sent
        );
    }
    Ok(())
}

/// Enforce a PASSING scorecard status for the component in `file`.
async fn cmd_scorecard(file: &PathBuf, name: &str) -> Result<()> {
    let config = AtlassianConfig::from_env().context("Incomplete Atlassian configuration")?;
    let component = ComponentRef::from_file(file)
        .with_context(|| format!("Failed to read marker file {}", file.display()))?;

    let client = CompassClient::new(&config)?;
    let verdict = client
        .scorecard_status(&component.component_id, name)
        .await
        .context("Scorecard query failed")?;

    println!(
        "Scorecard '{}': {} ({:.0}/{:.0})",
        verdict.name, verdict.status, verdict.total_score, verdict.max_total_score
    );
    verdict.require_passing()?;
    println!(
        "The scorecard status for '{}' is passing.",
        component.component_id
    );
    Ok(())
}

/// Post one Compass event for the component in `file`.
async fn cmd_event(file: &PathBuf, repository: &str, pr: u64) -> Result<()> {
    use pulse_core::EventSink;

    let config = AtlassianConfig::from_env().context("Incomplete Atlassian configuration")?;
    let component = ComponentRef::from_file(file)
        .with_context(|| format!("Failed to read marker file {}", file.display()))?;

    let client = CompassClient::new(&config)?;
    client
        .post_component_event(&component, repository, pr)
        .await
        .context("Failed to post Compass event")?;

    println!("Compass event sent for {}", component.component_id);
    Ok(())
}
