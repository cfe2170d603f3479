//! Pipeline configuration.
//!
//! All environment reads happen here, once, at the orchestration entry
//! point. Core logic (matcher, cycle-time math, marker parsing) never
//! touches the environment.

use crate::error::{PulseError, Result};
use std::path::PathBuf;

/// Default report path when METRICS_OUTPUT is not set.
pub const DEFAULT_OUTPUT: &str = "deployment_metrics.json";

fn required_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(PulseError::MissingConfig(name.to_string())),
    }
}

/// GitHub access: which repository and pull request to evaluate.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub token: String,
    /// `owner/name` form, as provided by Actions.
    pub repository: String,
    pub pr_number: u64,
}

impl GitHubConfig {
    /// Read GITHUB_TOKEN, GITHUB_REPOSITORY and PR_NUMBER.
    pub fn from_env() -> Result<Self> {
        let pr_raw = required_env("PR_NUMBER")?;
        let pr_number = pr_raw
            .parse::<u64>()
            .map_err(|_| PulseError::InvalidConfig(format!("PR_NUMBER is not a number: {pr_raw}")))?;
        Ok(GitHubConfig {
            token: required_env("GITHUB_TOKEN")?,
            repository: required_env("GITHUB_REPOSITORY")?,
            pr_number,
        })
    }
}

/// Atlassian site and API credentials shared by the event and scorecard
/// endpoints.
#[derive(Debug, Clone)]
pub struct AtlassianConfig {
    /// Site name, i.e. the `<site>` in `<site>.atlassian.net`.
    pub site: String,
    /// Account email for basic auth.
    pub user: String,
    /// API token for basic auth.
    pub token: String,
}

impl AtlassianConfig {
    /// Read ATLASSIAN_SITE, ATLASSIAN_API_USER and ATLASSIAN_API_TOKEN.
    pub fn from_env() -> Result<Self> {
        Ok(AtlassianConfig {
            site: required_env("ATLASSIAN_SITE")?,
            user: required_env("ATLASSIAN_API_USER")?,
            token: required_env("ATLASSIAN_API_TOKEN")?,
        })
    }
}

/// Everything the metrics pipeline needs, collected in one place.
#[derive(Debug, Clone)]
pub struct Config {
    pub github: GitHubConfig,
    pub atlassian: AtlassianConfig,
    /// Where to write the metrics report.
    pub output_path: PathBuf,
}

impl Config {
    /// Collect the full pipeline configuration from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            github: GitHubConfig::from_env()?,
            atlassian: AtlassianConfig::from_env()?,
            output_path: std::env::var("METRICS_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT)),
        })
    }
}
