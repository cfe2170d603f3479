//! Metrics report artifact written at the end of a pipeline run.

use crate::cycle::CycleTimeMetrics;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Canonical deployment-metrics artifact for one pull request evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsReport {
    pub pr_cycle_time: f64,
    pub time_to_first_review: f64,
    pub time_to_merge: f64,
    pub deployment_time: f64,
    /// Every marker file found in the repository tree.
    pub compass_files: Vec<String>,
    /// Marker files whose directories contain a changed file.
    pub affected_components: Vec<String>,
    pub pr_number: u64,
    pub repository: String,
    pub timestamp: DateTime<Utc>,
}

impl MetricsReport {
    pub fn new(
        cycle: CycleTimeMetrics,
        deployment_time: f64,
        compass_files: Vec<String>,
        affected_components: Vec<String>,
        pr_number: u64,
        repository: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        MetricsReport {
            pr_cycle_time: cycle.pr_cycle_time,
            time_to_first_review: cycle.time_to_first_review,
            time_to_merge: cycle.time_to_merge,
            deployment_time,
            compass_files,
            affected_components,
            pr_number,
            repository,
            timestamp,
        }
    }
}

/// Write the report in pretty JSON format.
pub fn write_report(path: &Path, report: &MetricsReport) -> Result<()> {
    let content = serde_json::to_string_pretty(report)?;
    std::fs::write(path, content)?;
    Ok(())
}
