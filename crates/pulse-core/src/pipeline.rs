//! Metrics pipeline orchestration.
//!
//! One invocation per pull-request evaluation: fetch the marker and
//! changed-file lists, overlap-match them, compute cycle-time metrics,
//! write the report artifact, and post one Compass event per affected
//! component.

use crate::cycle::{calculate_cycle_time, calculate_deployment_time};
use crate::error::Result;
use crate::marker::ComponentRef;
use crate::overlap::find_overlapping_directories;
use crate::provider::{ChangeProvider, EventSink};
use crate::report::{write_report, MetricsReport};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Result of a complete metrics pipeline execution.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// The report written to disk.
    pub report: MetricsReport,
    /// Components for which an event was posted successfully.
    pub events_sent: usize,
    /// Components skipped (unparsable marker) or whose event post failed.
    pub events_failed: usize,
}

impl PipelineOutcome {
    /// Whether every affected component produced a successful event.
    pub fn all_events_sent(&self) -> bool {
        self.events_failed == 0
    }
}

/// Metrics pipeline for one repository + pull request pair.
pub struct MetricsPipeline {
    repository: String,
    pr_number: u64,
    /// Checkout root; marker files are read from here when posting events.
    workspace: PathBuf,
    output_path: PathBuf,
}

impl MetricsPipeline {
    pub fn new(repository: &str, pr_number: u64, workspace: &Path, output_path: &Path) -> Self {
        MetricsPipeline {
            repository: repository.to_string(),
            pr_number,
            workspace: workspace.to_path_buf(),
            output_path: output_path.to_path_buf(),
        }
    }

    /// Execute the pipeline. `deployed_at` is the deployment instant used
    /// for the merge-to-deploy metric (normally "now" in CI).
    pub async fn run(
        &self,
        provider: &dyn ChangeProvider,
        sink: &dyn EventSink,
        deployed_at: DateTime<Utc>,
    ) -> Result<PipelineOutcome> {
        let compass_files = provider.find_marker_files().await?;
        info!(count = compass_files.len(), "found marker files");

        let changed_files = provider.changed_files(self.pr_number).await?;
        info!(
            pr = self.pr_number,
            count = changed_files.len(),
            "pull request changed files"
        );

        let affected_components = find_overlapping_directories(&compass_files, &changed_files);
        info!(count = affected_components.len(), "affected components");

        let timeline = provider.timeline(self.pr_number).await?;
        let cycle = calculate_cycle_time(&timeline);
        let deployment_time = calculate_deployment_time(timeline.merged_at, deployed_at);

        let report = MetricsReport::new(
            cycle,
            deployment_time,
            compass_files,
            affected_components.clone(),
            self.pr_number,
            self.repository.clone(),
            Utc::now(),
        );
        write_report(&self.output_path, &report)?;
        info!(path = %self.output_path.display(), "metrics report written");

        let mut events_sent = 0;
        let mut events_failed = 0;
        for marker_path in &affected_components {
            let component = match ComponentRef::from_file(&self.workspace.join(marker_path)) {
                Ok(component) => component,
                Err(e) => {
                    warn!(marker = %marker_path, error = %e, "skipping component with unreadable marker");
                    events_failed += 1;
                    continue;
                }
            };
            match sink
                .post_component_event(&component, &self.repository, self.pr_number)
                .await
            {
                Ok(()) => {
                    info!(component = %component.component_id, "compass event sent");
                    events_sent += 1;
                }
                Err(e) => {
                    error!(component = %component.component_id, error = %e, "compass event failed");
                    events_failed += 1;
                }
            }
        }

        Ok(PipelineOutcome {
            report,
            events_sent,
            events_failed,
        })
    }
}
