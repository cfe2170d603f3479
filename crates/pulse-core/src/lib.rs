//! compass-pulse core library
//!
//! Domain logic for pull-request cycle-time metrics and component
//! matching:
//! - Directory-overlap matching between marker files and changed files
//! - `compass.yml` marker parsing (component ARIs)
//! - Cycle-time and deployment-time computation
//! - The metrics pipeline orchestrator and its client seams

pub mod config;
pub mod cycle;
pub mod error;
pub mod marker;
pub mod overlap;
pub mod pipeline;
pub mod provider;
pub mod report;
pub mod telemetry;

pub use config::{AtlassianConfig, Config, GitHubConfig};
pub use cycle::{
    calculate_cycle_time, calculate_deployment_time, CycleTimeMetrics, PullRequestTimeline,
};
pub use error::{PulseError, Result};
pub use marker::ComponentRef;
pub use overlap::{find_overlapping_directories, normalized_dir};
pub use pipeline::{MetricsPipeline, PipelineOutcome};
pub use provider::{ChangeProvider, EventSink};
pub use report::{write_report, MetricsReport};
pub use telemetry::init_tracing;
