//! Client seams between the pipeline and the external services.
//!
//! The pipeline only ever talks to these traits, so its tests run against
//! in-memory fakes with no network mocking.

use crate::cycle::PullRequestTimeline;
use crate::error::Result;
use crate::marker::ComponentRef;
use async_trait::async_trait;

/// Supplies the two path lists the overlap matcher consumes, plus the
/// pull request's timeline. Paths are forward-slash separated and relative
/// to the repository root.
#[async_trait]
pub trait ChangeProvider: Send + Sync {
    /// Every marker file (`compass.yml`) in the repository tree.
    async fn find_marker_files(&self) -> Result<Vec<String>>;

    /// Files modified by the given pull request.
    async fn changed_files(&self, pr_number: u64) -> Result<Vec<String>>;

    /// Creation, merge, and review timestamps for the given pull request.
    async fn timeline(&self, pr_number: u64) -> Result<PullRequestTimeline>;
}

/// Accepts one custom event per affected component.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn post_component_event(
        &self,
        component: &ComponentRef,
        repository: &str,
        pr_number: u64,
    ) -> Result<()>;
}
