//! Cycle-time metric computation for pull requests.
//!
//! All metrics are fractional hours. An unmerged pull request reports 0.0
//! for every metric, matching the behavior downstream dashboards expect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// The timestamps of a pull request needed for cycle-time metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestTimeline {
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    /// Submission times of all reviews, in no particular order.
    pub review_submitted_at: Vec<DateTime<Utc>>,
}

/// Cycle-time metrics for a single pull request, in hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleTimeMetrics {
    /// Time from PR creation to merge.
    pub pr_cycle_time: f64,
    /// Time from PR creation to the earliest review submission.
    pub time_to_first_review: f64,
    /// Time from PR creation to merge.
    pub time_to_merge: f64,
}

impl CycleTimeMetrics {
    /// All-zero metrics, reported for unmerged pull requests.
    pub fn zero() -> Self {
        CycleTimeMetrics {
            pr_cycle_time: 0.0,
            time_to_first_review: 0.0,
            time_to_merge: 0.0,
        }
    }
}

fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_HOUR
}

/// Compute cycle-time metrics from a pull request timeline.
pub fn calculate_cycle_time(timeline: &PullRequestTimeline) -> CycleTimeMetrics {
    let Some(merged_at) = timeline.merged_at else {
        return CycleTimeMetrics::zero();
    };

    let cycle = hours_between(timeline.created_at, merged_at);
    let first_review = timeline
        .review_submitted_at
        .iter()
        .min()
        .map(|first| hours_between(timeline.created_at, *first))
        .unwrap_or(0.0);

    CycleTimeMetrics {
        pr_cycle_time: cycle,
        time_to_first_review: first_review,
        time_to_merge: cycle,
    }
}

/// Time from merge to deployment, in hours. 0.0 for unmerged PRs.
pub fn calculate_deployment_time(
    merged_at: Option<DateTime<Utc>>,
    deployed_at: DateTime<Utc>,
) -> f64 {
    match merged_at {
        Some(merged) => hours_between(merged, deployed_at),
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, min, 0).unwrap()
    }

    #[test]
    fn merged_pr_reports_cycle_and_merge_time() {
        let timeline = PullRequestTimeline {
            created_at: at(8, 0),
            merged_at: Some(at(14, 30)),
            review_submitted_at: vec![],
        };
        let metrics = calculate_cycle_time(&timeline);
        assert!((metrics.pr_cycle_time - 6.5).abs() < 1e-9);
        assert!((metrics.time_to_merge - 6.5).abs() < 1e-9);
        assert_eq!(metrics.time_to_first_review, 0.0);
    }

    #[test]
    fn earliest_review_is_used() {
        let timeline = PullRequestTimeline {
            created_at: at(8, 0),
            merged_at: Some(at(18, 0)),
            review_submitted_at: vec![at(12, 0), at(9, 30), at(15, 0)],
        };
        let metrics = calculate_cycle_time(&timeline);
        assert!((metrics.time_to_first_review - 1.5).abs() < 1e-9);
    }

    #[test]
    fn unmerged_pr_reports_zero() {
        let timeline = PullRequestTimeline {
            created_at: at(8, 0),
            merged_at: None,
            review_submitted_at: vec![at(9, 0)],
        };
        assert_eq!(calculate_cycle_time(&timeline), CycleTimeMetrics::zero());
    }

    #[test]
    fn deployment_time_from_merge() {
        let dt = calculate_deployment_time(Some(at(10, 0)), at(12, 15));
        assert!((dt - 2.25).abs() < 1e-9);
    }

    #[test]
    fn deployment_time_zero_when_unmerged() {
        assert_eq!(calculate_deployment_time(None, at(12, 0)), 0.0);
    }
}
