//! GitHub REST response shapes and the pure helpers that read them.

use chrono::{DateTime, Utc};
use pulse_core::PullRequestTimeline;
use serde::Deserialize;

/// File name that marks a directory as a tracked component.
pub const MARKER_FILE_NAME: &str = "compass.yml";

/// Subset of `GET /repos/{repo}`.
#[derive(Debug, Deserialize)]
pub struct RepoDetail {
    pub default_branch: String,
}

/// One entry of a recursive git tree listing.
#[derive(Debug, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Subset of `GET /repos/{repo}/git/trees/{sha}?recursive=1`.
#[derive(Debug, Deserialize)]
pub struct TreeDetail {
    pub tree: Vec<TreeEntry>,
    /// Set by GitHub when the tree was too large to list completely.
    #[serde(default)]
    pub truncated: bool,
}

/// One entry of `GET /repos/{repo}/pulls/{n}/files`.
#[derive(Debug, Deserialize)]
pub struct PullFile {
    pub filename: String,
}

/// Subset of `GET /repos/{repo}/pulls/{n}`.
#[derive(Debug, Deserialize)]
pub struct PullDetail {
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

/// One entry of `GET /repos/{repo}/pulls/{n}/reviews`. Pending reviews
/// carry no submission time.
#[derive(Debug, Deserialize)]
pub struct PullReview {
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Extract marker-file paths from a recursive tree listing.
pub fn marker_paths(tree: &TreeDetail) -> Vec<String> {
    tree.tree
        .iter()
        .filter(|entry| entry.kind == "blob")
        .filter(|entry| {
            entry
                .path
                .rsplit('/')
                .next()
                .is_some_and(|name| name == MARKER_FILE_NAME)
        })
        .map(|entry| entry.path.clone())
        .collect()
}

/// Assemble a timeline from the PR detail and its reviews.
pub fn build_timeline(pull: &PullDetail, reviews: &[PullReview]) -> PullRequestTimeline {
    PullRequestTimeline {
        created_at: pull.created_at,
        merged_at: pull.merged_at,
        review_submitted_at: reviews.iter().filter_map(|r| r.submitted_at).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn marker_paths_filters_blobs_named_compass_yml() {
        let tree: TreeDetail = serde_json::from_str(
            r#"{
                "tree": [
                    {"path": "compass.yml", "type": "blob"},
                    {"path": "services/auth/compass.yml", "type": "blob"},
                    {"path": "services/auth", "type": "tree"},
                    {"path": "services/auth/not-compass.yml", "type": "blob"},
                    {"path": "docs/compass.yml.md", "type": "blob"}
                ],
                "truncated": false
            }"#,
        )
        .unwrap();

        assert_eq!(
            marker_paths(&tree),
            vec![
                "compass.yml".to_string(),
                "services/auth/compass.yml".to_string()
            ]
        );
    }

    #[test]
    fn truncated_defaults_to_false() {
        let tree: TreeDetail = serde_json::from_str(r#"{"tree": []}"#).unwrap();
        assert!(!tree.truncated);
    }

    #[test]
    fn pull_detail_parses_github_timestamps() {
        let pull: PullDetail = serde_json::from_str(
            r#"{
                "created_at": "2024-03-01T08:00:00Z",
                "merged_at": "2024-03-01T12:00:00Z",
                "number": 7,
                "state": "closed"
            }"#,
        )
        .unwrap();
        assert_eq!(
            pull.created_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
        );
        assert!(pull.merged_at.is_some());
    }

    #[test]
    fn unmerged_pull_has_null_merged_at() {
        let pull: PullDetail = serde_json::from_str(
            r#"{"created_at": "2024-03-01T08:00:00Z", "merged_at": null}"#,
        )
        .unwrap();
        assert!(pull.merged_at.is_none());
    }

    #[test]
    fn timeline_drops_pending_reviews() {
        let pull = PullDetail {
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            merged_at: None,
        };
        let reviews = vec![
            PullReview {
                submitted_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()),
            },
            PullReview { submitted_at: None },
        ];
        let timeline = build_timeline(&pull, &reviews);
        assert_eq!(timeline.review_submitted_at.len(), 1);
    }
}
