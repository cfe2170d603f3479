//! GitHub REST provider for compass-pulse.
//!
//! Implements [`ChangeProvider`]: marker-file discovery via a recursive
//! git tree listing, PR changed files, and the PR timeline (creation,
//! merge, review submissions). No retries; a non-2xx response surfaces
//! as [`PulseError::Api`].

pub mod model;

use async_trait::async_trait;
use model::{build_timeline, marker_paths, PullDetail, PullFile, PullReview, RepoDetail, TreeDetail};
use pulse_core::{ChangeProvider, GitHubConfig, PullRequestTimeline, PulseError, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const DEFAULT_API_URL: &str = "https://api.github.com";
const PAGE_SIZE: usize = 100;

/// GitHub REST v3 client scoped to one repository.
pub struct GitHubClient {
    http_client: reqwest::Client,
    api_url: String,
    repository: String,
    token: String,
}

impl GitHubClient {
    /// Create a client for the repository named in the config.
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        Self::with_api_url(config, DEFAULT_API_URL)
    }

    /// Create a client against a non-default API root (GitHub Enterprise).
    pub fn with_api_url(config: &GitHubConfig, api_url: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("compass-pulse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(GitHubClient {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            repository: config.repository.clone(),
            token: config.token.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.api_url, path);
        debug!(url = %url, "github request");
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PulseError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }

    /// Fetch all pages of a paginated list endpoint.
    async fn get_paged<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1;
        loop {
            let url = format!("{path}?per_page={PAGE_SIZE}&page={page}");
            let batch: Vec<T> = self.get_json(&url).await?;
            let batch_len = batch.len();
            items.extend(batch);
            if batch_len < PAGE_SIZE {
                return Ok(items);
            }
            page += 1;
        }
    }
}

#[async_trait]
impl ChangeProvider for GitHubClient {
    /// List every `compass.yml` in the default branch's tree.
    async fn find_marker_files(&self) -> Result<Vec<String>> {
        let repo: RepoDetail = self.get_json(&format!("/repos/{}", self.repository)).await?;
        let tree: TreeDetail = self
            .get_json(&format!(
                "/repos/{}/git/trees/{}?recursive=1",
                self.repository, repo.default_branch
            ))
            .await?;
        if tree.truncated {
            warn!(
                repository = %self.repository,
                "tree listing truncated by GitHub; some marker files may be missing"
            );
        }
        Ok(marker_paths(&tree))
    }

    async fn changed_files(&self, pr_number: u64) -> Result<Vec<String>> {
        let files: Vec<PullFile> = self
            .get_paged(&format!(
                "/repos/{}/pulls/{}/files",
                self.repository, pr_number
            ))
            .await?;
        Ok(files.into_iter().map(|f| f.filename).collect())
    }

    async fn timeline(&self, pr_number: u64) -> Result<PullRequestTimeline> {
        let pull: PullDetail = self
            .get_json(&format!("/repos/{}/pulls/{}", self.repository, pr_number))
            .await?;
        let reviews: Vec<PullReview> = self
            .get_paged(&format!(
                "/repos/{}/pulls/{}/reviews",
                self.repository, pr_number
            ))
            .await?;
        Ok(build_timeline(&pull, &reviews))
    }
}
