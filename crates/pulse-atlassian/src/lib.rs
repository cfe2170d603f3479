//! Atlassian Compass client for compass-pulse.
//!
//! Two capabilities, each on its own module:
//! - [`events`]: POST a custom event to `/compass/v1/events` for an
//!   affected component (implements the core [`EventSink`] seam).
//! - [`scorecard`]: fixed GraphQL query against `/graphql` and traversal
//!   of the scorecard score/status for a component.
//!
//! Both authenticate with basic auth (account email + API token) against
//! `https://<site>.atlassian.net/gateway/api`. No retries.

pub mod events;
pub mod scorecard;

pub use scorecard::{CriteriaScore, ScorecardVerdict};

use pulse_core::{AtlassianConfig, PulseError, Result};
use serde_json::Value;
use tracing::debug;

/// Compass API client for one Atlassian site.
pub struct CompassClient {
    http_client: reqwest::Client,
    base_url: String,
    user: String,
    token: String,
}

impl CompassClient {
    /// Create a client for the site named in the config.
    pub fn new(config: &AtlassianConfig) -> Result<Self> {
        let base_url = format!("https://{}.atlassian.net/gateway/api", config.site);
        Self::with_base_url(config, &base_url)
    }

    /// Create a client against an explicit gateway URL.
    pub fn with_base_url(config: &AtlassianConfig, base_url: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("compass-pulse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(CompassClient {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user: config.user.clone(),
            token: config.token.clone(),
        })
    }

    /// POST a JSON body and return the parsed JSON response.
    pub(crate) async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "compass request");
        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.user, Some(&self.token))
            .header("Accept", "application/json")
            .json(body)
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
        Ok(response.json::<Value>().await?)
    }
}
