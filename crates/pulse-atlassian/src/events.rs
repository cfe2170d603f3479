//! Compass custom events.
//!
//! One event is posted per affected component after a pull-request
//! evaluation, linking the component to the pull request URL.

use crate::CompassClient;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pulse_core::{ComponentRef, EventSink, Result};
use serde_json::{json, Value};
use tracing::info;

/// Build the `/compass/v1/events` request body.
///
/// The envelope shape is fixed by the Compass events API; `lastUpdated`
/// must be second-precision ISO-8601 UTC with a `Z` suffix.
pub fn event_payload(
    component: &ComponentRef,
    repository: &str,
    pr_number: u64,
    last_updated: DateTime<Utc>,
) -> Value {
    let pr_url = format!("https://github.com/{repository}/pull/{pr_number}");
    json!({
        "cloudId": component.cloud_id,
        "event": {
            "custom": {
                "updateSequenceNumber": 1,
                "displayName": format!("Pull request #{pr_number} merged"),
                "description": format!("Cycle-time metrics recorded for {repository}#{pr_number}"),
                "url": pr_url,
                "lastUpdated": last_updated.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                "externalEventSourceId": repository,
                "customEventProperties": {
                    "id": "1",
                    "icon": "INFO"
                }
            }
        },
        "componentId": component.component_id
    })
}

#[async_trait]
impl EventSink for CompassClient {
    async fn post_component_event(
        &self,
        component: &ComponentRef,
        repository: &str,
        pr_number: u64,
    ) -> Result<()> {
        let payload = event_payload(component, repository, pr_number, Utc::now());
        let response = self.post_json("/compass/v1/events", &payload).await?;
        info!(
            component = %component.component_id,
            response = %response,
            "compass event created"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn component() -> ComponentRef {
        ComponentRef {
            component_id: "ari:cloud:compass:cloud-1:component/site/comp".to_string(),
            cloud_id: "cloud-1".to_string(),
        }
    }

    #[test]
    fn payload_matches_events_api_envelope() {
        let when = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap();
        let payload = event_payload(&component(), "acme/monorepo", 42, when);

        assert_eq!(payload["cloudId"], "cloud-1");
        assert_eq!(
            payload["componentId"],
            "ari:cloud:compass:cloud-1:component/site/comp"
        );

        let custom = &payload["event"]["custom"];
        assert_eq!(custom["updateSequenceNumber"], 1);
        assert_eq!(custom["url"], "https://github.com/acme/monorepo/pull/42");
        assert_eq!(custom["lastUpdated"], "2024-03-01T12:30:45Z");
        assert_eq!(custom["externalEventSourceId"], "acme/monorepo");
        assert_eq!(custom["customEventProperties"]["icon"], "INFO");
    }
}
