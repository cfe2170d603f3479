//! Compass scorecard status via the gateway GraphQL API.
//!
//! One fixed query fetches the scorecards attached to a component with
//! their scores, status bands, and per-criteria breakdown. The traversal
//! over the deserialized response is pure and tested with canned JSON.

use crate::CompassClient;
use pulse_core::{PulseError, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Scorecard status name that satisfies enforcement.
pub const PASSING_STATUS: &str = "PASSING";

/// Fixed query; `$componentId` is the only variable.
const SCORECARD_QUERY: &str = r#"
query getComponentScorecardsWithScores($componentId: ID!) {
  compass @optIn(to: "compass-beta") {
    component(id: $componentId) {
      __typename
      ... on CompassComponent {
        id
        name
        scorecards {
          id
          name
          scorecardScore(query: {componentId: $componentId}) {
            totalScore
            maxTotalScore
            status {
              name
              lowerBound
              upperBound
            }
          }
          criterias {
            id
            name
            weight
            scorecardCriteriaScore(query: {componentId: $componentId}) {
              score
              maxScore
              explanation
            }
          }
        }
      }
      ... on QueryError {
        message
      }
    }
  }
}
"#;

// --- response shape ---

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ResponseData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    compass: Option<CompassData>,
}

#[derive(Debug, Deserialize)]
struct CompassData {
    component: Option<ComponentData>,
}

/// Union of `CompassComponent` and `QueryError`; exactly one side is set.
#[derive(Debug, Deserialize)]
struct ComponentData {
    scorecards: Option<Vec<ScorecardData>>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScorecardData {
    name: String,
    scorecard_score: Option<ScoreData>,
    #[serde(default)]
    criterias: Vec<CriteriaData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreData {
    total_score: Option<f64>,
    max_total_score: Option<f64>,
    status: Option<StatusData>,
}

#[derive(Debug, Deserialize)]
struct StatusData {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CriteriaData {
    name: String,
    scorecard_criteria_score: Option<CriteriaScoreData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CriteriaScoreData {
    score: Option<f64>,
    max_score: Option<f64>,
    explanation: Option<String>,
}

// --- public verdict ---

/// Score of one scorecard criterion, for diagnostic output.
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaScore {
    pub name: String,
    pub score: f64,
    pub max_score: f64,
    pub explanation: Option<String>,
}

/// Evaluated status of one scorecard on one component.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorecardVerdict {
    pub name: String,
    pub status: String,
    pub total_score: f64,
    pub max_total_score: f64,
    pub criteria: Vec<CriteriaScore>,
}

impl ScorecardVerdict {
    pub fn is_passing(&self) -> bool {
        self.status == PASSING_STATUS
    }

    /// Error unless the scorecard status is PASSING.
    pub fn require_passing(&self) -> Result<()> {
        if self.is_passing() {
            Ok(())
        } else {
            Err(PulseError::ScorecardNotPassing {
                name: self.name.clone(),
                status: self.status.clone(),
            })
        }
    }
}

/// Walk the response down to the named scorecard's score and status.
fn evaluate_response(response: GraphQlResponse, scorecard_name: &str) -> Result<ScorecardVerdict> {
    if let Some(errors) = response.errors {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        return Err(PulseError::UnexpectedResponse(format!(
            "GraphQL errors: {}",
            messages.join("; ")
        )));
    }

    let component = response
        .data
        .and_then(|d| d.compass)
        .and_then(|c| c.component)
        .ok_or_else(|| {
            PulseError::UnexpectedResponse("response has no component data".to_string())
        })?;

    if let Some(message) = component.message {
        return Err(PulseError::UnexpectedResponse(format!(
            "component query error: {message}"
        )));
    }

    let scorecards = component.scorecards.ok_or_else(|| {
        PulseError::UnexpectedResponse("component carries no scorecards field".to_string())
    })?;

    let scorecard = scorecards
        .into_iter()
        .find(|s| s.name == scorecard_name)
        .ok_or_else(|| PulseError::ScorecardNotFound(scorecard_name.to_string()))?;

    let score = scorecard.scorecard_score.ok_or_else(|| {
        PulseError::UnexpectedResponse(format!("scorecard '{scorecard_name}' has no score"))
    })?;
    let status = score.status.ok_or_else(|| {
        PulseError::UnexpectedResponse(format!("scorecard '{scorecard_name}' has no status"))
    })?;

    let criteria = scorecard
        .criterias
        .into_iter()
        .filter_map(|c| {
            c.scorecard_criteria_score.map(|s| CriteriaScore {
                name: c.name,
                score: s.score.unwrap_or(0.0),
                max_score: s.max_score.unwrap_or(0.0),
                explanation: s.explanation,
            })
        })
        .collect();

    Ok(ScorecardVerdict {
        name: scorecard.name,
        status: status.name,
        total_score: score.total_score.unwrap_or(0.0),
        max_total_score: score.max_total_score.unwrap_or(0.0),
        criteria,
    })
}

impl CompassClient {
    /// Query the named scorecard's current status for a component.
    ///
    /// Returns the verdict whether or not it is passing; callers enforce
    /// with [`ScorecardVerdict::require_passing`].
    pub async fn scorecard_status(
        &self,
        component_id: &str,
        scorecard_name: &str,
    ) -> Result<ScorecardVerdict> {
        let body = json!({
            "query": SCORECARD_QUERY,
            "variables": { "componentId": component_id },
        });
        let raw = self.post_json("/graphql", &body).await?;
        let response: GraphQlResponse = serde_json::from_value(raw)?;
        let verdict = evaluate_response(response, scorecard_name)?;

        for criterion in &verdict.criteria {
            debug!(
                criterion = %criterion.name,
                score = criterion.score,
                max_score = criterion.max_score,
                explanation = criterion.explanation.as_deref().unwrap_or(""),
                "scorecard criterion"
            );
        }
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> GraphQlResponse {
        serde_json::from_str(json).expect("canned response should parse")
    }

    const PASSING_RESPONSE: &str = r#"{
        "data": {
            "compass": {
                "component": {
                    "__typename": "CompassComponent",
                    "id": "ari:cloud:compass:c1:component/a/b",
                    "name": "auth-service",
                    "scorecards": [
                        {
                            "id": "sc-1",
                            "name": "Data Encryption Scorecard",
                            "scorecardScore": {
                                "totalScore": 90.0,
                                "maxTotalScore": 100.0,
                                "status": {"name": "PASSING", "lowerBound": 75.0, "upperBound": 100.0}
                            },
                            "criterias": [
                                {
                                    "id": "cr-1",
                                    "name": "Has encryption at rest",
                                    "weight": 50,
                                    "scorecardCriteriaScore": {
                                        "score": 50.0,
                                        "maxScore": 50.0,
                                        "explanation": "field present"
                                    }
                                },
                                {
                                    "id": "cr-2",
                                    "name": "Has key rotation runbook",
                                    "weight": 50,
                                    "scorecardCriteriaScore": null
                                }
                            ]
                        },
                        {
                            "id": "sc-2",
                            "name": "Operational Readiness",
                            "scorecardScore": {
                                "totalScore": 10.0,
                                "maxTotalScore": 100.0,
                                "status": {"name": "NEEDS_ATTENTION", "lowerBound": 0.0, "upperBound": 50.0}
                            },
                            "criterias": []
                        }
                    ]
                }
            }
        }
    }"#;

    #[test]
    fn finds_scorecard_by_name_and_reads_status() {
        let verdict =
            evaluate_response(response(PASSING_RESPONSE), "Data Encryption Scorecard").unwrap();
        assert_eq!(verdict.status, "PASSING");
        assert!(verdict.is_passing());
        assert!(verdict.require_passing().is_ok());
        assert_eq!(verdict.total_score, 90.0);
        assert_eq!(verdict.max_total_score, 100.0);
        // Criterion without a score is dropped from the breakdown.
        assert_eq!(verdict.criteria.len(), 1);
        assert_eq!(verdict.criteria[0].name, "Has encryption at rest");
    }

    #[test]
    fn non_passing_status_fails_enforcement() {
        let verdict =
            evaluate_response(response(PASSING_RESPONSE), "Operational Readiness").unwrap();
        assert!(!verdict.is_passing());
        let err = verdict.require_passing().unwrap_err();
        assert!(matches!(
            err,
            PulseError::ScorecardNotPassing { ref status, .. } if status == "NEEDS_ATTENTION"
        ));
    }

    #[test]
    fn missing_scorecard_is_reported() {
        let err = evaluate_response(response(PASSING_RESPONSE), "No Such Scorecard").unwrap_err();
        assert!(matches!(err, PulseError::ScorecardNotFound(_)));
    }

    #[test]
    fn graphql_errors_are_surfaced() {
        let err = evaluate_response(
            response(r#"{"data": null, "errors": [{"message": "not authorized"}]}"#),
            "any",
        )
        .unwrap_err();
        assert!(matches!(err, PulseError::UnexpectedResponse(msg) if msg.contains("not authorized")));
    }

    #[test]
    fn component_query_error_is_surfaced() {
        let err = evaluate_response(
            response(
                r#"{"data": {"compass": {"component": {
                    "__typename": "QueryError",
                    "message": "component not found"
                }}}}"#,
            ),
            "any",
        )
        .unwrap_err();
        assert!(matches!(err, PulseError::UnexpectedResponse(msg) if msg.contains("component not found")));
    }

    #[test]
    fn missing_component_is_unexpected_shape() {
        let err = evaluate_response(response(r#"{"data": {"compass": null}}"#), "any").unwrap_err();
        assert!(matches!(err, PulseError::UnexpectedResponse(_)));
    }
}
