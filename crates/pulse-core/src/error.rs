//! Error types for compass-pulse

use thiserror::Error;

/// Errors that can occur across the pulse crates.
#[derive(Error, Debug)]
pub enum PulseError {
    /// Required environment variable absent or empty
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    /// Configuration present but unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-2xx response from an external API
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Marker file YAML could not be parsed
    #[error("Marker YAML error: {0}")]
    Yaml(String),

    /// Marker file parsed but its component identifier is unusable
    #[error("Invalid component marker: {0}")]
    MarkerInvalid(String),

    /// Requested scorecard is not attached to the component
    #[error("Scorecard not found on component: {0}")]
    ScorecardNotFound(String),

    /// Scorecard exists but its status is not PASSING
    #[error("Scorecard '{name}' is not passing (status: {status})")]
    ScorecardNotPassing { name: String, status: String },

    /// API response did not have the expected shape
    #[error("Unexpected response structure: {0}")]
    UnexpectedResponse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for PulseError {
    fn from(err: reqwest::Error) -> Self {
        PulseError::Http(err.to_string())
    }
}

/// Convenience result alias used throughout the pulse crates.
pub type Result<T> = std::result::Result<T, PulseError>;
