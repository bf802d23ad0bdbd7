//! Upstream error definitions.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while calling the upstream API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The HTTP client could not be constructed.
    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection, IO or timeout failure before a full response arrived.
    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Upstream answered with a non-success status.
    ///
    /// `body` holds the parsed JSON payload, or `Value::Null` when the
    /// payload was not JSON.
    #[error("upstream returned status {status}")]
    Status { status: StatusCode, body: Value },

    /// Response body was not JSON or did not have the expected shape.
    #[error("invalid upstream response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl UpstreamError {
    /// Short label used for logging and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Client(_) => "client",
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Status { .. } => "status",
            UpstreamError::Decode(_) => "decode",
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
