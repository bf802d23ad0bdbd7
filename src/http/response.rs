//! Response handling and error mapping.
//!
//! # Responsibilities
//! - Map local and upstream failures to HTTP status codes
//! - Render every error as a JSON `{ "message": ... }` body
//! - Relay upstream status and body verbatim where an operation asks for it
//!
//! # Design Decisions
//! - Upstream failures surface as 500, never as the upstream status,
//!   unless explicitly relayed
//! - Input errors are 400 and never reach upstream
//! - Inbound timeouts are 408 with the same JSON body

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::pagination::ParamError;
use crate::upstream::UpstreamError;

/// JSON body for error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error returned by resource operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource or route does not exist locally.
    #[error("{0}")]
    NotFound(String),

    /// Malformed path or query value.
    #[error(transparent)]
    InvalidParam(#[from] ParamError),

    /// Request could not be extracted (bad JSON, duplicate query keys).
    #[error("{0}")]
    BadRequest(String),

    /// Upstream call failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Request exceeded the inbound timeout.
    #[error("Request timed out")]
    Timeout,

    /// Middleware failure with no better mapping.
    #[error("{0}")]
    Internal(String),

    /// Upstream answer passed through unchanged.
    #[error("upstream responded with {status}")]
    Relayed { status: StatusCode, body: Value },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidParam(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Upstream(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Relayed { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Relayed { status, body } => (status, Json(body)).into_response(),
            ApiError::Upstream(e) => {
                tracing::error!(kind = e.kind(), error = %e, "Upstream failure");
                (status, Json(MessageBody::new(e.to_string()))).into_response()
            }
            other => (status, Json(MessageBody::new(other.to_string()))).into_response(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
