//! HTTP error mapping.
//!
//! Every failure leaves the API as `{"error": "<code>"}` with a fixed status,
//! plus `details` for analysis failures and rejected request bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::pipeline::PipelineError;
use crate::storage::StorageError;

/// Error identifiers returned in the `error` field.
pub mod codes {
    pub const INTERNAL: &str = "internal_error";
    pub const NOT_FOUND: &str = "not_found";
    pub const AI_TIMEOUT: &str = "ai_timeout";
    pub const AI_ERROR: &str = "ai_error";
    pub const BAD_REQUEST: &str = "bad_request";
    pub const PAYLOAD_TOO_LARGE: &str = "payload_too_large";
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("analysis timed out")]
    AnalysisTimeout,

    #[error("analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("invalid request body: {0}")]
    InvalidRequest(String),

    #[error("request body rejected ({status}): {message}")]
    BodyRejected { status: StatusCode, message: String },

    #[error("storage unavailable")]
    StorageUnavailable,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Timeout(_) => ApiError::AnalysisTimeout,
            PipelineError::Analysis(e) => ApiError::AnalysisFailed(e.to_string()),
            PipelineError::TaskAborted(msg) => ApiError::AnalysisFailed(msg),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            ApiError::AnalysisTimeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::AnalysisFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::BodyRejected { status, .. } => *status,
            ApiError::StorageUnavailable | ApiError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::AnalysisTimeout => ErrorBody {
                error: codes::AI_TIMEOUT,
                details: None,
            },
            ApiError::AnalysisFailed(details) => ErrorBody {
                error: codes::AI_ERROR,
                details: Some(details.clone()),
            },
            ApiError::InvalidRequest(details) => ErrorBody {
                error: codes::BAD_REQUEST,
                details: Some(details.clone()),
            },
            ApiError::BodyRejected { status, message } => ErrorBody {
                error: if *status == StatusCode::PAYLOAD_TOO_LARGE {
                    codes::PAYLOAD_TOO_LARGE
                } else {
                    codes::BAD_REQUEST
                },
                details: Some(message.clone()),
            },
            ApiError::StorageUnavailable | ApiError::Storage(_) => ErrorBody {
                error: codes::INTERNAL,
                details: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::StorageUnavailable => warn!("Request needs storage but none is open"),
            ApiError::InvalidRequest(_) | ApiError::BodyRejected { .. } => {
                warn!(error = %self, "Rejected request body");
            }
            other => error!(error = %other, "Request failed"),
        }
        (self.status(), Json(self.body())).into_response()
    }
}
