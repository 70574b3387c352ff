use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use assessor::{AssessmentError, IngestError};

use super::{
    ASSESSOR_STATUS_HEADER, STATUS_INVALID_REQUEST, STATUS_PAYLOAD_TOO_LARGE,
    STATUS_PROCESSING_FAILED,
};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unreadable document: {0}")]
    Ingest(#[from] IngestError),

    #[error("request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("assessment failed: {0}")]
    AssessmentFailed(#[from] AssessmentError),

    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) | GatewayError::Ingest(_) => StatusCode::BAD_REQUEST,
            GatewayError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::AssessmentFailed(_) | GatewayError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Value of the status header for this error.
    pub fn assessor_status(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) | GatewayError::Ingest(_) => STATUS_INVALID_REQUEST,
            GatewayError::PayloadTooLarge(_) => STATUS_PAYLOAD_TOO_LARGE,
            GatewayError::AssessmentFailed(_) | GatewayError::InternalError(_) => {
                STATUS_PROCESSING_FAILED
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Assessment request failed");
        } else {
            tracing::debug!(error = %self, "Assessment request rejected");
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ASSESSOR_STATUS_HEADER,
            HeaderValue::from_static(self.assessor_status()),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
