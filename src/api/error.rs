//! Unified API error handling
//!
//! Every failure of the gateway reaches the UI as one human-readable message
//! in a consistent JSON envelope.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::model::InputError;
use crate::service::AssessmentError;

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Malformed form submission (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Scoring service refused the assessment input (422)
    #[error("{0}")]
    Rejected(String),

    /// Scoring service failed or was unreachable (502)
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Scoring service answered with a malformed assessment (502)
    #[error("{0}")]
    UpstreamContract(String),

    /// Scoring service did not answer in time (504)
    #[error("{0}")]
    GatewayTimeout(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    fn error_type(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Rejected(_) => "assessment_rejected",
            ApiError::ExternalService(_) => "external_service_error",
            ApiError::UpstreamContract(_) => "upstream_contract_violation",
            ApiError::GatewayTimeout(_) => "gateway_timeout",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ExternalService(_) | ApiError::UpstreamContract(_) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = self.error_type();

        if status.is_server_error() {
            tracing::error!(error_type, status = status.as_u16(), message = %self, "API error");
        } else {
            tracing::warn!(error_type, status = status.as_u16(), message = %self, "API error");
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

impl From<InputError> for ApiError {
    fn from(err: InputError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<AssessmentError> for ApiError {
    fn from(err: AssessmentError) -> Self {
        match err {
            AssessmentError::Service { status, message } if (400..500).contains(&status) => {
                ApiError::Rejected(message)
            }
            AssessmentError::Timeout(_) => ApiError::GatewayTimeout(err.to_string()),
            AssessmentError::Service { .. } | AssessmentError::Transport(_) => {
                ApiError::ExternalService(err.to_string())
            }
            AssessmentError::ContractViolation(_) => ApiError::UpstreamContract(err.to_string()),
            AssessmentError::Cancelled => ApiError::Internal(err.to_string()),
        }
    }
}
