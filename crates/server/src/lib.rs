//! Voice Relay Server
//!
//! Provides the `/notify`, `/pai` and `/health` HTTP endpoints.

pub mod http;
pub mod metrics;
pub mod middleware;
pub mod notifier;
pub mod rate_limit;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, record_rate_limited, record_request};
pub use notifier::Notifier;
pub use rate_limit::{client_identity, RateLimiter};
pub use state::AppState;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use voice_relay_core::NotificationOutcome;

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<&ServerError> for StatusCode {
    fn from(err: &ServerError) -> Self {
        match err {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<voice_relay_core::Error> for ServerError {
    fn from(err: voice_relay_core::Error) -> Self {
        if err.is_caller_error() {
            ServerError::InvalidRequest(err.to_string())
        } else {
            ServerError::Internal(err.to_string())
        }
    }
}

impl From<voice_relay_core::ValidationError> for ServerError {
    fn from(err: voice_relay_core::ValidationError) -> Self {
        ServerError::InvalidRequest(err.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self);
        let message = match &self {
            ServerError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(NotificationOutcome::error(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voice_relay_core::ValidationError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            StatusCode::from(&ServerError::InvalidRequest("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(StatusCode::from(&ServerError::RateLimit), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            StatusCode::from(&ServerError::Internal("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = ServerError::from(ValidationError::TooLong {
            field: "message",
            max: 500,
        });
        assert_eq!(err.to_string(), "Invalid message: Message too long (max 500 characters)");
    }

    #[test]
    fn test_core_error_classification() {
        let err = ServerError::from(voice_relay_core::Error::from(ValidationError::TypeMismatch {
            field: "voice_id",
        }));
        assert!(matches!(err, ServerError::InvalidRequest(_)));

        let err = ServerError::from(voice_relay_core::Error::from(
            voice_relay_pipeline::PipelineError::Config("bad base URL".into()),
        ));
        assert!(matches!(err, ServerError::Internal(detail) if detail.contains("bad base URL")));
    }
}
