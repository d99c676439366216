//! Error types for the API and its storage adapters

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use twosum_core_pairs::CodecError;

/// Failure talking to the cache or the result database
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cache error: {0}")]
    Cache(String),

    #[error("cache value error: {0}")]
    Codec(#[from] CodecError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[cfg(feature = "redis-cache")]
impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Cache(err.to_string())
    }
}

/// Everything a two-sum request can fail with
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No valid pair found")]
    NotFound,

    #[error("Circuit breaker is open. Too many failures.")]
    BreakerOpen,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// JSON body of every error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::NotFound => StatusCode::BAD_REQUEST,
            ApiError::BreakerOpen | ApiError::StoreUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a client; internal detail stays in the logs
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Validation(message) => message.clone(),
            ApiError::NotFound | ApiError::BreakerOpen => self.to_string(),
            ApiError::StoreUnavailable(_) => "Storage unavailable".to_string(),
            ApiError::Timeout(_) => "Request timed out".to_string(),
            ApiError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ApiError::Validation(_) | ApiError::NotFound => {
                tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
            }
            ApiError::BreakerOpen | ApiError::Timeout(_) => {
                tracing::warn!(status = status.as_u16(), error = %self, "request failed");
            }
            ApiError::StoreUnavailable(_) | ApiError::Internal(_) => {
                tracing::error!(status = status.as_u16(), error = %self, "request failed");
            }
        }

        let body = ErrorBody {
            error: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::validation("Invalid input array").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::BreakerOpen.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Timeout(Duration::from_secs(1)).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::Internal("worker panicked".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_message_hides_internals() {
        let err = ApiError::Internal("thread 'blocking-3' panicked at src/lib.rs".into());
        assert_eq!(err.client_message(), "Internal server error");

        let err = ApiError::from(StoreError::Cache("connection refused (os error 111)".into()));
        assert_eq!(err.client_message(), "Storage unavailable");

        assert_eq!(
            ApiError::validation("Target must be an integer").client_message(),
            "Target must be an integer"
        );
        assert_eq!(ApiError::NotFound.client_message(), "No valid pair found");
    }
}
