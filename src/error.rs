//! Error types for the Cinematch engine
//!
//! The recommendation core itself is total: unknown users and empty data degrade
//! to empty result lists. Errors only exist at the boundary:
//! - configuration loading and validation
//! - snapshot loading for the catalog/profile providers
//! - HTTP parameter validation

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::borrow::Cow;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Cinematch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Cinematch engine
#[derive(Debug, Error)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig {
        key: &'static str,
        message: Cow<'static, str>,
    },

    // ========================================================================
    // Snapshot Errors
    // ========================================================================
    #[error("Failed to read snapshot {}: {message}", path.display())]
    Snapshot {
        path: PathBuf,
        message: Cow<'static, str>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Malformed snapshot {}: {source}", path.display())]
    SnapshotFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // ========================================================================
    // API Errors
    // ========================================================================
    #[error("Bad request: {message}")]
    BadRequest { message: Cow<'static, str> },

    #[error("Internal server error")]
    Internal {
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ========================================================================
    // Generic Errors
    // ========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Internal {
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if this error should be logged at error level
    pub fn is_error_level(&self) -> bool {
        matches!(
            self,
            Error::Snapshot { .. }
                | Error::SnapshotFormat { .. }
                | Error::Internal { .. }
                | Error::Io(_)
        )
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::Snapshot { .. } | Error::SnapshotFormat { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidConfig { .. } => "CONFIG_ERROR",
            Error::Snapshot { .. } | Error::SnapshotFormat { .. } => "SNAPSHOT_ERROR",
            Error::BadRequest { .. } => "BAD_REQUEST",
            Error::Io(_) | Error::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

// ============================================================================
// Error Response for API
// ============================================================================

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if self.is_error_level() {
            tracing::error!(code, "request failed: {}", self);
        }

        // Don't expose internal error details in production
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            Error::bad_request("hour must be between 0 and 23").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Snapshot {
                path: PathBuf::from("data/snapshot.json"),
                message: "not found".into(),
                source: None,
            }
            .status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            Error::Internal { source: None }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::InvalidConfig {
                key: "REC_HYBRID_LIMIT",
                message: "must be positive".into()
            }
            .error_code(),
            "CONFIG_ERROR"
        );
        assert_eq!(Error::bad_request("x").error_code(), "BAD_REQUEST");
        assert!(!Error::bad_request("x").is_error_level());
        assert!(Error::Internal { source: None }.is_error_level());
    }

    #[test]
    fn test_snapshot_error_keeps_kind_under_context() {
        use anyhow::Context;

        let result: Result<()> = Err(Error::Snapshot {
            path: PathBuf::from("data/snapshot.json"),
            message: "No such file".into(),
            source: None,
        });
        let err = result
            .context("failed to load snapshot from data/snapshot.json")
            .unwrap_err();

        assert!(err.to_string().contains("failed to load snapshot"));
        let inner = err.downcast_ref::<Error>().unwrap();
        assert_eq!(inner.error_code(), "SNAPSHOT_ERROR");
    }

    #[test]
    fn test_snapshot_error_message_names_path() {
        let err = Error::Snapshot {
            path: PathBuf::from("/tmp/missing.json"),
            message: "No such file".into(),
            source: None,
        };
        assert!(err.to_string().contains("/tmp/missing.json"));
    }
}
