//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Sidesa.
///
/// Variants map onto the error classes the service layer reports:
/// validation, not found, credential mismatch, storage, and cancellation.
#[derive(Error, Debug)]
pub enum SidesaError {
    // ============ Domain Errors ============
    /// Malformed input, password mismatch, duplicate email, bad birth date.
    ///
    /// The message is user-facing and surfaced verbatim.
    #[error("{0}")]
    Validation(String),

    /// Lookup by id or email yielded no row.
    #[error("{message}")]
    NotFound {
        resource_type: &'static str,
        message: String,
    },

    /// Login password does not match the stored digest.
    #[error("Password tidak sesuai")]
    InvalidCredentials,

    // ============ Infrastructure Errors ============
    /// Failure beginning, committing, or executing against a transaction.
    #[error("Database error: {0}")]
    Database(String),

    /// Unique constraint violation reported by the database.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Request Errors ============
    /// The caller cancelled the request before or while work was running.
    #[error("Request cancelled")]
    Cancelled,

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SidesaError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::InvalidCredentials => 401,
            Self::NotFound { .. } => 404,
            Self::Conflict(_) => 409,
            // Client Closed Request
            Self::Cancelled => 499,
            Self::Database(_) | Self::Configuration(_) | Self::Internal(_) | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Cancelled => "REQUEST_CANCELLED",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: Into<String>>(resource_type: &'static str, message: T) -> Self {
        Self::NotFound {
            resource_type,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a database error.
    #[must_use]
    pub fn database<T: Into<String>>(message: T) -> Self {
        Self::Database(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// True for user-correctable input errors.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// True when the lookup found nothing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True for failures of the storage layer.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Conflict(_))
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for SidesaError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    // MySQL ER_DUP_ENTRY / SQLSTATE 23000
                    if code == "1062" || code == "23000" {
                        return Self::Conflict(db_err.message().to_string());
                    }
                }
                Self::Database(err.to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for SidesaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `SidesaError`.
    #[must_use]
    pub fn from_error(error: &SidesaError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}

impl From<&SidesaError> for ErrorResponse {
    fn from(error: &SidesaError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(SidesaError::validation("isi form").status_code(), 400);
        assert_eq!(SidesaError::InvalidCredentials.status_code(), 401);
        assert_eq!(SidesaError::not_found("User", "missing").status_code(), 404);
        assert_eq!(SidesaError::Conflict("dup".to_string()).status_code(), 409);
        assert_eq!(SidesaError::Cancelled.status_code(), 499);
        assert_eq!(SidesaError::database("down").status_code(), 500);
        assert_eq!(SidesaError::internal("oops").status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(SidesaError::validation("x").error_code(), "VALIDATION_ERROR");
        assert_eq!(SidesaError::not_found("User", "x").error_code(), "NOT_FOUND");
        assert_eq!(SidesaError::InvalidCredentials.error_code(), "INVALID_CREDENTIALS");
        assert_eq!(SidesaError::database("x").error_code(), "DATABASE_ERROR");
        assert_eq!(SidesaError::Cancelled.error_code(), "REQUEST_CANCELLED");
        assert_eq!(SidesaError::Configuration("x".to_string()).error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = SidesaError::validation("Email sudah pernah digunakan!");
        assert_eq!(err.to_string(), "Email sudah pernah digunakan!");
    }

    #[test]
    fn test_not_found_message_is_verbatim() {
        let err = SidesaError::not_found("User", "Pengguna tidak ditemukan");
        assert_eq!(err.to_string(), "Pengguna tidak ditemukan");
    }

    #[test]
    fn test_error_classes() {
        assert!(SidesaError::validation("x").is_validation());
        assert!(!SidesaError::InvalidCredentials.is_validation());
        assert!(SidesaError::not_found("User", "x").is_not_found());
        assert!(SidesaError::database("x").is_storage());
        assert!(SidesaError::Conflict("x".to_string()).is_storage());
        assert!(!SidesaError::Cancelled.is_storage());
    }

    #[test]
    fn test_error_response_from_error() {
        let err = SidesaError::validation("isi form dengan benar!");
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "VALIDATION_ERROR");
        assert_eq!(response.message, "isi form dengan benar!");
    }

    #[test]
    fn test_error_response_from_ref() {
        let err = SidesaError::Cancelled;
        let response: ErrorResponse = ErrorResponse::from(&err);
        assert_eq!(response.code, "REQUEST_CANCELLED");
    }
}
