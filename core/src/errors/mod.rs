//! Domain-specific error types and error handling.

mod types;


pub use types::TokenError;

use thiserror::Error;
use tk_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};

/// Errors surfaced by the token service and its store
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Uniqueness violation reported by the store
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Malformed signing configuration. Not retryable.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Transient persistence failure, passed through unchanged
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict { message: message.into() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable { message: message.into() }
    }

    /// Check if this is a uniqueness conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Only store outages are worth retrying by the caller
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }

    /// Stable error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => error_codes::VALIDATION_ERROR,
            Self::Conflict { .. } => error_codes::CONFLICT,
            Self::Configuration { .. } => error_codes::CONFIGURATION_ERROR,
            Self::StoreUnavailable { .. } => error_codes::STORE_UNAVAILABLE,
            Self::Internal { .. } => error_codes::INTERNAL_ERROR,
            Self::Token(err) => err.error_code(),
        }
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.error_code(), self.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
