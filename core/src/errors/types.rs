//! Token signing and decoding errors

use thiserror::Error;
use tk_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};

use crate::domain::entities::claims::TokenKind;

/// Errors raised while minting or reading token material
#[derive(Error, Debug, PartialEq)]
pub enum TokenError {
    #[error("Token identity must not be empty")]
    EmptyIdentity,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Missing required claim: {claim}")]
    MissingClaim { claim: String },

    #[error("Expected {expected} token, found {found} token")]
    UnexpectedKind { expected: TokenKind, found: TokenKind },

    #[error("Token identity does not match the owning user")]
    IdentityMismatch,

    #[error("Token generation failed")]
    TokenGenerationFailed,

    #[error("Custom claims could not be encoded: {message}")]
    ClaimsEncoding { message: String },
}

impl TokenError {
    pub fn missing_claim(claim: impl Into<String>) -> Self {
        Self::MissingClaim { claim: claim.into() }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSignature => error_codes::TOKEN_SIGNATURE_INVALID,
            Self::MissingClaim { .. } => error_codes::TOKEN_MISSING_CLAIM,
            Self::TokenGenerationFailed | Self::ClaimsEncoding { .. } => {
                error_codes::TOKEN_GENERATION_FAILED
            }
            Self::EmptyIdentity
            | Self::InvalidTokenFormat
            | Self::UnexpectedKind { .. }
            | Self::IdentityMismatch => error_codes::TOKEN_INVALID,
        }
    }
}

impl IntoErrorResponse for TokenError {
    fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.error_code(), self.to_string())
    }
}
