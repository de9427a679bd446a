//! Maps domain errors to HTTP responses

use actix_web::{http::StatusCode, HttpResponse};
use validator::ValidationErrors;

use tk_core::errors::{DomainError, TokenError};
use tk_shared::errors::{error_codes, IntoErrorResponse};

use crate::dto::{ErrorResponse, ErrorResponseExt};

/// HTTP status for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
        DomainError::Conflict { .. } => StatusCode::CONFLICT,
        DomainError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::Configuration { .. } | DomainError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        DomainError::Token(TokenError::TokenGenerationFailed)
        | DomainError::Token(TokenError::ClaimsEncoding { .. }) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        DomainError::Token(_) => StatusCode::BAD_REQUEST,
    }
}

/// Render a domain error; server-side failures get a generic message
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let status = status_for(error);

    let response = if status.is_server_error() {
        tracing::error!(error = %error, status = status.as_u16(), "Request failed");
        let message = if status == StatusCode::SERVICE_UNAVAILABLE {
            "The token store is temporarily unavailable"
        } else {
            "An internal error occurred"
        };
        ErrorResponse::new(error.error_code(), message)
    } else {
        tracing::warn!(error = %error, status = status.as_u16(), "Request rejected");
        error.to_error_response()
    };

    response.to_response(status)
}

/// Render request body validation failures with per-field details
pub fn handle_validation_errors(errors: &ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request body");

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        response = response.add_detail(field.to_string(), messages);
    }

    response.to_response(StatusCode::BAD_REQUEST)
}

/// 404 body for an absent record
pub fn not_found(message: impl Into<String>) -> HttpResponse {
    ErrorResponse::new(error_codes::NOT_FOUND, message).to_response(StatusCode::NOT_FOUND)
}
