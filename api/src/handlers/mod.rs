//! Request-independent response helpers

pub mod error;

pub use error::{handle_domain_error, handle_validation_errors, not_found, status_for};
