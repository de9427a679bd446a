//! Shared configuration and common types for the TokenKeeper server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types and loading
//! - The error response structure rendered by the transport layer

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use self::config::{
    AppConfig, ConfigError, DatabaseConfig, Environment, JwtConfig, LogFormat, LoggingConfig,
    ServerConfig,
};
pub use self::errors::{error_codes, ErrorResponse, IntoErrorResponse};
