//! # Infrastructure Layer
//!
//! Concrete persistence for the TokenKeeper service.
//!
//! ## Architecture
//!
//! - **Database**: MySQL connection pool and the `access_tokens` store using SQLx
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

// Re-export core types for convenience
pub use tk_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Configuration re-exported from the shared crate
pub mod config {
    pub use tk_shared::config::DatabaseConfig;
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failure
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
