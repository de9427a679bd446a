//! Route handlers
//!
//! - Token lifecycle: create, list, lookups, revoke and delete

pub mod tokens;

pub use tokens::AppState;
