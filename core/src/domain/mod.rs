//! Domain layer containing the token record, identity and claim types.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
