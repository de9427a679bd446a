//! # TokenKeeper Core
//!
//! Domain layer for access token issuance and lifecycle: the record and
//! claim types, the signer that mints tokens, the service that orchestrates
//! create/lookup/revoke/delete, and the store interface it persists through.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    AccessTokenRecord, ClaimValue, Identity, NewAccessToken, TokenKind, TokenPayload, TokenStatus,
    UserClaims,
};
pub use errors::{DomainError, DomainResult, TokenError};
pub use repositories::{AccessTokenRepository, InMemoryAccessTokenRepository};
pub use services::{TokenService, TokenSigner};
