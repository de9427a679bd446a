//! Token issuance and lifecycle
//!
//! - `TokenSigner` mints access and refresh JWTs from explicit configuration
//! - `TokenService` creates, looks up, revokes and deletes named tokens
//! - Custom claims come from an injectable `UserClaimsProvider` and are
//!   serialized by a `ClaimsEncoder`

mod claims;
mod config;
mod service;
mod signer;

#[cfg(test)]
mod tests;

pub use claims::{ClaimsEncoder, JsonClaimsEncoder, NoUserClaims, StaticUserClaims, UserClaimsProvider};
pub use config::TokenSignerConfig;
pub use service::TokenService;
pub use signer::{SignedToken, TokenSigner};
