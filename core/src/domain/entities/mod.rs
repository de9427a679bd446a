//! Domain entities representing core business objects.

pub mod access_token;
pub mod claims;
pub mod identity;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use access_token::{AccessTokenRecord, NewAccessToken, TokenStatus};
pub use claims::{ClaimValue, TokenKind, TokenPayload, UserClaims};
pub use identity::Identity;
