//! Business services containing domain logic and use cases.

pub mod token;

// Re-export commonly used types
pub use token::{
    ClaimsEncoder, JsonClaimsEncoder, NoUserClaims, SignedToken, StaticUserClaims, TokenService,
    TokenSigner, TokenSignerConfig, UserClaimsProvider,
};
