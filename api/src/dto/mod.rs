pub mod error;
pub mod token;

pub use error::{ErrorResponse, ErrorResponseExt};
pub use token::{AccessTokenResponse, CreateTokenRequest, TokenListResponse};
