//! Repository interfaces and the in-memory store.

pub mod access_token;

pub use access_token::{AccessTokenRepository, InMemoryAccessTokenRepository};
