//! Access token repository module.

mod r#trait;
pub use r#trait::AccessTokenRepository;

mod memory;
pub use memory::InMemoryAccessTokenRepository;

#[cfg(test)]
mod tests;
