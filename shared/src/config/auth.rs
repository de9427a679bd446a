//! Token signing configuration

use serde::{Deserialize, Serialize};

/// Signing configuration for access and refresh tokens
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Secret used to sign tokens. Empty means not configured.
    #[serde(default)]
    pub secret_key: String,

    /// Signing algorithm name (default: HS256)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_access_token_expires")]
    pub access_token_expires: i64,

    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_token_expires")]
    pub refresh_token_expires: i64,

    /// Claim holding the identity of the token owner
    #[serde(default = "default_identity_claim_key")]
    pub identity_claim_key: String,

    /// Claim holding the custom user claims
    #[serde(default = "default_user_claims_key")]
    pub user_claims_key: String,

    /// Whether refresh tokens carry the custom user claims too
    #[serde(default)]
    pub user_claims_in_refresh_token: bool,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            algorithm: default_algorithm(),
            access_token_expires: default_access_token_expires(),
            refresh_token_expires: default_refresh_token_expires(),
            identity_claim_key: default_identity_claim_key(),
            user_claims_key: default_user_claims_key(),
            user_claims_in_refresh_token: false,
        }
    }
}

impl JwtConfig {
    /// Create a new configuration with secret
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            ..Default::default()
        }
    }

    /// Set the signing algorithm
    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }

    /// Set access token lifetime in seconds
    pub fn with_access_token_expires(mut self, seconds: i64) -> Self {
        self.access_token_expires = seconds;
        self
    }

    /// Set refresh token lifetime in seconds
    pub fn with_refresh_token_expires(mut self, seconds: i64) -> Self {
        self.refresh_token_expires = seconds;
        self
    }

    /// Embed user claims in refresh tokens
    pub fn with_user_claims_in_refresh_token(mut self, enabled: bool) -> Self {
        self.user_claims_in_refresh_token = enabled;
        self
    }

    /// Check whether a signing secret is configured
    pub fn has_secret(&self) -> bool {
        !self.secret_key.trim().is_empty()
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            secret_key: std::env::var("JWT_SECRET_KEY").unwrap_or_default(),
            algorithm: std::env::var("JWT_ALGORITHM").unwrap_or(defaults.algorithm),
            access_token_expires: std::env::var("JWT_ACCESS_TOKEN_EXPIRES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.access_token_expires),
            refresh_token_expires: std::env::var("JWT_REFRESH_TOKEN_EXPIRES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.refresh_token_expires),
            identity_claim_key: std::env::var("JWT_IDENTITY_CLAIM_KEY")
                .unwrap_or(defaults.identity_claim_key),
            user_claims_key: std::env::var("JWT_USER_CLAIMS_KEY")
                .unwrap_or(defaults.user_claims_key),
            user_claims_in_refresh_token: std::env::var("JWT_USER_CLAIMS_IN_REFRESH_TOKEN")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.user_claims_in_refresh_token),
        }
    }
}

fn default_algorithm() -> String {
    String::from("HS256")
}

fn default_access_token_expires() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_expires() -> i64 {
    2_592_000 // 30 days
}

fn default_identity_claim_key() -> String {
    String::from("identity")
}

fn default_user_claims_key() -> String {
    String::from("user_claims")
}
