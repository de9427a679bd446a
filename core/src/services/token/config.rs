//! Configuration for the token signer

use chrono::Duration;
use jsonwebtoken::Algorithm;
use std::fmt;
use std::str::FromStr;

use tk_shared::config::JwtConfig;

use crate::domain::entities::claims::reserved;
use crate::errors::DomainError;

/// Validated signing configuration
#[derive(Clone)]
pub struct TokenSignerConfig {
    secret: Vec<u8>,
    /// JWT signing algorithm, HMAC family only
    pub algorithm: Algorithm,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
    /// Claim holding the identity
    pub identity_claim_key: String,
    /// Claim holding the custom user claims
    pub user_claims_key: String,
    /// Whether refresh tokens carry the custom user claims
    pub user_claims_in_refresh_token: bool,
}

impl TokenSignerConfig {
    /// Validates `config` and converts it into signer settings
    ///
    /// # Errors
    ///
    /// `DomainError::Configuration` when the secret is empty, the algorithm
    /// is unknown or not HMAC, a lifetime is not positive or too large, or the claim keys
    /// are empty, identical, or collide with a claim the signer writes.
    pub fn from_jwt_config(config: &JwtConfig) -> Result<Self, DomainError> {
        if !config.has_secret() {
            return Err(DomainError::configuration("secret_key is not set"));
        }

        let algorithm = parse_algorithm(&config.algorithm)?;

        let access_token_ttl = lifetime("access_token_expires", config.access_token_expires)?;
        let refresh_token_ttl = lifetime("refresh_token_expires", config.refresh_token_expires)?;

        validate_claim_key("identity_claim_key", &config.identity_claim_key)?;
        validate_claim_key("user_claims_key", &config.user_claims_key)?;
        if config.identity_claim_key == config.user_claims_key {
            return Err(DomainError::configuration(
                "identity_claim_key and user_claims_key must differ",
            ));
        }

        Ok(Self {
            secret: config.secret_key.as_bytes().to_vec(),
            algorithm,
            access_token_ttl,
            refresh_token_ttl,
            identity_claim_key: config.identity_claim_key.clone(),
            user_claims_key: config.user_claims_key.clone(),
            user_claims_in_refresh_token: config.user_claims_in_refresh_token,
        })
    }

    pub(crate) fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl TryFrom<&JwtConfig> for TokenSignerConfig {
    type Error = DomainError;

    fn try_from(config: &JwtConfig) -> Result<Self, Self::Error> {
        Self::from_jwt_config(config)
    }
}

// Keeps the secret out of logs
impl fmt::Debug for TokenSignerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSignerConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("identity_claim_key", &self.identity_claim_key)
            .field("user_claims_key", &self.user_claims_key)
            .field("user_claims_in_refresh_token", &self.user_claims_in_refresh_token)
            .finish()
    }
}

fn parse_algorithm(name: &str) -> Result<Algorithm, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::configuration("algorithm is not set"));
    }

    let algorithm = Algorithm::from_str(&trimmed.to_uppercase())
        .map_err(|_| DomainError::configuration(format!("unknown algorithm '{}'", name)))?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => Err(DomainError::configuration(format!(
            "algorithm {:?} needs a key pair; only HS256, HS384 and HS512 are supported",
            other
        ))),
    }
}

fn lifetime(name: &str, seconds: i64) -> Result<Duration, DomainError> {
    if seconds <= 0 {
        return Err(DomainError::configuration(format!(
            "{} must be a positive number of seconds",
            name
        )));
    }
    Duration::try_seconds(seconds)
        .ok_or_else(|| DomainError::configuration(format!("{} is out of range", name)))
}

fn validate_claim_key(field: &str, key: &str) -> Result<(), DomainError> {
    if key.trim().is_empty() {
        return Err(DomainError::configuration(format!("{} must not be empty", field)));
    }
    if reserved::ALL.contains(&key) {
        return Err(DomainError::configuration(format!(
            "{} '{}' collides with a reserved claim",
            field, key
        )));
    }
    Ok(())
}
