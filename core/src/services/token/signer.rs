//! Stateless JWT signer for access and refresh tokens

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};
use tracing::{debug, error};
use uuid::Uuid;

use tk_shared::config::JwtConfig;

use crate::domain::entities::claims::reserved;
use crate::domain::entities::{Identity, TokenKind, TokenPayload, UserClaims};
use crate::errors::{DomainError, TokenError};

use super::claims::{ClaimsEncoder, JsonClaimsEncoder};
use super::config::TokenSignerConfig;

/// A freshly signed token and the claims needed to track it
#[derive(Debug, Clone, PartialEq)]
pub struct SignedToken {
    pub token: String,
    pub jti: String,
    pub kind: TokenKind,
    /// Unix seconds
    pub issued_at: i64,
    /// Unix seconds
    pub expires_at: i64,
}

/// Signs tokens from explicit configuration.
///
/// Holds no mutable state; a single instance can be shared across requests.
pub struct TokenSigner {
    config: TokenSignerConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    encoder: Arc<dyn ClaimsEncoder>,
}

impl TokenSigner {
    /// Creates a signer using the default JSON claims encoder
    pub fn new(config: TokenSignerConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret());
        let decoding_key = DecodingKey::from_secret(config.secret());

        // Expiry is the verifier's concern; decoding here only reads claims back
        let mut validation = Validation::new(config.algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
            encoder: Arc::new(JsonClaimsEncoder),
        }
    }

    /// Validates `config` and builds a signer from it
    ///
    /// # Errors
    ///
    /// `DomainError::Configuration` when the configuration is unusable
    pub fn from_jwt_config(config: &JwtConfig) -> Result<Self, DomainError> {
        Ok(Self::new(TokenSignerConfig::from_jwt_config(config)?))
    }

    /// Replaces the encoder used for custom claims
    pub fn with_claims_encoder(mut self, encoder: Arc<dyn ClaimsEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn config(&self) -> &TokenSignerConfig {
        &self.config
    }

    /// Signs a token of `kind` for `identity`.
    ///
    /// Every call gets a new `jti` and the current time, so identical inputs
    /// produce different tokens. Custom claims are embedded in access tokens
    /// when non-empty, and in refresh tokens only when
    /// `user_claims_in_refresh_token` is set.
    ///
    /// # Errors
    ///
    /// * `TokenError::EmptyIdentity` - identity is empty or whitespace
    /// * `TokenError::ClaimsEncoding` - a custom claim could not be encoded
    /// * `TokenError::TokenGenerationFailed` - the JWT library refused to sign
    pub fn sign(
        &self,
        identity: &Identity,
        kind: TokenKind,
        user_claims: &UserClaims,
    ) -> Result<SignedToken, DomainError> {
        if identity.is_empty() {
            return Err(TokenError::EmptyIdentity.into());
        }

        let ttl = match kind {
            TokenKind::Access => self.config.access_token_ttl,
            TokenKind::Refresh => self.config.refresh_token_ttl,
        };
        let issued_at = Utc::now().timestamp();
        let expires_at = issued_at + ttl.num_seconds();
        let jti = Uuid::new_v4().to_string();

        let mut claims = Map::new();
        claims.insert(reserved::ISSUED_AT.to_string(), Value::from(issued_at));
        claims.insert(reserved::NOT_BEFORE.to_string(), Value::from(issued_at));
        claims.insert(reserved::EXPIRES_AT.to_string(), Value::from(expires_at));
        claims.insert(reserved::TOKEN_ID.to_string(), Value::from(jti.clone()));
        claims.insert(reserved::TOKEN_TYPE.to_string(), Value::from(kind.as_str()));
        claims.insert(
            self.config.identity_claim_key.clone(),
            Value::from(identity.as_str()),
        );
        if kind == TokenKind::Access {
            claims.insert(reserved::FRESH.to_string(), Value::Bool(false));
        }

        let embed_user_claims = !user_claims.is_empty()
            && (kind == TokenKind::Access || self.config.user_claims_in_refresh_token);
        if embed_user_claims {
            let encoded = self.encoder.encode(user_claims)?;
            claims.insert(self.config.user_claims_key.clone(), Value::Object(encoded));
        }

        let header = Header::new(self.config.algorithm);
        let token = encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, kind = %kind, "Failed to sign token");
            TokenError::TokenGenerationFailed
        })?;

        debug!(kind = %kind, jti = %jti, "Signed token");

        Ok(SignedToken {
            token,
            jti,
            kind,
            issued_at,
            expires_at,
        })
    }

    /// Signs an access token with the given custom claims
    pub fn sign_access_token(
        &self,
        identity: &Identity,
        user_claims: &UserClaims,
    ) -> Result<SignedToken, DomainError> {
        self.sign(identity, TokenKind::Access, user_claims)
    }

    /// Signs a refresh token with the given custom claims
    pub fn sign_refresh_token(
        &self,
        identity: &Identity,
        user_claims: &UserClaims,
    ) -> Result<SignedToken, DomainError> {
        self.sign(identity, TokenKind::Refresh, user_claims)
    }

    /// Verifies the signature of `token` and reads its claims back.
    ///
    /// Expiry and not-before are not checked.
    ///
    /// # Errors
    ///
    /// * `TokenError::InvalidSignature` - signed with another secret
    /// * `TokenError::InvalidTokenFormat` - malformed, wrong algorithm or bad `type`
    /// * `TokenError::MissingClaim` - identity, `jti`, `type`, `iat` or `exp` absent
    pub fn decode(&self, token: &str) -> Result<TokenPayload, DomainError> {
        let data = decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::InvalidTokenFormat,
            })?;
        let claims = data.claims;

        let identity = match claims.get(&self.config.identity_claim_key) {
            Some(Value::String(s)) => Identity::from(s.as_str()),
            Some(Value::Number(n)) => Identity::from(n.to_string()),
            _ => return Err(TokenError::missing_claim(&self.config.identity_claim_key).into()),
        };

        let kind = required_str(&claims, reserved::TOKEN_TYPE)?
            .parse::<TokenKind>()
            .map_err(|_| TokenError::InvalidTokenFormat)?;

        Ok(TokenPayload {
            identity,
            kind,
            jti: required_str(&claims, reserved::TOKEN_ID)?.to_string(),
            issued_at: required_i64(&claims, reserved::ISSUED_AT)?,
            not_before: claims.get(reserved::NOT_BEFORE).and_then(Value::as_i64),
            expires_at: required_i64(&claims, reserved::EXPIRES_AT)?,
            fresh: claims.get(reserved::FRESH).and_then(Value::as_bool),
            user_claims: claims
                .get(&self.config.user_claims_key)
                .and_then(Value::as_object)
                .cloned(),
        })
    }
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn required_str<'a>(claims: &'a Map<String, Value>, claim: &str) -> Result<&'a str, TokenError> {
    claims
        .get(claim)
        .and_then(Value::as_str)
        .ok_or_else(|| TokenError::missing_claim(claim))
}

fn required_i64(claims: &Map<String, Value>, claim: &str) -> Result<i64, TokenError> {
    claims
        .get(claim)
        .and_then(Value::as_i64)
        .ok_or_else(|| TokenError::missing_claim(claim))
}
