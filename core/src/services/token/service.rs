//! Access token lifecycle service

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use tk_shared::config::JwtConfig;

use crate::domain::entities::{AccessTokenRecord, Identity, NewAccessToken, TokenKind, TokenPayload};
use crate::errors::{DomainError, TokenError};
use crate::repositories::AccessTokenRepository;

use super::claims::{NoUserClaims, UserClaimsProvider};
use super::signer::TokenSigner;

/// Issues named, revocable access tokens and tracks them in a store
pub struct TokenService<R: AccessTokenRepository> {
    pub(crate) repository: R,
    signer: TokenSigner,
    claims_provider: Arc<dyn UserClaimsProvider>,
}

impl<R: AccessTokenRepository> TokenService<R> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `repository` - Store owning the token records
    /// * `signer` - Signer used for tokens the caller does not supply
    pub fn new(repository: R, signer: TokenSigner) -> Self {
        Self {
            repository,
            signer,
            claims_provider: Arc::new(NoUserClaims),
        }
    }

    /// Creates a service with a signer built from `config`
    ///
    /// # Errors
    ///
    /// `DomainError::Configuration` when the signing configuration is unusable
    pub fn from_config(repository: R, config: &JwtConfig) -> Result<Self, DomainError> {
        Ok(Self::new(repository, TokenSigner::from_jwt_config(config)?))
    }

    /// Replaces the source of custom claims for signed tokens
    pub fn with_claims_provider(mut self, provider: Arc<dyn UserClaimsProvider>) -> Self {
        self.claims_provider = provider;
        self
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    /// Creates and persists a named token for a user
    ///
    /// Missing tokens are signed with `user_id` as identity; empty strings
    /// count as missing. A supplied access token must verify against the
    /// configured secret, be an access token and carry the same identity;
    /// a supplied refresh token is checked the same way.
    ///
    /// # Arguments
    ///
    /// * `user_id` - Owner of the token
    /// * `name` - Label unique per user
    /// * `access_token` - Pre-signed access token, if any
    /// * `refresh_token` - Pre-signed refresh token, if any
    ///
    /// # Returns
    ///
    /// * `Ok(AccessTokenRecord)` - The stored record
    /// * `Err(DomainError::Conflict)` - Name or jti already taken, from the store
    /// * `Err(DomainError::Token)` - Signing failed or a supplied token was rejected
    pub async fn create_access_token(
        &self,
        user_id: impl Into<Identity>,
        name: &str,
        access_token: Option<String>,
        refresh_token: Option<String>,
    ) -> Result<AccessTokenRecord, DomainError> {
        let user_id = user_id.into();
        if user_id.is_empty() {
            return Err(TokenError::EmptyIdentity.into());
        }
        if name.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "Token name must not be empty".to_string(),
            });
        }

        let access_token = access_token.filter(|t| !t.is_empty());
        let refresh_token = refresh_token.filter(|t| !t.is_empty());

        // Claims are only needed when something has to be signed
        let user_claims = if access_token.is_none() || refresh_token.is_none() {
            self.claims_provider.user_claims(&user_id)?
        } else {
            Default::default()
        };

        let (access_token, jti) = match access_token {
            Some(token) => {
                let payload = self.verify_supplied(&token, &user_id, TokenKind::Access)?;
                (token, payload.jti)
            }
            None => {
                let signed = self.signer.sign_access_token(&user_id, &user_claims)?;
                (signed.token, signed.jti)
            }
        };

        let refresh_token = match refresh_token {
            Some(token) => {
                self.verify_supplied(&token, &user_id, TokenKind::Refresh)?;
                token
            }
            None => self.signer.sign_refresh_token(&user_id, &user_claims)?.token,
        };

        let record = self
            .repository
            .create(NewAccessToken {
                name: name.to_string(),
                user_id,
                access_token,
                refresh_token,
                jti,
            })
            .await?;

        info!(
            user_id = %record.user_id,
            token_id = %record.id,
            name = %record.name,
            "Access token created"
        );

        Ok(record)
    }

    /// Fetches a record by id; `None` when absent
    pub async fn get(&self, token_id: Uuid) -> Result<Option<AccessTokenRecord>, DomainError> {
        debug!(token_id = %token_id, "Looking up access token");
        self.repository.get(token_id).await
    }

    pub async fn get_by_name(
        &self,
        user_id: impl Into<Identity>,
        name: &str,
    ) -> Result<Option<AccessTokenRecord>, DomainError> {
        let user_id = user_id.into();
        debug!(user_id = %user_id, name = %name, "Looking up access token by name");
        self.repository.get_by_name(&user_id, name).await
    }

    pub async fn get_by_jti(
        &self,
        user_id: impl Into<Identity>,
        jti: &str,
    ) -> Result<Option<AccessTokenRecord>, DomainError> {
        let user_id = user_id.into();
        debug!(user_id = %user_id, "Looking up access token by jti");
        self.repository.get_by_jti(&user_id, jti).await
    }

    /// Lists every record owned by the user, revoked ones included
    pub async fn get_by_user(
        &self,
        user_id: impl Into<Identity>,
    ) -> Result<Vec<AccessTokenRecord>, DomainError> {
        let user_id = user_id.into();
        debug!(user_id = %user_id, "Listing access tokens");
        self.repository.get_by_user(&user_id).await
    }

    /// Marks the token as revoked.
    ///
    /// Idempotent. Ownership is left to the store, which ignores ids that are
    /// missing or belong to someone else.
    pub async fn revoke_access_token(
        &self,
        user_id: impl Into<Identity>,
        token_id: Uuid,
    ) -> Result<(), DomainError> {
        let user_id = user_id.into();
        self.repository.revoke(&user_id, token_id).await?;
        debug!(user_id = %user_id, token_id = %token_id, "Revoke requested");
        Ok(())
    }

    /// Permanently removes the token, with the same ownership policy as revoke
    pub async fn delete_access_token(
        &self,
        user_id: impl Into<Identity>,
        token_id: Uuid,
    ) -> Result<(), DomainError> {
        let user_id = user_id.into();
        self.repository.delete(&user_id, token_id).await?;
        debug!(user_id = %user_id, token_id = %token_id, "Delete requested");
        Ok(())
    }

    fn verify_supplied(
        &self,
        token: &str,
        user_id: &Identity,
        expected: TokenKind,
    ) -> Result<TokenPayload, DomainError> {
        let payload = self.signer.decode(token)?;
        if payload.kind != expected {
            return Err(TokenError::UnexpectedKind {
                expected,
                found: payload.kind,
            }
            .into());
        }
        if &payload.identity != user_id {
            return Err(TokenError::IdentityMismatch.into());
        }
        Ok(payload)
    }
}
