//! Access token repository trait defining the interface for token metadata persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{AccessTokenRecord, Identity, NewAccessToken};
use crate::errors::DomainError;

/// Repository trait for AccessTokenRecord persistence operations
///
/// The store is the sole authority on uniqueness: `(user_id, name)` and `jti`
/// must each be unique among live records, and a `create` racing another
/// `create` for the same key must let exactly one of them win.
///
/// Lookups return `Ok(None)` for missing records. `revoke` and `delete` are
/// scoped to the owning user and silently do nothing when the record is
/// missing or belongs to someone else.
#[async_trait]
pub trait AccessTokenRepository: Send + Sync {
    /// Persist a new record
    ///
    /// # Returns
    /// * `Ok(AccessTokenRecord)` - The stored record with `id` and `issued_on` assigned
    /// * `Err(DomainError::Conflict)` - `(user_id, name)` or `jti` already exists
    /// * `Err(DomainError::StoreUnavailable)` - The backend could not be reached
    ///
    /// # Example
    /// ```no_run
    /// # use tk_core::domain::entities::{Identity, NewAccessToken};
    /// # use tk_core::repositories::AccessTokenRepository;
    /// # async fn example(repo: &impl AccessTokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let record = repo.create(NewAccessToken {
    ///     name: "laptop".to_string(),
    ///     user_id: Identity::from("u1"),
    ///     access_token: "eyJ...".to_string(),
    ///     refresh_token: "eyJ...".to_string(),
    ///     jti: "0b5f...".to_string(),
    /// }).await?;
    /// println!("Token stored with ID: {}", record.id);
    /// # Ok(())
    /// # }
    /// ```
    async fn create(&self, token: NewAccessToken) -> Result<AccessTokenRecord, DomainError>;

    /// Find a record by its identifier
    async fn get(&self, token_id: Uuid) -> Result<Option<AccessTokenRecord>, DomainError>;

    /// Find the record a user registered under `name`
    async fn get_by_name(
        &self,
        user_id: &Identity,
        name: &str,
    ) -> Result<Option<AccessTokenRecord>, DomainError>;

    /// Find a user's record by the `jti` embedded in its access token
    async fn get_by_jti(
        &self,
        user_id: &Identity,
        jti: &str,
    ) -> Result<Option<AccessTokenRecord>, DomainError>;

    /// All records owned by a user, revoked ones included
    async fn get_by_user(&self, user_id: &Identity) -> Result<Vec<AccessTokenRecord>, DomainError>;

    /// Mark a record revoked. Idempotent.
    async fn revoke(&self, user_id: &Identity, token_id: Uuid) -> Result<(), DomainError>;

    /// Permanently remove a record
    async fn delete(&self, user_id: &Identity, token_id: Uuid) -> Result<(), DomainError>;

    /// Record that the token identified by `jti` was presented at `used_on`
    ///
    /// Called by whatever verifies inbound tokens; the token service itself
    /// never updates `last_used_on`.
    async fn touch(&self, jti: &str, used_on: DateTime<Utc>) -> Result<(), DomainError>;
}

#[async_trait]
impl<R: AccessTokenRepository + ?Sized> AccessTokenRepository for Arc<R> {
    async fn create(&self, token: NewAccessToken) -> Result<AccessTokenRecord, DomainError> {
        (**self).create(token).await
    }

    async fn get(&self, token_id: Uuid) -> Result<Option<AccessTokenRecord>, DomainError> {
        (**self).get(token_id).await
    }

    async fn get_by_name(
        &self,
        user_id: &Identity,
        name: &str,
    ) -> Result<Option<AccessTokenRecord>, DomainError> {
        (**self).get_by_name(user_id, name).await
    }

    async fn get_by_jti(
        &self,
        user_id: &Identity,
        jti: &str,
    ) -> Result<Option<AccessTokenRecord>, DomainError> {
        (**self).get_by_jti(user_id, jti).await
    }

    async fn get_by_user(&self, user_id: &Identity) -> Result<Vec<AccessTokenRecord>, DomainError> {
        (**self).get_by_user(user_id).await
    }

    async fn revoke(&self, user_id: &Identity, token_id: Uuid) -> Result<(), DomainError> {
        (**self).revoke(user_id, token_id).await
    }

    async fn delete(&self, user_id: &Identity, token_id: Uuid) -> Result<(), DomainError> {
        (**self).delete(user_id, token_id).await
    }

    async fn touch(&self, jti: &str, used_on: DateTime<Utc>) -> Result<(), DomainError> {
        (**self).touch(jti, used_on).await
    }
}
