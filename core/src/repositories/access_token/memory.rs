//! In-memory implementation of AccessTokenRepository
//!
//! Used when no database is configured and as the store in tests. Every
//! mutation happens under a single write lock, which gives create its
//! single-winner guarantee.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::entities::{AccessTokenRecord, Identity, NewAccessToken};
use crate::errors::DomainError;

use super::r#trait::AccessTokenRepository;

/// In-memory token repository
#[derive(Debug, Default)]
pub struct InMemoryAccessTokenRepository {
    tokens: RwLock<HashMap<Uuid, AccessTokenRecord>>,
}

impl InMemoryAccessTokenRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

#[async_trait]
impl AccessTokenRepository for InMemoryAccessTokenRepository {
    async fn create(&self, token: NewAccessToken) -> Result<AccessTokenRecord, DomainError> {
        let mut tokens = self.tokens.write().await;

        for existing in tokens.values() {
            if existing.user_id == token.user_id && existing.name == token.name {
                warn!(user_id = %token.user_id, name = %token.name, "Duplicate token name");
                return Err(DomainError::conflict(format!(
                    "access token '{}' already exists for user {}",
                    token.name, token.user_id
                )));
            }
            if existing.jti == token.jti {
                warn!(user_id = %token.user_id, "Duplicate token jti");
                return Err(DomainError::conflict(format!(
                    "access token with jti {} already exists",
                    token.jti
                )));
            }
        }

        let record = AccessTokenRecord::issue(token, Uuid::new_v4(), Utc::now());
        tokens.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, token_id: Uuid) -> Result<Option<AccessTokenRecord>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(&token_id).cloned())
    }

    async fn get_by_name(
        &self,
        user_id: &Identity,
        name: &str,
    ) -> Result<Option<AccessTokenRecord>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .find(|t| t.is_owned_by(user_id) && t.name == name)
            .cloned())
    }

    async fn get_by_jti(
        &self,
        user_id: &Identity,
        jti: &str,
    ) -> Result<Option<AccessTokenRecord>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .find(|t| t.is_owned_by(user_id) && t.jti == jti)
            .cloned())
    }

    async fn get_by_user(&self, user_id: &Identity) -> Result<Vec<AccessTokenRecord>, DomainError> {
        let tokens = self.tokens.read().await;
        let mut owned: Vec<AccessTokenRecord> = tokens
            .values()
            .filter(|t| t.is_owned_by(user_id))
            .cloned()
            .collect();

        // Newest first, like the SQL store
        owned.sort_by(|a, b| b.issued_on.cmp(&a.issued_on).then_with(|| a.name.cmp(&b.name)));
        Ok(owned)
    }

    async fn revoke(&self, user_id: &Identity, token_id: Uuid) -> Result<(), DomainError> {
        let mut tokens = self.tokens.write().await;

        match tokens.get_mut(&token_id) {
            Some(token) if token.is_owned_by(user_id) => {
                if !token.revoke() {
                    debug!(%token_id, "Token already revoked");
                }
            }
            _ => debug!(%token_id, %user_id, "Revoke matched no token"),
        }

        Ok(())
    }

    async fn delete(&self, user_id: &Identity, token_id: Uuid) -> Result<(), DomainError> {
        let mut tokens = self.tokens.write().await;

        let owned = tokens
            .get(&token_id)
            .map(|t| t.is_owned_by(user_id))
            .unwrap_or(false);
        if owned {
            tokens.remove(&token_id);
        } else {
            debug!(%token_id, %user_id, "Delete matched no token");
        }

        Ok(())
    }

    async fn touch(&self, jti: &str, used_on: DateTime<Utc>) -> Result<(), DomainError> {
        let mut tokens = self.tokens.write().await;

        if let Some(token) = tokens.values_mut().find(|t| t.jti == jti) {
            token.last_used_on = Some(used_on);
        }

        Ok(())
    }
}
