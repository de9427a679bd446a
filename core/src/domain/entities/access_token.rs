//! Access token record persisted for every issued token pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identity::Identity;

/// Revocation state of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStatus {
    Active,
    Revoked,
}

/// Metadata about an issued access/refresh token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenRecord {
    /// Store-assigned identifier
    pub id: Uuid,

    /// Owner of the token
    pub user_id: Identity,

    /// Label chosen by the owner, unique per user
    pub name: String,

    /// Signed access token
    pub access_token: String,

    /// Signed refresh token
    pub refresh_token: String,

    /// `jti` claim of `access_token`
    pub jti: String,

    /// Whether the token has been revoked
    pub revoked: bool,

    /// Timestamp when the record was created
    pub issued_on: DateTime<Utc>,

    /// Last time the token was presented, maintained outside the service
    pub last_used_on: Option<DateTime<Utc>>,
}

impl AccessTokenRecord {
    /// Builds the record a store persists for `token`
    pub fn issue(token: NewAccessToken, id: Uuid, issued_on: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: token.user_id,
            name: token.name,
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            jti: token.jti,
            revoked: false,
            issued_on,
            last_used_on: None,
        }
    }

    pub fn status(&self) -> TokenStatus {
        if self.revoked {
            TokenStatus::Revoked
        } else {
            TokenStatus::Active
        }
    }

    pub fn is_owned_by(&self, user_id: &Identity) -> bool {
        &self.user_id == user_id
    }

    /// Flips the revocation flag. Returns `false` if it was already set.
    pub fn revoke(&mut self) -> bool {
        !std::mem::replace(&mut self.revoked, true)
    }
}

/// Input of a store `create` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccessToken {
    pub name: String,
    pub user_id: Identity,
    pub access_token: String,
    pub refresh_token: String,
    pub jti: String,
}
