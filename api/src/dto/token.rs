use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use tk_core::domain::entities::AccessTokenRecord;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTokenRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Pre-signed access token to store instead of minting one
    #[serde(default)]
    pub access_token: Option<String>,
    /// Pre-signed refresh token to store instead of minting one
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub access_token: String,
    pub refresh_token: String,
    pub jti: String,
    pub revoked: bool,
    pub issued_on: DateTime<Utc>,
    pub last_used_on: Option<DateTime<Utc>>,
}

impl From<AccessTokenRecord> for AccessTokenResponse {
    fn from(record: AccessTokenRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id.into_inner(),
            name: record.name,
            access_token: record.access_token,
            refresh_token: record.refresh_token,
            jti: record.jti,
            revoked: record.revoked,
            issued_on: record.issued_on,
            last_used_on: record.last_used_on,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenListResponse {
    pub tokens: Vec<AccessTokenResponse>,
}

impl From<Vec<AccessTokenRecord>> for TokenListResponse {
    fn from(records: Vec<AccessTokenRecord>) -> Self {
        Self {
            tokens: records.into_iter().map(Into::into).collect(),
        }
    }
}
