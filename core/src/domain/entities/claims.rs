//! Claim types carried inside signed tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use super::identity::Identity;

/// Claim names written by the signer itself
pub mod reserved {
    pub const ISSUED_AT: &str = "iat";
    pub const NOT_BEFORE: &str = "nbf";
    pub const EXPIRES_AT: &str = "exp";
    pub const TOKEN_ID: &str = "jti";
    pub const TOKEN_TYPE: &str = "type";
    pub const FRESH: &str = "fresh";

    pub const ALL: [&str; 6] = [ISSUED_AT, NOT_BEFORE, EXPIRES_AT, TOKEN_ID, TOKEN_TYPE, FRESH];
}

/// Which of the two token flavours to mint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TokenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access" => Ok(TokenKind::Access),
            "refresh" => Ok(TokenKind::Refresh),
            other => Err(format!("Unknown token type: {}", other)),
        }
    }
}

/// A custom claim value.
///
/// Typed rather than raw JSON so identifier and time values have exactly one
/// encoding, chosen by the injected `ClaimsEncoder`.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    List(Vec<ClaimValue>),
    Map(BTreeMap<String, ClaimValue>),
}

/// Custom claims embedded under the configured user-claims key
pub type UserClaims = BTreeMap<String, ClaimValue>;

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Bool(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Int(value)
    }
}

impl From<i32> for ClaimValue {
    fn from(value: i32) -> Self {
        ClaimValue::Int(value.into())
    }
}

impl From<f64> for ClaimValue {
    fn from(value: f64) -> Self {
        ClaimValue::Float(value)
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::String(value.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::String(value)
    }
}

impl From<Uuid> for ClaimValue {
    fn from(value: Uuid) -> Self {
        ClaimValue::Uuid(value)
    }
}

impl From<DateTime<Utc>> for ClaimValue {
    fn from(value: DateTime<Utc>) -> Self {
        ClaimValue::Timestamp(value)
    }
}

impl<T: Into<ClaimValue>> From<Vec<T>> for ClaimValue {
    fn from(values: Vec<T>) -> Self {
        ClaimValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ClaimValue>> From<Option<T>> for ClaimValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ClaimValue::Null)
    }
}

/// Claims read back from a signed token
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPayload {
    pub identity: Identity,
    pub kind: TokenKind,
    pub jti: String,
    pub issued_at: i64,
    pub not_before: Option<i64>,
    pub expires_at: i64,
    /// Present on access tokens only
    pub fresh: Option<bool>,
    /// Custom claims as embedded, `None` when the token carries none
    pub user_claims: Option<serde_json::Map<String, serde_json::Value>>,
}

impl TokenPayload {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expires_at
    }

    /// Token lifetime in seconds as encoded
    pub fn lifetime_seconds(&self) -> i64 {
        self.expires_at - self.issued_at
    }
}
