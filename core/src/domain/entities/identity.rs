//! Normalized identity of a token owner.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Canonical string form of a user identity.
///
/// Every identity crossing the service boundary is converted to this type
/// first, so UUIDs and plain strings end up signed the same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&String> for Identity {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

impl From<&Identity> for Identity {
    fn from(value: &Identity) -> Self {
        value.clone()
    }
}

impl From<Uuid> for Identity {
    fn from(value: Uuid) -> Self {
        Self(value.hyphenated().to_string())
    }
}

impl From<&Uuid> for Identity {
    fn from(value: &Uuid) -> Self {
        Self::from(*value)
    }
}
