//! Injectable sources and encoders for custom user claims

use serde_json::{Map, Number, Value};

use crate::domain::entities::{ClaimValue, Identity, UserClaims};
use crate::errors::{DomainError, TokenError};

/// Supplies the custom claims embedded in a user's tokens
pub trait UserClaimsProvider: Send + Sync {
    fn user_claims(&self, identity: &Identity) -> Result<UserClaims, DomainError>;
}

/// Provider that adds no custom claims
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUserClaims;

impl UserClaimsProvider for NoUserClaims {
    fn user_claims(&self, _identity: &Identity) -> Result<UserClaims, DomainError> {
        Ok(UserClaims::new())
    }
}

/// Provider returning the same claims for everyone
#[derive(Debug, Clone, Default)]
pub struct StaticUserClaims(pub UserClaims);

impl UserClaimsProvider for StaticUserClaims {
    fn user_claims(&self, _identity: &Identity) -> Result<UserClaims, DomainError> {
        Ok(self.0.clone())
    }
}

/// Turns typed custom claims into the JSON object placed in the token
pub trait ClaimsEncoder: Send + Sync {
    fn encode(&self, claims: &UserClaims) -> Result<Map<String, Value>, TokenError>;
}

/// Default encoder.
///
/// UUIDs become lowercase hyphenated strings, timestamps RFC 3339 strings
/// with second precision. Non-finite floats are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonClaimsEncoder;

impl JsonClaimsEncoder {
    fn encode_value(&self, value: &ClaimValue) -> Result<Value, TokenError> {
        Ok(match value {
            ClaimValue::Null => Value::Null,
            ClaimValue::Bool(b) => Value::Bool(*b),
            ClaimValue::Int(i) => Value::Number((*i).into()),
            ClaimValue::Float(f) => Number::from_f64(*f).map(Value::Number).ok_or_else(|| {
                TokenError::ClaimsEncoding {
                    message: format!("{} is not a finite number", f),
                }
            })?,
            ClaimValue::String(s) => Value::String(s.clone()),
            ClaimValue::Uuid(u) => Value::String(u.hyphenated().to_string()),
            ClaimValue::Timestamp(t) => {
                Value::String(t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
            }
            ClaimValue::List(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.encode_value(item))
                    .collect::<Result<_, _>>()?,
            ),
            ClaimValue::Map(entries) => Value::Object(self.encode(entries)?),
        })
    }
}

impl ClaimsEncoder for JsonClaimsEncoder {
    fn encode(&self, claims: &UserClaims) -> Result<Map<String, Value>, TokenError> {
        claims
            .iter()
            .map(|(key, value)| Ok((key.clone(), self.encode_value(value)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn test_encodes_identifier_and_time_deterministically() {
        let id = Uuid::parse_str("6F9619FF-8B86-D011-B42D-00C04FC964FF").unwrap();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();

        let mut claims = UserClaims::new();
        claims.insert("org".to_string(), ClaimValue::from(id));
        claims.insert("since".to_string(), ClaimValue::from(at));
        claims.insert("roles".to_string(), ClaimValue::from(vec!["admin", "ops"]));

        let encoded = JsonClaimsEncoder.encode(&claims).unwrap();

        assert_eq!(encoded["org"], "6f9619ff-8b86-d011-b42d-00c04fc964ff");
        assert_eq!(encoded["since"], "2024-05-01T12:30:00Z");
        assert_eq!(encoded["roles"], serde_json::json!(["admin", "ops"]));
    }

    #[test]
    fn test_nested_maps() {
        let mut inner = UserClaims::new();
        inner.insert("tier".to_string(), ClaimValue::from("gold"));
        inner.insert("seats".to_string(), ClaimValue::from(5_i64));

        let mut claims = UserClaims::new();
        claims.insert("plan".to_string(), ClaimValue::Map(inner));

        let encoded = JsonClaimsEncoder.encode(&claims).unwrap();
        assert_eq!(encoded["plan"], serde_json::json!({ "seats": 5, "tier": "gold" }));
    }

    #[test]
    fn test_non_finite_float_is_rejected() {
        let mut claims = UserClaims::new();
        claims.insert("score".to_string(), ClaimValue::Float(f64::NAN));

        let result = JsonClaimsEncoder.encode(&claims);
        assert!(matches!(result, Err(TokenError::ClaimsEncoding { .. })));
    }

    #[test]
    fn test_providers() {
        let identity = Identity::from("u1");
        assert!(NoUserClaims.user_claims(&identity).unwrap().is_empty());

        let mut claims = UserClaims::new();
        claims.insert("role".to_string(), ClaimValue::from("admin"));
        let provider = StaticUserClaims(claims.clone());
        assert_eq!(provider.user_claims(&identity).unwrap(), claims);
    }
}
