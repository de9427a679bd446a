//! Unit tests for claim types

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::{ClaimValue, Identity, TokenKind, TokenPayload};

#[test]
fn test_token_kind_round_trips_through_str() {
    assert_eq!("access".parse::<TokenKind>().unwrap(), TokenKind::Access);
    assert_eq!("refresh".parse::<TokenKind>().unwrap(), TokenKind::Refresh);
    assert!("id".parse::<TokenKind>().is_err());
    assert_eq!(TokenKind::Refresh.to_string(), "refresh");
}

#[test]
fn test_claim_value_conversions() {
    let id = Uuid::new_v4();

    assert_eq!(ClaimValue::from("admin"), ClaimValue::String("admin".to_string()));
    assert_eq!(ClaimValue::from(42_i64), ClaimValue::Int(42));
    assert_eq!(ClaimValue::from(id), ClaimValue::Uuid(id));
    assert_eq!(ClaimValue::from(None::<bool>), ClaimValue::Null);
    assert_eq!(
        ClaimValue::from(vec!["read", "write"]),
        ClaimValue::List(vec![ClaimValue::from("read"), ClaimValue::from("write")])
    );
}

#[test]
fn test_payload_expiry() {
    let now = Utc::now();
    let payload = TokenPayload {
        identity: Identity::from("u1"),
        kind: TokenKind::Access,
        jti: Uuid::new_v4().to_string(),
        issued_at: now.timestamp(),
        not_before: Some(now.timestamp()),
        expires_at: (now + Duration::seconds(900)).timestamp(),
        fresh: Some(false),
        user_claims: None,
    };

    assert_eq!(payload.lifetime_seconds(), 900);
    assert!(!payload.is_expired_at(now));
    assert!(payload.is_expired_at(now + Duration::seconds(900)));
}
