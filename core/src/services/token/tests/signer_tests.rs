//! Unit tests for the token signer

use std::collections::HashSet;
use std::sync::Arc;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use tk_shared::config::JwtConfig;

use crate::domain::entities::{ClaimValue, Identity, TokenKind, UserClaims};
use crate::errors::{DomainError, TokenError};
use crate::services::token::{ClaimsEncoder, TokenSigner};

const SECRET: &str = "signer-test-secret";

fn signer() -> TokenSigner {
    TokenSigner::from_jwt_config(&JwtConfig::new(SECRET)).unwrap()
}

fn user_claims() -> UserClaims {
    let mut claims = UserClaims::new();
    claims.insert("role".to_string(), ClaimValue::from("admin"));
    claims.insert(
        "org".to_string(),
        ClaimValue::from(Uuid::parse_str("2f1b7c8e-4a55-4d36-9d0c-0a5e1c9b7f21").unwrap()),
    );
    claims
}

/// Decodes with the JWT library directly, independent of `TokenSigner::decode`
fn raw_claims(token: &str, algorithm: Algorithm) -> Map<String, Value> {
    let mut validation = Validation::new(algorithm);
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    decode::<Map<String, Value>>(token, &DecodingKey::from_secret(SECRET.as_bytes()), &validation)
        .unwrap()
        .claims
}

#[test]
fn test_access_token_claim_set() {
    let signer = signer();
    let signed = signer
        .sign(&Identity::from("u1"), TokenKind::Access, &user_claims())
        .unwrap();

    let claims = raw_claims(&signed.token, Algorithm::HS256);

    assert_eq!(claims["identity"], "u1");
    assert_eq!(claims["type"], "access");
    assert_eq!(claims["fresh"], false);
    assert_eq!(claims["jti"], signed.jti.as_str());
    assert_eq!(claims["iat"], signed.issued_at);
    assert_eq!(claims["nbf"], signed.issued_at);
    assert_eq!(claims["exp"], signed.expires_at);
    assert_eq!(signed.expires_at - signed.issued_at, 900);
    assert_eq!(
        claims["user_claims"],
        json!({ "org": "2f1b7c8e-4a55-4d36-9d0c-0a5e1c9b7f21", "role": "admin" })
    );
}

#[test]
fn test_round_trip_through_decode() {
    let signer = signer();
    let identity = Identity::from(Uuid::parse_str("5b3c6a9e-2f0d-4c1b-8e7a-91d2c3b4a5f6").unwrap());
    let signed = signer.sign_access_token(&identity, &user_claims()).unwrap();

    let payload = signer.decode(&signed.token).unwrap();

    assert_eq!(payload.identity.as_str(), "5b3c6a9e-2f0d-4c1b-8e7a-91d2c3b4a5f6");
    assert_eq!(payload.kind, TokenKind::Access);
    assert_eq!(payload.jti, signed.jti);
    assert_eq!(payload.issued_at, signed.issued_at);
    assert_eq!(payload.not_before, Some(signed.issued_at));
    assert_eq!(payload.fresh, Some(false));
    assert_eq!(payload.lifetime_seconds(), 900);

    let embedded = payload.user_claims.unwrap();
    assert_eq!(embedded["role"], "admin");
    assert_eq!(embedded.len(), 2);
}

#[test]
fn test_refresh_token_omits_user_claims_by_default() {
    let signer = signer();
    let signed = signer
        .sign_refresh_token(&Identity::from("u1"), &user_claims())
        .unwrap();

    let claims = raw_claims(&signed.token, Algorithm::HS256);
    assert_eq!(claims["type"], "refresh");
    assert!(!claims.contains_key("user_claims"));
    assert!(!claims.contains_key("fresh"));
    assert_eq!(signed.expires_at - signed.issued_at, 2_592_000);
}

#[test]
fn test_refresh_token_carries_user_claims_when_enabled() {
    let config = JwtConfig::new(SECRET).with_user_claims_in_refresh_token(true);
    let signer = TokenSigner::from_jwt_config(&config).unwrap();

    let signed = signer
        .sign_refresh_token(&Identity::from("u1"), &user_claims())
        .unwrap();

    let payload = signer.decode(&signed.token).unwrap();
    assert_eq!(payload.kind, TokenKind::Refresh);
    assert_eq!(payload.user_claims.unwrap()["role"], "admin");
}

#[test]
fn test_empty_user_claims_are_omitted() {
    let signer = signer();
    let signed = signer
        .sign_access_token(&Identity::from("u1"), &UserClaims::new())
        .unwrap();

    let claims = raw_claims(&signed.token, Algorithm::HS256);
    assert!(!claims.contains_key("user_claims"));
}

#[test]
fn test_custom_claim_keys_and_algorithm() {
    let mut config = JwtConfig::new(SECRET).with_algorithm("HS384");
    config.identity_claim_key = "sub".to_string();
    config.user_claims_key = "ctx".to_string();
    let signer = TokenSigner::from_jwt_config(&config).unwrap();

    let signed = signer
        .sign_access_token(&Identity::from("u9"), &user_claims())
        .unwrap();

    let claims = raw_claims(&signed.token, Algorithm::HS384);
    assert_eq!(claims["sub"], "u9");
    assert_eq!(claims["ctx"]["role"], "admin");
    assert!(!claims.contains_key("identity"));
}

#[test]
fn test_identical_inputs_get_distinct_jti() {
    let signer = signer();
    let identity = Identity::from("u1");

    let jtis: HashSet<String> = (0..50)
        .map(|_| signer.sign_access_token(&identity, &UserClaims::new()).unwrap().jti)
        .collect();

    assert_eq!(jtis.len(), 50);
}

#[test]
fn test_empty_identity_is_rejected() {
    let signer = signer();

    for identity in ["", "   "] {
        let result = signer.sign_access_token(&Identity::from(identity), &UserClaims::new());
        assert!(matches!(
            result,
            Err(DomainError::Token(TokenError::EmptyIdentity))
        ));
    }
}

#[test]
fn test_invalid_configuration_fails_construction() {
    assert!(matches!(
        TokenSigner::from_jwt_config(&JwtConfig::new("")),
        Err(DomainError::Configuration { .. })
    ));
    assert!(matches!(
        TokenSigner::from_jwt_config(&JwtConfig::new(SECRET).with_algorithm("RS256")),
        Err(DomainError::Configuration { .. })
    ));
}

#[test]
fn test_decode_rejects_foreign_signature() {
    let other = TokenSigner::from_jwt_config(&JwtConfig::new("another-secret")).unwrap();
    let token = other
        .sign_access_token(&Identity::from("u1"), &UserClaims::new())
        .unwrap()
        .token;

    let result = signer().decode(&token);
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidSignature))
    ));
}

#[test]
fn test_decode_rejects_garbage_and_other_algorithms() {
    let signer = signer();
    assert!(matches!(
        signer.decode("not-a-token"),
        Err(DomainError::Token(TokenError::InvalidTokenFormat))
    ));

    let hs512 =
        TokenSigner::from_jwt_config(&JwtConfig::new(SECRET).with_algorithm("HS512")).unwrap();
    let token = hs512
        .sign_access_token(&Identity::from("u1"), &UserClaims::new())
        .unwrap()
        .token;
    assert!(matches!(
        signer.decode(&token),
        Err(DomainError::Token(TokenError::InvalidTokenFormat))
    ));
}

#[test]
fn test_decode_ignores_expiry() {
    let config = JwtConfig::new(SECRET).with_access_token_expires(1);
    let signer = TokenSigner::from_jwt_config(&config).unwrap();
    let signed = signer
        .sign_access_token(&Identity::from("u1"), &UserClaims::new())
        .unwrap();

    let payload = signer.decode(&signed.token).unwrap();
    let later = chrono::Utc::now() + chrono::Duration::seconds(5);
    assert!(payload.is_expired_at(later));
}

struct FailingEncoder;

impl ClaimsEncoder for FailingEncoder {
    fn encode(&self, _claims: &UserClaims) -> Result<Map<String, Value>, TokenError> {
        Err(TokenError::ClaimsEncoding {
            message: "unsupported".to_string(),
        })
    }
}

#[test]
fn test_injected_encoder_is_used() {
    let signer = signer().with_claims_encoder(Arc::new(FailingEncoder));

    let result = signer.sign_access_token(&Identity::from("u1"), &user_claims());
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::ClaimsEncoding { .. }))
    ));

    // Encoder is not consulted when there is nothing to encode
    assert!(signer
        .sign_access_token(&Identity::from("u1"), &UserClaims::new())
        .is_ok());
}
