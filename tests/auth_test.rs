// ABOUTME: Unit tests for token signing and validation
// ABOUTME: Validates round trips, expiry enforcement, and cross-key rejection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, Header};
use panel_identity_service::{
    auth::{Claims, TokenSigner, TokenValidator},
    errors::AuthError,
    models::User,
};

fn create_test_user() -> User {
    User::new(
        "jdoe".into(),
        "Jane".into(),
        "Doe".into(),
        "jdoe@example.com".into(),
        Some("42-1337".into()),
        "hashed_password_123".into(),
    )
}

fn create_signer() -> TokenSigner {
    TokenSigner::new(common::get_shared_key_material(), Algorithm::RS512, 60)
}

fn create_validator() -> TokenValidator {
    TokenValidator::new(common::get_shared_key_material(), Algorithm::RS512)
}

#[test]
fn test_generate_and_validate_token() {
    let signer = create_signer();
    let validator = create_validator();
    let user = create_test_user();

    let token = signer
        .generate_token(&user, &["PANEL_READ".to_owned()])
        .unwrap();
    assert!(!token.is_empty());

    let claims = validator.validate_token(&token).unwrap();
    assert_eq!(claims.sub, "jdoe");
    assert_eq!(claims.first_name, "Jane");
    assert_eq!(claims.last_name, "Doe");
    assert_eq!(claims.authorities, vec!["PANEL_READ"]);
    assert!(claims.exp > Utc::now().timestamp());
}

#[test]
fn test_expiry_is_issue_time_plus_lifetime() {
    let signer = create_signer();
    let validator = create_validator();
    let user = create_test_user();

    let token = signer.generate_token(&user, &[]).unwrap();
    let claims = validator.validate_token(&token).unwrap();

    assert_eq!(claims.exp - claims.iat, 60 * 60);
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_authority_order_and_duplicates_preserved() {
    let signer = create_signer();
    let validator = create_validator();
    let user = create_test_user();

    let authorities = vec![
        "PANEL_EDIT".to_owned(),
        "PANEL_READ".to_owned(),
        "PANEL_READ".to_owned(),
    ];

    let token = signer.generate_token(&user, &authorities).unwrap();
    let claims = validator.validate_token(&token).unwrap();

    assert_eq!(claims.authorities, authorities);
}

#[test]
fn test_empty_authorities_round_trip() {
    let signer = create_signer();
    let validator = create_validator();
    let user = create_test_user();

    let token = signer.generate_token(&user, &[]).unwrap();
    let claims = validator.validate_token(&token).unwrap();

    assert!(claims.authorities.is_empty());
}

#[test]
fn test_expired_token_rejected() {
    let validator = create_validator();
    let now = Utc::now().timestamp();

    // Issued beyond one lifetime ago, expired five minutes ago
    let claims = Claims {
        sub: "jdoe".into(),
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        authorities: vec![],
        iat: now - 3900,
        exp: now - 300,
    };
    let token = encode(
        &Header::new(Algorithm::RS512),
        &claims,
        common::get_shared_key_material().encoding_key(),
    )
    .unwrap();

    let err = validator.validate_token(&token).unwrap_err();
    assert!(matches!(err, AuthError::TokenExpired { .. }));
}

#[test]
fn test_token_exactly_at_expiry_rejected() {
    let validator = create_validator();
    let now = Utc::now().timestamp();

    let claims = Claims {
        sub: "jdoe".into(),
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        authorities: vec![],
        iat: now - 3600,
        exp: now,
    };
    let token = encode(
        &Header::new(Algorithm::RS512),
        &claims,
        common::get_shared_key_material().encoding_key(),
    )
    .unwrap();

    let err = validator.validate_token(&token).unwrap_err();
    assert!(matches!(err, AuthError::TokenExpired { .. }));
}

#[test]
fn test_token_from_other_key_pair_rejected() {
    let validator = create_validator();
    let other_signer = TokenSigner::new(common::get_other_key_material(), Algorithm::RS512, 60);
    let user = create_test_user();

    let token = other_signer
        .generate_token(&user, &["PANEL_READ".to_owned()])
        .unwrap();

    let err = validator.validate_token(&token).unwrap_err();
    assert!(matches!(err, AuthError::TokenSignature { .. }));
}

#[test]
fn test_malformed_token_rejected_as_parse_error() {
    let validator = create_validator();

    for garbage in ["", "garbage", "a.b", "invalid.jwt.token"] {
        let err = validator.validate_token(garbage).unwrap_err();
        assert!(
            matches!(err, AuthError::TokenParse { .. }),
            "expected parse error for {garbage:?}, got {err:?}"
        );
    }
}

#[test]
fn test_expired_and_invalid_tokens_present_the_same_external_message() {
    let validator = create_validator();
    let now = Utc::now().timestamp();

    let claims = Claims {
        sub: "jdoe".into(),
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        authorities: vec![],
        iat: now - 3900,
        exp: now - 300,
    };
    let expired_token = encode(
        &Header::new(Algorithm::RS512),
        &claims,
        common::get_shared_key_material().encoding_key(),
    )
    .unwrap();

    let expired = validator.validate_token(&expired_token).unwrap_err();
    let malformed = validator.validate_token("garbage").unwrap_err();

    assert_eq!(expired.client_message(), malformed.client_message());
    assert_eq!(expired.http_status(), malformed.http_status());
}
