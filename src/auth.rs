// ABOUTME: JWT claims, token signing and validation, and bearer extraction
// ABOUTME: Signs claims with the RSA private half and verifies with the public half
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Token Signing and Validation
//!
//! This module builds the signed claims set for an authenticated user and
//! determines whether a presented token string is a currently-valid
//! credential. Both halves share one process-wide [`KeyMaterial`] injected at
//! construction time; neither mutates it, so signing and verification are
//! reentrant and run concurrently without coordination.

use crate::errors::{AuthError, AuthResult};
use crate::key_management::KeyMaterial;
use crate::models::User;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Literal scheme prefix for the `Authorization` header
pub const BEARER_PREFIX: &str = "Bearer ";

/// `JWT` claims for an authenticated user
///
/// Claims are immutable once built; they exist only inside a signed token.
/// The authority sequence is carried exactly as supplied at login time:
/// order preserved, duplicates preserved, possibly empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username (case-sensitive)
    pub sub: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Granted authorities, in the order the lookup returned them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authorities: Vec<String>,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Parse a signing algorithm identifier from configuration
///
/// Only the RSA family is supported; the key material is an RSA pair.
///
/// # Errors
/// Returns [`AuthError::Configuration`] for an unknown or unsupported
/// identifier.
pub fn parse_algorithm(identifier: &str) -> AuthResult<Algorithm> {
    match identifier {
        "RS256" => Ok(Algorithm::RS256),
        "RS384" => Ok(Algorithm::RS384),
        "RS512" => Ok(Algorithm::RS512),
        other => Err(AuthError::Configuration(format!(
            "unsupported signing algorithm: {other}"
        ))),
    }
}

/// Builds a claims set for a user and signs it into a compact token string
#[derive(Clone)]
pub struct TokenSigner {
    key_material: Arc<KeyMaterial>,
    algorithm: Algorithm,
    token_lifetime: Duration,
}

impl TokenSigner {
    /// Create a new token signer
    ///
    /// The lifetime is a configuration constant; every issued token expires
    /// exactly that long after its issue timestamp.
    #[must_use]
    pub fn new(
        key_material: Arc<KeyMaterial>,
        algorithm: Algorithm,
        token_expiry_minutes: i64,
    ) -> Self {
        Self {
            key_material,
            algorithm,
            token_lifetime: Duration::minutes(token_expiry_minutes),
        }
    }

    /// Configured token lifetime
    #[must_use]
    pub const fn token_lifetime(&self) -> Duration {
        self.token_lifetime
    }

    /// Generate a signed token for a user with the given authorities
    ///
    /// Tokens are either fully built or not returned at all; there is no
    /// partial artifact on failure.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::TokenGeneration`] if JWT encoding fails. The
    /// underlying cause is preserved for diagnostics but reported
    /// generically to callers.
    pub fn generate_token(&self, user: &User, authorities: &[String]) -> AuthResult<String> {
        let now = Utc::now();
        let expiry = now + self.token_lifetime;

        let claims = Claims {
            sub: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            authorities: authorities.to_vec(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        let header = Header::new(self.algorithm);

        encode(&header, &claims, self.key_material.encoding_key()).map_err(|e| {
            tracing::error!("JWT signing failed for user {}: {e}", user.username);
            AuthError::TokenGeneration(e.into())
        })
    }
}

/// Determines whether a token string is a currently-valid credential
#[derive(Clone)]
pub struct TokenValidator {
    key_material: Arc<KeyMaterial>,
    algorithm: Algorithm,
}

impl TokenValidator {
    /// Create a new token validator
    #[must_use]
    pub const fn new(key_material: Arc<KeyMaterial>, algorithm: Algorithm) -> Self {
        Self {
            key_material,
            algorithm,
        }
    }

    /// Validate a token string and return its claims
    ///
    /// Terminal state machine, no intermediate persisted state:
    /// 1. structural parse of the token string
    /// 2. signature verification against the public half
    /// 3. claims extraction from the verified payload
    /// 4. expiry comparison against the current time
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::TokenParse`], [`AuthError::TokenSignature`],
    /// [`AuthError::TokenClaims`], or [`AuthError::TokenExpired`] depending
    /// on which step rejected the token.
    pub fn validate_token(&self, token: &str) -> AuthResult<Claims> {
        let claims = self.decode_token_claims(token)?;
        Self::check_expiry(&claims)?;

        tracing::debug!("token validation successful for user: {}", claims.sub);
        Ok(claims)
    }

    /// Decode and verify a token without enforcing expiry
    fn decode_token_claims(&self, token: &str) -> AuthResult<Claims> {
        jsonwebtoken::decode_header(token).map_err(|e| AuthError::TokenParse {
            details: format!("failed to decode token header: {e}"),
        })?;

        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;

        decode::<Claims>(token, self.key_material.decoding_key(), &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| Self::convert_jwt_error(&e))
    }

    /// Convert JWT library errors to the taxonomy's validation classes
    fn convert_jwt_error(e: &jsonwebtoken::errors::Error) -> AuthError {
        use jsonwebtoken::errors::ErrorKind;
        tracing::warn!("JWT token validation failed: {e:?}");

        match e.kind() {
            ErrorKind::InvalidSignature => AuthError::TokenSignature {
                reason: "token signature verification failed".into(),
            },
            ErrorKind::InvalidAlgorithm => AuthError::TokenSignature {
                reason: "token signed with an unexpected algorithm".into(),
            },
            ErrorKind::InvalidToken => AuthError::TokenParse {
                details: "token format is invalid".into(),
            },
            ErrorKind::Base64(base64_err) => AuthError::TokenParse {
                details: format!("token contains invalid base64: {base64_err}"),
            },
            ErrorKind::Utf8(utf8_err) => AuthError::TokenParse {
                details: format!("token contains invalid UTF-8: {utf8_err}"),
            },
            ErrorKind::Json(json_err) => AuthError::TokenClaims {
                details: format!("claims payload is invalid: {json_err}"),
            },
            ErrorKind::MissingRequiredClaim(claim) => AuthError::TokenClaims {
                details: format!("claims payload missing required claim: {claim}"),
            },
            _ => AuthError::TokenSignature {
                reason: format!("token validation failed: {e}"),
            },
        }
    }

    /// Reject claims whose expiry has passed
    fn check_expiry(claims: &Claims) -> AuthResult<()> {
        let current_time = Utc::now();
        if current_time.timestamp() >= claims.exp {
            let expired_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or(current_time);
            tracing::warn!(
                "token expired for user {} at {}",
                claims.sub,
                expired_at.to_rfc3339()
            );
            return Err(AuthError::TokenExpired {
                expired_at,
                current_time,
            });
        }
        Ok(())
    }
}

/// Pull the raw token out of an `Authorization` header value
///
/// The header value must be strictly longer than the literal prefix
/// `"Bearer "`. No trimming, case-insensitivity, or alternate schemes: the
/// narrow contract is deliberate.
///
/// # Errors
///
/// Returns [`AuthError::BearerExtraction`] for anything that is not
/// `Bearer ` followed by at least one character.
pub fn extract_bearer(header_value: &str) -> AuthResult<&str> {
    match header_value.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::BearerExtraction),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_returns_token_verbatim() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_extract_bearer_rejects_short_values() {
        for value in ["", "Bearer", "Bearer "] {
            assert!(matches!(
                extract_bearer(value),
                Err(AuthError::BearerExtraction)
            ));
        }
    }

    #[test]
    fn test_extract_bearer_rejects_other_schemes() {
        assert!(matches!(
            extract_bearer("Basic dXNlcjpwYXNz"),
            Err(AuthError::BearerExtraction)
        ));
        // Case-sensitive by contract
        assert!(matches!(
            extract_bearer("bearer abc"),
            Err(AuthError::BearerExtraction)
        ));
    }

    #[test]
    fn test_parse_algorithm() {
        assert!(matches!(parse_algorithm("RS512"), Ok(Algorithm::RS512)));
        assert!(matches!(
            parse_algorithm("bogus"),
            Err(AuthError::Configuration(_))
        ));
    }
}
