// ABOUTME: Unified error handling for the panel identity service
// ABOUTME: Defines the auth error taxonomy, HTTP status mapping, and JSON error responses
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Unified Error Handling System
//!
//! This module defines the error taxonomy for the identity core. Login
//! failures are deliberately coarse: an unknown username and a wrong
//! password produce the same [`AuthError::InvalidCredentials`] value so that
//! account existence cannot be probed through error content. Token
//! validation failures stay distinguishable internally (parse, signature,
//! claims, expiry) but are presented uniformly to external callers.

use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes reported in HTTP error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Authorization header missing or not a bearer credential
    #[serde(rename = "AUTH_HEADER_INVALID")]
    AuthHeaderInvalid,
    /// Credentials rejected (unknown user or wrong password, collapsed)
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid,
    /// Bearer token rejected (any validation failure class)
    #[serde(rename = "UNAUTHORIZED")]
    Unauthorized,
    /// Request input failed validation
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// Server-side configuration problem
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    /// Internal failure (database, signing, role persistence)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            // 400 Bad Request
            Self::AuthHeaderInvalid | Self::InvalidInput => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            Self::AuthInvalid | Self::Unauthorized => StatusCode::UNAUTHORIZED,

            // 500 Internal Server Error
            Self::ConfigError | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Unified error type for the identity core
///
/// The token-validation variants (`TokenParse`, `TokenSignature`,
/// `TokenClaims`, `TokenExpired`) carry their specific cause for logs and
/// callers inside the crate, but all four map to the same external
/// `UNAUTHORIZED` response.
#[derive(Debug, Error)]
pub enum AuthError {
    /// `Authorization` header missing, or not of the form `Bearer <token>`
    #[error("invalid authorization header")]
    BearerExtraction,

    /// Unknown username OR wrong password. One value for both, by contract.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Authority lookup failed after the identity was confirmed
    #[error("failed to load authorities: {0}")]
    AuthorityLookup(#[source] anyhow::Error),

    /// Token signing failed; reported generically to the caller
    #[error("error generating token")]
    TokenGeneration(#[source] anyhow::Error),

    /// Token string is not structurally a JWT
    #[error("token is malformed: {details}")]
    TokenParse {
        /// Details about the malformation
        details: String,
    },

    /// Token signature did not verify against the current public key
    #[error("token signature is invalid: {reason}")]
    TokenSignature {
        /// Reason for invalidity
        reason: String,
    },

    /// Signature verified but the claims payload could not be deserialized
    #[error("token claims are invalid: {details}")]
    TokenClaims {
        /// Details about the claims failure
        details: String,
    },

    /// Token expiry timestamp has passed
    #[error("token expired at {expired_at}")]
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
        /// Current time for reference
        current_time: DateTime<Utc>,
    },

    /// Identity record could not be persisted during signup
    #[error("failed to persist identity: {0}")]
    IdentityPersist(#[source] anyhow::Error),

    /// Default role lookup failed during signup
    #[error("failed to look up default role: {0}")]
    DefaultRoleLookup(#[source] anyhow::Error),

    /// Role association failed after the identity write succeeded. The
    /// identity exists with zero granted roles; it is not rolled back.
    #[error("failed to associate default role: {0}")]
    RoleAssociation(#[source] anyhow::Error),

    /// Request input failed validation
    #[error("{0}")]
    Validation(String),

    /// Server-side configuration problem (bad cost factor, bad algorithm id)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal failure not covered by a more specific class
    #[error("internal error: {0}")]
    Internal(#[source] anyhow::Error),
}

impl AuthError {
    /// Error code reported in the HTTP body
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::BearerExtraction => ErrorCode::AuthHeaderInvalid,
            Self::InvalidCredentials => ErrorCode::AuthInvalid,
            Self::TokenParse { .. }
            | Self::TokenSignature { .. }
            | Self::TokenClaims { .. }
            | Self::TokenExpired { .. } => ErrorCode::Unauthorized,
            Self::Validation(_) => ErrorCode::InvalidInput,
            Self::Configuration(_) => ErrorCode::ConfigError,
            Self::AuthorityLookup(_)
            | Self::TokenGeneration(_)
            | Self::IdentityPersist(_)
            | Self::DefaultRoleLookup(_)
            | Self::RoleAssociation(_)
            | Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        self.code().http_status()
    }

    /// Message presented to external callers
    ///
    /// Token validation failures collapse to a single message so the response
    /// body leaks nothing about why a credential was rejected. The specific
    /// class stays available through [`Self::code`] pattern matching and logs.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::TokenParse { .. }
            | Self::TokenSignature { .. }
            | Self::TokenClaims { .. }
            | Self::TokenExpired { .. } => "unauthorized".into(),
            Self::AuthorityLookup(_)
            | Self::IdentityPersist(_)
            | Self::DefaultRoleLookup(_)
            | Self::RoleAssociation(_)
            | Self::Internal(_) => "internal server error".into(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type AuthResult<T> = Result<T, AuthError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Error payload details
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Stable machine-readable error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
}

impl From<&AuthError> for ErrorResponse {
    fn from(error: &AuthError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code(),
                message: error.client_message(),
            },
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::from(&self);
        (self.http_status(), Json(body)).into_response()
    }
}
