// ABOUTME: Access gating middleware for request authentication
// ABOUTME: Admits public paths and requires a valid bearer token for everything else
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Access Gate
//!
//! Every inbound request is classified as public or protected against a
//! fixed allow-list of exact request paths. Protected requests run bearer
//! extraction and token validation before the wrapped handler; failures
//! short-circuit with the matching status class (extraction failures are
//! client-input errors, validation failures are authorization errors). For
//! public paths the gate is a pass-through.
//!
//! The allow-list is keyed by full request path, fixed at construction
//! time, and never mutated afterward.

use crate::auth::{extract_bearer, Claims, TokenValidator};
use crate::errors::{AuthError, AuthResult};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::header::AUTHORIZATION;
use std::collections::HashSet;
use std::sync::Arc;

/// Per-request admission control over a fixed public-path allow-list
pub struct AccessGate {
    public_paths: HashSet<String>,
    token_validator: Arc<TokenValidator>,
}

impl AccessGate {
    /// Create a new gate. The allow-list is read-only from here on.
    #[must_use]
    pub fn new(
        public_paths: impl IntoIterator<Item = String>,
        token_validator: Arc<TokenValidator>,
    ) -> Self {
        Self {
            public_paths: public_paths.into_iter().collect(),
            token_validator,
        }
    }

    /// Whether the path bypasses credential checking (exact match only)
    #[must_use]
    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths.contains(path)
    }

    /// Authorize a request
    ///
    /// Returns `Ok(None)` for a public path and `Ok(Some(claims))` for a
    /// protected path carrying a valid bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::BearerExtraction`] for a missing or malformed
    /// `Authorization` header, or a token-validation error for a rejected
    /// credential.
    pub fn authorize(
        &self,
        path: &str,
        headers: &http::HeaderMap,
    ) -> AuthResult<Option<Claims>> {
        if self.is_public(path) {
            return Ok(None);
        }

        let header_value = headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::BearerExtraction)?;

        let token = extract_bearer(header_value)?;
        let claims = self.token_validator.validate_token(token)?;

        Ok(Some(claims))
    }
}

/// Axum middleware wrapping [`AccessGate`]
///
/// Valid claims are attached to the request as an extension so protected
/// handlers can read the authenticated identity.
pub async fn access_gate_middleware(
    State(gate): State<Arc<AccessGate>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    match gate.authorize(&path, request.headers()) {
        Ok(Some(claims)) => {
            tracing::debug!("request to {path} authorized for user: {}", claims.sub);
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Ok(None) => next.run(request).await,
        Err(e) => {
            tracing::warn!("request to {path} rejected: {e}");
            e.into_response()
        }
    }
}
