// ABOUTME: Password hashing and verification with bcrypt
// ABOUTME: Enforces the allowed work-factor range and keeps mismatch a non-exceptional outcome
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Salted password hashing with a configurable work factor
//!
//! Comparison cost is deliberately slow; login latency is dominated by this
//! step. A wrong password is a normal outcome (`Ok(false)`), never an error.

use crate::errors::{AuthError, AuthResult};
use anyhow::anyhow;

/// Minimum bcrypt work factor accepted by the algorithm
pub const MIN_COST: u32 = 4;

/// Maximum bcrypt work factor accepted by the algorithm
pub const MAX_COST: u32 = 31;

/// Hash a plaintext password with the given work factor
///
/// The cost is validated up front: a value outside the algorithm's allowed
/// range is a caller-visible configuration error, not something to clamp.
///
/// # Errors
///
/// Returns [`AuthError::Configuration`] if `cost` is outside
/// `MIN_COST..=MAX_COST`, or [`AuthError::Internal`] if hashing itself fails.
pub fn hash_password(plaintext: &str, cost: u32) -> AuthResult<String> {
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        return Err(AuthError::Configuration(format!(
            "bcrypt cost {cost} outside allowed range {MIN_COST}..={MAX_COST}"
        )));
    }

    bcrypt::hash(plaintext, cost)
        .map_err(|e| AuthError::Internal(anyhow!("password hashing failed: {e}")))
}

/// Compare a plaintext password against a stored bcrypt hash
///
/// Mismatch is reported as `Ok(false)`. The comparison is constant-time with
/// respect to the hash output.
///
/// # Errors
///
/// Returns [`AuthError::Internal`] if the stored hash is malformed.
pub fn verify_password(plaintext: &str, hash: &str) -> AuthResult<bool> {
    bcrypt::verify(plaintext, hash)
        .map_err(|e| AuthError::Internal(anyhow!("password verification failed: {e}")))
}
