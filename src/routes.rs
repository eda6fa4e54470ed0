// ABOUTME: HTTP route logic for signup, login, and token checking
// ABOUTME: Orchestrates user lookup, password verification, authority lookup, and token signing
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! HTTP routes for identity registration and credential issuance
//!
//! Login failures are collapsed on purpose: an unknown username and a wrong
//! password yield the identical error so account existence cannot be probed.
//! Do not "improve" that granularity.

use crate::{
    auth::Claims,
    constants::roles,
    crypto,
    errors::{AuthError, AuthResult},
    models::User,
    server::ServerResources,
};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Signup request payload
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    /// Desired username (unique, case-sensitive)
    pub username: String,
    /// Plaintext password; hashed before it reaches storage
    pub password: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address
    pub email: String,
    /// National document / external reference number
    #[serde(default)]
    pub document: Option<String>,
}

/// Signup response payload
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    /// Identifier of the created user
    pub user_id: String,
    /// Username as registered
    pub username: String,
    /// Human-readable confirmation
    pub message: String,
}

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username
    pub username: String,
    /// Plaintext password
    pub password: String,
}

/// Login response payload
///
/// `refresh_token` is part of the wire shape but is never populated; refresh
/// issuance is out of scope.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed bearer token
    pub token: String,
    /// Always `null`
    pub refresh_token: Option<String>,
    /// Token expiry, RFC 3339
    pub expires_at: String,
    /// Basic identity info for the client
    pub user: UserInfo,
}

/// Identity info returned alongside a token
#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfo {
    /// Username
    pub username: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
}

/// Token check request payload
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    /// Token to validate
    pub token: String,
}

/// Token check response payload
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Whether the token is currently valid
    pub valid: bool,
    /// Claims of a valid token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<Claims>,
    /// Rejection message for an invalid token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Route logic for signup, login, and token checking
#[derive(Clone)]
pub struct AuthRoutes {
    resources: Arc<ServerResources>,
}

impl AuthRoutes {
    /// Create route logic over shared server resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Handle user login
    ///
    /// Steps run strictly in order; each narrows or enriches what the next
    /// one needs: user lookup, password verification, authority lookup,
    /// token signing.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown username, a
    /// lookup failure, a wrong password, or a disabled account; all four are
    /// indistinguishable by contract. Returns [`AuthError::AuthorityLookup`]
    /// or [`AuthError::TokenGeneration`] for failures after the identity is
    /// confirmed.
    pub async fn login(&self, request: LoginRequest) -> AuthResult<LoginResponse> {
        info!("login attempt for username: {}", request.username);

        let user = match self
            .resources
            .database
            .get_user_by_username(&request.username)
            .await
        {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("login failed: unknown username {}", request.username);
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                warn!("login failed: user lookup error: {e}");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let password_ok =
            crypto::verify_password(&request.password, &user.password_hash).unwrap_or(false);
        if !password_ok {
            warn!("login failed: wrong password for {}", request.username);
            return Err(AuthError::InvalidCredentials);
        }

        if !user.enabled {
            warn!("login failed: account disabled for {}", request.username);
            return Err(AuthError::InvalidCredentials);
        }

        // Identity confirmed; failures past this point get their own class
        let authorities = self
            .resources
            .database
            .get_user_authorities(user.id)
            .await
            .map_err(AuthError::AuthorityLookup)?;

        let token = self
            .resources
            .token_signer
            .generate_token(&user, &authorities)?;
        let expires_at = chrono::Utc::now() + self.resources.token_signer.token_lifetime();

        info!("user logged in successfully: {} ({})", user.username, user.id);

        Ok(LoginResponse {
            token,
            refresh_token: None,
            expires_at: expires_at.to_rfc3339(),
            user: UserInfo {
                username: user.username,
                first_name: user.first_name,
                last_name: user.last_name,
            },
        })
    }

    /// Handle user registration
    ///
    /// The identity write and the default-role association are two separate,
    /// non-transactional steps. If the association fails after the identity
    /// write succeeded, the identity stays in place with zero granted roles
    /// and the failure surfaces as [`AuthError::RoleAssociation`].
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for rejected input,
    /// [`AuthError::Configuration`] for an out-of-range hashing cost,
    /// [`AuthError::IdentityPersist`], [`AuthError::DefaultRoleLookup`], or
    /// [`AuthError::RoleAssociation`] for persistence failures.
    pub async fn register(&self, request: SignupRequest) -> AuthResult<SignupResponse> {
        info!("signup attempt for username: {}", request.username);

        Self::validate_signup(&request)?;

        if let Ok(Some(_)) = self
            .resources
            .database
            .get_user_by_username(&request.username)
            .await
        {
            return Err(AuthError::Validation("username already exists".into()));
        }

        let password_hash =
            crypto::hash_password(&request.password, self.resources.config.auth.bcrypt_cost)?;

        let user = User::new(
            request.username.clone(),
            request.first_name,
            request.last_name,
            request.email,
            request.document,
            password_hash,
        );

        let user_id = self
            .resources
            .database
            .create_user(&user)
            .await
            .map_err(AuthError::IdentityPersist)?;

        let role = self
            .resources
            .database
            .get_role_by_name(roles::DEFAULT_ROLE)
            .await
            .map_err(AuthError::DefaultRoleLookup)?
            .ok_or_else(|| {
                AuthError::DefaultRoleLookup(anyhow!(
                    "default role {} not found",
                    roles::DEFAULT_ROLE
                ))
            })?;

        if let Err(e) = self.resources.database.add_user_role(user_id, role.id).await {
            // Accepted partial-failure outcome: the identity exists with zero
            // granted roles and is not rolled back.
            warn!("user {user_id} created without roles: {e}");
            return Err(AuthError::RoleAssociation(e));
        }

        info!(
            "user registered successfully: {} ({})",
            request.username, user_id
        );

        Ok(SignupResponse {
            user_id: user_id.to_string(),
            username: request.username,
            message: "User registered successfully".into(),
        })
    }

    /// Handle a token check
    ///
    /// Reports validity rather than failing the request; an invalid token is
    /// a normal answer here, not an error response.
    #[must_use]
    pub fn check(&self, request: &CheckRequest) -> CheckResponse {
        match self.resources.token_validator.validate_token(&request.token) {
            Ok(claims) => CheckResponse {
                valid: true,
                claims: Some(claims),
                error: None,
            },
            Err(e) => CheckResponse {
                valid: false,
                claims: None,
                error: Some(e.client_message()),
            },
        }
    }

    /// Validate signup input
    fn validate_signup(request: &SignupRequest) -> AuthResult<()> {
        if request.username.trim().is_empty() {
            return Err(AuthError::Validation("username must not be empty".into()));
        }
        if !Self::is_valid_email(&request.email) {
            return Err(AuthError::Validation("invalid email format".into()));
        }
        if !Self::is_valid_password(&request.password) {
            return Err(AuthError::Validation(
                "password must be at least 8 characters".into(),
            ));
        }
        Ok(())
    }

    /// Validate email format
    #[must_use]
    pub fn is_valid_email(email: &str) -> bool {
        if email.len() <= 5 {
            return false;
        }
        let Some(at_pos) = email.find('@') else {
            return false;
        };
        if at_pos == 0 || at_pos == email.len() - 1 {
            return false;
        }
        let domain_part = &email[at_pos + 1..];
        domain_part.contains('.')
    }

    /// Validate password strength
    #[must_use]
    pub const fn is_valid_password(password: &str) -> bool {
        password.len() >= 8
    }
}
