// ABOUTME: Router construction, shared server resources, and the serve loop
// ABOUTME: Wires routes, the access gate, and request tracing into one axum application
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! HTTP server assembly
//!
//! [`ServerResources`] bundles the process-wide collaborators: the database
//! provider, the token signer/validator pair over the one read-only key
//! pair, and the loaded configuration. Handlers receive it as axum state.

use crate::{
    auth::{parse_algorithm, Claims, TokenSigner, TokenValidator},
    config::environment::ServerConfig,
    database_plugins::DatabaseProvider,
    errors::{AuthError, AuthResult},
    key_management::KeyMaterial,
    middleware::{access_gate_middleware, AccessGate},
    routes::{
        AuthRoutes, CheckRequest, CheckResponse, LoginRequest, LoginResponse, SignupRequest,
        SignupResponse,
    },
};
use anyhow::Result;
use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Process-wide dependencies shared by every request
pub struct ServerResources {
    /// Identity and role persistence
    pub database: Arc<dyn DatabaseProvider>,
    /// Token signer over the private half of the key pair
    pub token_signer: TokenSigner,
    /// Token validator over the public half of the key pair
    pub token_validator: Arc<TokenValidator>,
    /// Loaded configuration
    pub config: ServerConfig,
}

impl ServerResources {
    /// Assemble resources from configuration, key material, and a database
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the configured signing
    /// algorithm identifier is unknown.
    pub fn new(
        config: ServerConfig,
        key_material: Arc<KeyMaterial>,
        database: Arc<dyn DatabaseProvider>,
    ) -> AuthResult<Self> {
        let algorithm = parse_algorithm(&config.auth.jwt_algorithm)?;

        let token_signer = TokenSigner::new(
            key_material.clone(),
            algorithm,
            config.auth.token_expiry_minutes,
        );
        let token_validator = Arc::new(TokenValidator::new(key_material, algorithm));

        Ok(Self {
            database,
            token_signer,
            token_validator,
            config,
        })
    }
}

/// Build the application router
///
/// The access gate wraps every route, including the fallback; its allow-list
/// decides which paths skip credential checking.
#[must_use]
pub fn router(resources: &Arc<ServerResources>) -> Router {
    let gate = Arc::new(AccessGate::new(
        resources.config.gate.public_paths.iter().cloned(),
        resources.token_validator.clone(),
    ));

    Router::new()
        .route("/health", get(health_handler))
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/check", post(check_handler))
        .route("/users/me", get(me_handler))
        .layer(middleware::from_fn_with_state(gate, access_gate_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(resources.clone())
}

/// Bind and serve until the process is stopped
///
/// # Errors
///
/// Returns an error if the listen socket cannot be bound or the server
/// loop fails.
pub async fn serve(resources: Arc<ServerResources>) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], resources.config.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("panel identity service listening on {addr}");

    axum::serve(listener, router(&resources)).await?;
    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn signup_handler(
    State(resources): State<Arc<ServerResources>>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, AuthError> {
    AuthRoutes::new(resources).register(request).await.map(Json)
}

async fn login_handler(
    State(resources): State<Arc<ServerResources>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    AuthRoutes::new(resources).login(request).await.map(Json)
}

async fn check_handler(
    State(resources): State<Arc<ServerResources>>,
    Json(request): Json<CheckRequest>,
) -> Json<CheckResponse> {
    Json(AuthRoutes::new(resources).check(&request))
}

/// Echo the authenticated identity attached by the access gate
async fn me_handler(Extension(claims): Extension<Claims>) -> Json<Claims> {
    Json(claims)
}
