// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, key material, and user creation helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `panel_identity_service`
//!
//! Key material generation is expensive, so one pair is shared across a test
//! process; a second, independent pair is available for cross-key tests.

use anyhow::Result;
use panel_identity_service::{
    config::environment::ServerConfig,
    crypto,
    database_plugins::{DatabaseProvider, SqliteDatabase},
    key_management::KeyMaterial,
    models::{Role, User},
    server::ServerResources,
};
use std::sync::{Arc, Once, OnceLock};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// Shared RSA key material for the test process
pub fn get_shared_key_material() -> Arc<KeyMaterial> {
    static KEY_MATERIAL: OnceLock<Arc<KeyMaterial>> = OnceLock::new();
    KEY_MATERIAL
        .get_or_init(|| Arc::new(KeyMaterial::generate().unwrap()))
        .clone()
}

/// A second, independent key pair for cross-key validation tests
pub fn get_other_key_material() -> Arc<KeyMaterial> {
    static KEY_MATERIAL: OnceLock<Arc<KeyMaterial>> = OnceLock::new();
    KEY_MATERIAL
        .get_or_init(|| Arc::new(KeyMaterial::generate().unwrap()))
        .clone()
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Arc<SqliteDatabase>> {
    init_test_logging();
    let database = Arc::new(SqliteDatabase::new("sqlite::memory:").await?);
    Ok(database)
}

/// Configuration suited to tests: fast hashing, default paths
pub fn create_test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.auth.bcrypt_cost = crypto::MIN_COST;
    config
}

/// Assemble server resources over the shared key material
pub fn create_test_resources(
    database: Arc<dyn DatabaseProvider>,
) -> Result<Arc<ServerResources>> {
    let resources =
        ServerResources::new(create_test_config(), get_shared_key_material(), database)?;
    Ok(Arc::new(resources))
}

/// Insert a user with the given credentials and return the stored record
///
/// Hashes at the minimum cost to keep the suite fast; tests that exercise
/// the default work factor use [`seed_user_with_cost`].
pub async fn seed_user(
    database: &Arc<SqliteDatabase>,
    username: &str,
    password: &str,
    enabled: bool,
) -> Result<User> {
    seed_user_with_cost(database, username, password, enabled, crypto::MIN_COST).await
}

/// Insert a user hashed at an explicit bcrypt work factor
pub async fn seed_user_with_cost(
    database: &Arc<SqliteDatabase>,
    username: &str,
    password: &str,
    enabled: bool,
    cost: u32,
) -> Result<User> {
    let password_hash = crypto::hash_password(password, cost)?;
    let mut user = User::new(
        username.to_owned(),
        "Test".into(),
        "User".into(),
        format!("{username}@example.com"),
        None,
        password_hash,
    );
    user.enabled = enabled;
    database.create_user(&user).await?;
    Ok(user)
}

/// Create a role carrying the given authorities, in order
pub async fn seed_role_with_authorities(
    database: &Arc<SqliteDatabase>,
    role_name: &str,
    authorities: &[&str],
) -> Result<Role> {
    let role = database.create_role(role_name).await?;
    for authority in authorities {
        database.add_role_authority(role.id, authority).await?;
    }
    Ok(role)
}
