// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, defaults, and runtime configuration parsing
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-based configuration management for production deployment

use crate::constants::{defaults, public_paths};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and above
    Warn,
    /// Informational and above
    #[default]
    Info,
    /// Debug and above
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL (`sqlite:<path>` or `sqlite::memory:`)
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::DATABASE_URL.into(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// RSA modulus size in bits for a generated key pair
    pub rsa_key_bits: usize,
    /// PEM file holding the signing private key; generated at startup if unset
    pub private_key_path: Option<PathBuf>,
    /// Signing algorithm identifier (e.g. `RS512`)
    pub jwt_algorithm: String,
    /// Token lifetime in minutes
    pub token_expiry_minutes: i64,
    /// bcrypt work factor for password hashing
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            rsa_key_bits: defaults::RSA_KEY_BITS,
            private_key_path: None,
            jwt_algorithm: defaults::JWT_ALGORITHM.into(),
            token_expiry_minutes: defaults::TOKEN_EXPIRY_MINUTES,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Access gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Exact request paths exempt from credential checking. Fixed at
    /// construction time; never mutated afterward.
    pub public_paths: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            public_paths: vec![
                public_paths::LOGIN.into(),
                public_paths::SIGNUP.into(),
                public_paths::TOKEN_CHECK.into(),
                public_paths::HEALTH.into(),
            ],
        }
    }
}

/// Server configuration loaded from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Log level
    pub log_level: LogLevel,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// Access gate configuration
    pub gate: GateConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: defaults::HTTP_PORT,
            log_level: LogLevel::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            gate: GateConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Every field has a development-suitable default; production deployments
    /// override through the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a set environment variable fails to parse
    /// (non-numeric port, non-numeric expiry, etc.).
    pub fn from_env() -> Result<Self> {
        let http_port = env_parse("HTTP_PORT", defaults::HTTP_PORT)?;

        let log_level = env::var("RUST_LOG")
            .map(|s| LogLevel::from_str_or_default(&s))
            .unwrap_or_default();

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| defaults::DATABASE_URL.into()),
        };

        let auth = AuthConfig {
            rsa_key_bits: env_parse("RSA_KEY_BITS", defaults::RSA_KEY_BITS)?,
            private_key_path: env::var("JWT_PRIVATE_KEY_PATH").ok().map(PathBuf::from),
            jwt_algorithm: env::var("JWT_ALGORITHM")
                .unwrap_or_else(|_| defaults::JWT_ALGORITHM.into()),
            token_expiry_minutes: env_parse(
                "TOKEN_EXPIRY_MINUTES",
                defaults::TOKEN_EXPIRY_MINUTES,
            )?,
            bcrypt_cost: env_parse("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        };

        let gate = env::var("PUBLIC_PATHS").map_or_else(
            |_| GateConfig::default(),
            |raw| GateConfig {
                public_paths: raw
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect(),
            },
        );

        Ok(Self {
            http_port,
            log_level,
            database,
            auth,
            gate,
        })
    }

    /// One-line configuration summary for startup logging. Secrets and key
    /// paths are not included.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "http_port={} log_level={} database={} algorithm={} token_expiry={}m public_paths={}",
            self.http_port,
            self.log_level,
            self.database.url,
            self.auth.jwt_algorithm,
            self.auth.token_expiry_minutes,
            self.gate.public_paths.join(",")
        )
    }
}

/// Parse an environment variable, falling back to a default when unset
fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("invalid value for {name}: {raw}")),
        Err(_) => Ok(default),
    }
}
