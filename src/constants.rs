// ABOUTME: Application constants organized by domain
// ABOUTME: Default ports, token lifetimes, key sizes, and role names

//! Constants module
//!
//! Application constants grouped by domain. Values that deployments commonly
//! override live in [`crate::config::environment`]; these are the defaults.

/// Default configuration values
pub mod defaults {
    /// Default HTTP listen port
    pub const HTTP_PORT: u16 = 8080;

    /// Default token lifetime in minutes
    pub const TOKEN_EXPIRY_MINUTES: i64 = 60;

    /// Default RSA modulus size in bits for the signing key pair
    pub const RSA_KEY_BITS: usize = 2048;

    /// Default signing algorithm identifier (RSA + SHA-512)
    pub const JWT_ALGORITHM: &str = "RS512";

    /// Default database URL
    pub const DATABASE_URL: &str = "sqlite:./data/identity.db";
}

/// Role and authority names
pub mod roles {
    /// Role granted to every newly registered identity
    pub const DEFAULT_ROLE: &str = "ROLE_USER";
}

/// Request paths exempt from credential checking unless overridden
pub mod public_paths {
    /// Login endpoint
    pub const LOGIN: &str = "/auth/login";
    /// Signup endpoint
    pub const SIGNUP: &str = "/auth/signup";
    /// Token check endpoint
    pub const TOKEN_CHECK: &str = "/auth/check";
    /// Liveness endpoint
    pub const HEALTH: &str = "/health";
}

/// Service identity for logs
pub mod service_names {
    /// Canonical service name
    pub const PANEL_IDENTITY_SERVICE: &str = "panel-identity-service";
}
