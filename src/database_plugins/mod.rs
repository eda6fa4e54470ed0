// ABOUTME: Database abstraction layer for the panel identity service
// ABOUTME: Plugin architecture with a SQLite backend

//! Database abstraction layer
//!
//! All database implementations must implement [`DatabaseProvider`] to give
//! the application layer a consistent interface. Handlers hold the provider
//! behind `Arc<dyn DatabaseProvider>`; tests substitute doubles the same way.

use crate::models::{Role, User};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

pub mod sqlite;

pub use sqlite::SqliteDatabase;

/// Core database abstraction trait
#[async_trait]
pub trait DatabaseProvider: Send + Sync {
    /// Run database migrations to set up schema and seed the default role
    async fn migrate(&self) -> Result<()>;

    // ================================
    // Identity Management
    // ================================

    /// Create a new user account
    async fn create_user(&self, user: &User) -> Result<Uuid>;

    /// Get user by ID
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>>;

    /// Get user by username (exact, case-sensitive). Returns the stored
    /// password hash, never a plaintext secret.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Get total number of users
    async fn get_user_count(&self) -> Result<i64>;

    // ================================
    // Authorities
    // ================================

    /// Get the authority sequence for a user, in insertion order. An empty
    /// sequence is a normal outcome, not an error.
    async fn get_user_authorities(&self, user_id: Uuid) -> Result<Vec<String>>;

    // ================================
    // Roles (signup path)
    // ================================

    /// Create a role
    async fn create_role(&self, name: &str) -> Result<Role>;

    /// Get a role by name
    async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>>;

    /// Associate a role with a user
    async fn add_user_role(&self, user_id: Uuid, role_id: Uuid) -> Result<()>;

    /// Attach an authority label to a role
    async fn add_role_authority(&self, role_id: Uuid, authority: &str) -> Result<()>;
}
