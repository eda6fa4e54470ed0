// ABOUTME: SQLite database implementation over sqlx
// ABOUTME: Stores users, roles, role associations, and role authorities

//! SQLite database implementation
//!
//! Schema is created by [`SqliteDatabase::migrate`], which also seeds the
//! default signup role so a fresh database can serve registrations
//! immediately. `sqlite::memory:` is supported for tests.

use super::DatabaseProvider;
use crate::constants::roles;
use crate::models::{Role, User};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Row, Sqlite, SqlitePool};
use uuid::Uuid;

/// SQLite database implementation
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: Pool<Sqlite>,
}

impl SqliteDatabase {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or the
    /// schema cannot be created.
    pub async fn new(database_url: &str) -> Result<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:")
            && !database_url.contains(":memory:")
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_string()
        };

        // In-memory databases are per-connection; cap the pool at one so
        // every query sees the same schema.
        let pool = if connection_options.contains(":memory:") {
            sqlx::sqlite::SqlitePoolOptions::new()
                .max_connections(1)
                .connect(&connection_options)
                .await?
        } else {
            SqlitePool::connect(&connection_options).await?
        };

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
        let id_str: String = row.try_get("id")?;
        let id = Uuid::parse_str(&id_str)?;

        let created_at_str: String = row.try_get("created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)?.with_timezone(&Utc);

        Ok(User {
            id,
            username: row.try_get("username")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            document: row.try_get("document")?,
            password_hash: row.try_get("password_hash")?,
            enabled: row.try_get("enabled")?,
            created_at,
        })
    }

    fn row_to_role(row: &sqlx::sqlite::SqliteRow) -> Result<Role> {
        let id_str: String = row.try_get("id")?;
        Ok(Role {
            id: Uuid::parse_str(&id_str)?,
            name: row.try_get("name")?,
        })
    }
}

#[async_trait]
impl DatabaseProvider for SqliteDatabase {
    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL,
                document TEXT,
                password_hash TEXT NOT NULL,
                enabled BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_username ON users(username)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS roles (
                id TEXT PRIMARY KEY,
                name TEXT UNIQUE NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_roles (
                user_id TEXT NOT NULL REFERENCES users(id),
                role_id TEXT NOT NULL REFERENCES roles(id),
                PRIMARY KEY (user_id, role_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Authority rows carry an insertion-ordered key; lookups order by it
        // so the sequence handed to the signer is deterministic.
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS role_authorities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                role_id TEXT NOT NULL REFERENCES roles(id),
                authority TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Seed the default signup role
        sqlx::query("INSERT OR IGNORE INTO roles (id, name) VALUES (?1, ?2)")
            .bind(Uuid::new_v4().to_string())
            .bind(roles::DEFAULT_ROLE)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn create_user(&self, user: &User) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO users (id, username, first_name, last_name, email, document, password_hash, enabled, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.document)
        .bind(&user.password_hash)
        .bind(user.enabled)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(user.id)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_user_count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }

    async fn get_user_authorities(&self, user_id: Uuid) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r"
            SELECT ra.authority FROM role_authorities ra
            JOIN user_roles ur ON ur.role_id = ra.role_id
            WHERE ur.user_id = ?1
            ORDER BY ra.id
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let mut authorities = Vec::with_capacity(rows.len());
        for row in &rows {
            authorities.push(row.try_get("authority")?);
        }
        Ok(authorities)
    }

    async fn create_role(&self, name: &str) -> Result<Role> {
        let role = Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };

        sqlx::query("INSERT INTO roles (id, name) VALUES (?1, ?2)")
            .bind(role.id.to_string())
            .bind(&role.name)
            .execute(&self.pool)
            .await?;

        Ok(role)
    }

    async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        let row = sqlx::query("SELECT * FROM roles WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_role(&row)?)),
            None => Ok(None),
        }
    }

    async fn add_user_role(&self, user_id: Uuid, role_id: Uuid) -> Result<()> {
        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES (?1, ?2)")
            .bind(user_id.to_string())
            .bind(role_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn add_role_authority(&self, role_id: Uuid, authority: &str) -> Result<()> {
        sqlx::query("INSERT INTO role_authorities (role_id, authority) VALUES (?1, ?2)")
            .bind(role_id.to_string())
            .bind(authority)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
