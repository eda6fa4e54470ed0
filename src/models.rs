// ABOUTME: Core data models for the panel identity service
// ABOUTME: Defines User and Role identity records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Data Models
//!
//! Identity records owned by the persistence layer. The token core only
//! reads them; it never stores or mutates identity state. Authorities reach
//! a user indirectly through role membership and are consumed by the core
//! as a plain ordered `Vec<String>` at login time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Username (unique, case-sensitive)
    pub username: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address
    pub email: String,
    /// National document / external reference number
    pub document: Option<String>,
    /// Hashed password for authentication
    pub password_hash: String,
    /// Whether the account may log in
    pub enabled: bool,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new enabled user record with a fresh identifier
    #[must_use]
    pub fn new(
        username: String,
        first_name: String,
        last_name: String,
        email: String,
        document: Option<String>,
        password_hash: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            first_name,
            last_name,
            email,
            document,
            password_hash,
            enabled: true,
            created_at: Utc::now(),
        }
    }
}

/// A role linking users to authorities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Unique role identifier
    pub id: Uuid,
    /// Role name (unique)
    pub name: String,
}
