// ABOUTME: Main library entry point for the panel identity service
// ABOUTME: Issues, signs, and validates JWT bearer credentials for the panel APIs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # Panel Identity Service
//!
//! An HTTP identity service that turns username/password credentials into
//! signed JWT bearer tokens and gates access to protected request paths.
//!
//! ## Features
//!
//! - **Asymmetric signing**: tokens are signed with an RSA private key and
//!   verified with the matching public key
//! - **Login flow**: username/password exchange for a signed token carrying
//!   the user's authorities
//! - **Access gating**: per-path middleware that admits public requests and
//!   requires a valid bearer token for everything else
//! - **Signup**: identity registration with a default role grant
//!
//! ## Quick Start
//!
//! 1. Start the server with `panel-identity-server`
//! 2. Create an account via `POST /auth/signup`
//! 3. Exchange credentials for a token via `POST /auth/login`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use panel_identity_service::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let config = ServerConfig::from_env()?;
//!
//!     println!("Panel identity service configured with port: HTTP={}",
//!              config.http_port);
//!
//!     Ok(())
//! }
//! ```

/// JWT claims, token signing/validation, and bearer extraction
pub mod auth;

/// Configuration management
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Cryptographic utilities (password hashing)
pub mod crypto;

/// Database abstraction layer with plugin support
pub mod database_plugins;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// RSA key material for token signing and verification
pub mod key_management;

/// Production logging and structured output
pub mod logging;

/// HTTP middleware for access gating
pub mod middleware;

/// Common data models for identity data
pub mod models;

/// `HTTP` routes for signup, login, and token checking
pub mod routes;

/// Router construction and server resources
pub mod server;
