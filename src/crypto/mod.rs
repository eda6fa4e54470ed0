// ABOUTME: Cryptography module for the panel identity service
// ABOUTME: Centralizes password hashing and verification
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Cryptographic utilities for the panel identity service

pub mod passwords;

pub use passwords::{hash_password, verify_password, MAX_COST, MIN_COST};
