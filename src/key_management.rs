// ABOUTME: RSA key material for asymmetric JWT signing and verification
// ABOUTME: Generates or loads a process-wide key pair and derives signing/verification handles
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 Async-IO.org

//! RSA Key Material
//!
//! This module provides:
//! - RSA key pair generation for asymmetric JWT signing
//! - PEM import/export of the private key
//! - Signing and verification handles derived once at construction
//!
//! ## Security Model
//!
//! - One key pair per process lifetime, created or loaded at startup
//! - The private key never leaves the server
//! - `TokenSigner` uses the private half, `TokenValidator` the public half;
//!   neither mutates the pair
//!
//! Derivation of the `jsonwebtoken` handles happens inside the constructors.
//! Malformed key material therefore fails at startup with an explicit error
//! instead of surfacing deep inside request handling.

use anyhow::{anyhow, Result};
use jsonwebtoken::{DecodingKey, EncodingKey};
use rsa::{
    pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey},
    RsaPrivateKey, RsaPublicKey,
};

/// RSA key size in bits (2048 bits minimum for production use)
pub const RSA_KEY_SIZE: usize = 2048;

/// Process-wide RSA key pair with derived signing/verification handles
pub struct KeyMaterial {
    private_key: RsaPrivateKey,
    public_key: RsaPublicKey,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl KeyMaterial {
    /// Generate a new key pair with the default modulus size
    ///
    /// # Errors
    /// Returns an error if key generation fails. Callers treat this as fatal:
    /// the process cannot start without working key material.
    pub fn generate() -> Result<Self> {
        Self::generate_with_key_size(RSA_KEY_SIZE)
    }

    /// Generate a key pair with a configurable modulus size
    ///
    /// # Errors
    /// Returns an error if key generation or handle derivation fails
    pub fn generate_with_key_size(key_size_bits: usize) -> Result<Self> {
        use rand::rngs::OsRng;

        let mut rng = OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, key_size_bits)
            .map_err(|e| anyhow!("Failed to generate RSA private key: {e}"))?;

        Self::from_private_key(private_key)
    }

    /// Import a private key from PKCS#8 PEM
    ///
    /// # Errors
    /// Returns an error if the PEM is malformed or the key is structurally
    /// invalid. This signals a configuration error.
    pub fn from_private_key_pem(pem: &str) -> Result<Self> {
        let private_key = RsaPrivateKey::from_pkcs8_pem(pem)
            .map_err(|e| anyhow!("Failed to parse private key PEM: {e}"))?;

        Self::from_private_key(private_key)
    }

    /// Derive the public half and the `jsonwebtoken` handles
    fn from_private_key(private_key: RsaPrivateKey) -> Result<Self> {
        let public_key = RsaPublicKey::from(&private_key);

        let private_pem = private_key
            .to_pkcs8_pem(rsa::pkcs8::LineEnding::LF)
            .map_err(|e| anyhow!("Failed to export private key as PEM: {e}"))?;
        let public_pem = public_key
            .to_public_key_pem(rsa::pkcs8::LineEnding::LF)
            .map_err(|e| anyhow!("Failed to export public key as PEM: {e}"))?;

        let encoding_key = EncodingKey::from_rsa_pem(private_pem.as_bytes())
            .map_err(|e| anyhow!("Failed to create encoding key: {e}"))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem.as_bytes())
            .map_err(|e| anyhow!("Failed to create decoding key: {e}"))?;

        Ok(Self {
            private_key,
            public_key,
            encoding_key,
            decoding_key,
        })
    }

    /// Signing handle for the private half
    #[must_use]
    pub const fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// Verification handle for the public half
    #[must_use]
    pub const fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// Export the private key as PKCS#8 PEM
    ///
    /// # Errors
    /// Returns an error if PEM encoding fails
    pub fn export_private_key_pem(&self) -> Result<String> {
        self.private_key
            .to_pkcs8_pem(rsa::pkcs8::LineEnding::LF)
            .map(|pem| pem.to_string())
            .map_err(|e| anyhow!("Failed to export private key as PEM: {e}"))
    }

    /// Export the public key as SPKI PEM
    ///
    /// # Errors
    /// Returns an error if PEM encoding fails
    pub fn export_public_key_pem(&self) -> Result<String> {
        self.public_key
            .to_public_key_pem(rsa::pkcs8::LineEnding::LF)
            .map_err(|e| anyhow!("Failed to export public key as PEM: {e}"))
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose key bytes through Debug output
        f.debug_struct("KeyMaterial").finish_non_exhaustive()
    }
}
