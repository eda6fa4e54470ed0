// ABOUTME: Configuration module for the panel identity service
// ABOUTME: Re-exports environment-based server configuration

//! Configuration management

pub mod environment;

pub use environment::{AuthConfig, DatabaseConfig, GateConfig, LogLevel, ServerConfig};
