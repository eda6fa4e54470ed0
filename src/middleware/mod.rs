// ABOUTME: HTTP middleware for access gating
// ABOUTME: Classifies requests as public or protected and enforces bearer credentials

pub mod auth;

// Access gating middleware
pub use auth::{access_gate_middleware, AccessGate};
