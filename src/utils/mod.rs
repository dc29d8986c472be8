//! Configuration utilities
//!
//! Environment-driven configuration for the server binary. Everything is
//! resolved once at startup; the rest of the crate takes plain values.

/// Environment-driven server configuration.
pub mod config;

// Re-exports
pub use config::{AdminConfig, AuthConfig, Config, ServerConfig};
