//! # Warden - Identity and Access Server
//!
//! An authentication and authorization server built in Rust with argon2id
//! credential checks, HS256 JWT issuance, role-gated routes, and pluggable
//! user stores.
//!
//! ## Overview
//!
//! Warden can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `warden-server` binary
//! 2. **As a library** - Embed the auth core into your own Rust project
//!
//! ## Quick Start (Library Usage)
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! warden-server = "0.1"
//! ```
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use warden::auth::{AuthService, PasswordHasher, TokenService};
//! use warden::types::CreateUserRequest;
//! use warden::users::{StoreProvider, UserService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Pick a user store (in-memory here; see `StoreProvider` for SQLite)
//!     let repo = StoreProvider::Memory.create_repository().await?;
//!     let users = Arc::new(UserService::new(repo.into(), PasswordHasher::new()?));
//!     let auth = AuthService::new(users, TokenService::new("change-me", 3600)?);
//!
//!     // Register an account, then trade its credentials for a token
//!     auth.register(CreateUserRequest {
//!         username: "alice".into(),
//!         email: "alice@example.com".into(),
//!         password: "correct horse battery staple".into(),
//!         full_name: "Alice Example".into(),
//!     })
//!     .await?;
//!     let login = auth.login("alice", "correct horse battery staple").await?;
//!     println!("{}", login.token);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `turso` | Remote Turso user store (libsql over the network) |
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - Password hashing, JWT issuance, policies, middleware
//! - [`users`] - User repositories (memory, SQLite) and account service
//! - [`types`] - Common types and error handling
//! - [`utils`] - Environment-driven configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Password hashing, token issuance and validation, authorization policies.
pub mod auth;
/// Core types (requests, responses, claims, errors).
pub mod types;
/// User repositories and the account service.
pub mod users;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use api::create_app;
pub use auth::{AuthService, AuthorizationPolicy, PasswordHasher, TokenService};
pub use types::{AppError, Claims, Result, SanitizedUser};
pub use users::{StoreProvider, UserRepository, UserService};
pub use utils::config::Config;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Environment-driven configuration
    pub config: Arc<Config>,
    /// Account management service
    pub user_service: Arc<UserService>,
    /// Authentication and authorization service
    pub auth_service: Arc<AuthService>,
}
