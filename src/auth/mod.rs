//! Authentication and authorization.
//!
//! This module provides the credential side of the server:
//! - **Password hashing**: Argon2id with per-password salts
//! - **Tokens**: HS256-signed claim sets with a fixed validity window
//! - **Policy**: role-based access decisions
//! - **Middleware**: axum layers that gate protected routes
//!
//! [`AuthService`] ties the pieces together and is what handlers and
//! middleware talk to.

/// Request guards: the bearer-token gate, the role gate, and the claims
/// extractor.
pub mod middleware;
/// Argon2id password hashing and verification.
pub mod password;
/// Role requirements and the access decision.
pub mod policy;
/// The orchestrator handlers and middleware talk to.
pub mod service;
/// HS256 token issuance and validation.
pub mod token;

// Re-exports
pub use middleware::{auth_middleware, authorize_middleware, AuthUser};
pub use password::PasswordHasher;
pub use policy::AuthorizationPolicy;
pub use service::AuthService;
pub use token::{TokenService, DEFAULT_TOKEN_TTL_SECS};
