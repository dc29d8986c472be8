//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Authentication handlers (login, register, profile, admin probe).
pub mod auth;
/// Account administration handlers (list, create).
pub mod users;

use axum::http::StatusCode;

/// Liveness probe.
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
