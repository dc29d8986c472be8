//! Core types shared across the crate: API payloads, token claims, and the
//! error taxonomy with its HTTP mapping.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============= API Request/Response Types =============

/// Credentials presented on login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login: a signed bearer token plus the account it identifies.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: SanitizedUser,
}

/// Payload for creating an account (self-registration and bootstrap).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Admin-only create payload: same fields plus an explicit role set.
///
/// `roles` defaults to `["user"]` when omitted.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminCreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

impl AdminCreateUserRequest {
    /// Split into the plain create payload and the requested role set.
    pub fn into_parts(self) -> (CreateUserRequest, Option<Vec<String>>) {
        (
            CreateUserRequest {
                username: self.username,
                email: self.email,
                password: self.password,
                full_name: self.full_name,
            },
            self.roles,
        )
    }
}

/// Response for the admin probe endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminAreaResponse {
    pub message: String,
    pub user: Claims,
}

// ============= User Types =============

/// A user as seen outside the store: every field except the password hash.
///
/// This is the only shape in which accounts cross the service boundary, so
/// the hash cannot leak by construction.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedUser {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub roles: Vec<String>,
    pub created_at: i64,
}

// ============= Token Claims =============

/// Signed token payload: identity, roles, and the validity window.
///
/// Claim names are stable wire format (`sub`, `username`, `roles`, `email`,
/// `fullName`, `iat`, `exp`); once issued a claim set is never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub roles: Vec<String>,
    pub email: String,
    pub full_name: String,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    /// Whether the claim set carries the given role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

// ============= Error Types =============

/// Crate-wide error taxonomy.
///
/// Security-relevant variants deliberately carry no detail: an unknown
/// username and a wrong password are the same `InvalidCredentials`, and a
/// token rejected for any reason other than expiry is just `TokenInvalid`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Unknown user or wrong password; the two are never distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Malformed token or bad signature.
    #[error("invalid token")]
    TokenInvalid,

    /// Well-signed token past its expiry.
    #[error("token expired")]
    TokenExpired,

    /// Valid identity, insufficient role.
    #[error("forbidden")]
    Forbidden,

    /// The requested username already belongs to another account.
    #[error("username already taken")]
    UsernameTaken,

    /// The requested email already belongs to another account.
    #[error("email already registered")]
    EmailTaken,

    /// User store unreachable or failing; retryable at the caller's
    /// discretion. The detail is logged, never returned.
    #[error("user store unavailable: {0}")]
    Store(String),

    /// Request rejected before reaching the core.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Anything else; the detail is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let message = self.to_string();
        let (status, message) = match self {
            AppError::InvalidCredentials | AppError::TokenInvalid | AppError::TokenExpired => {
                (StatusCode::UNAUTHORIZED, message)
            }
            AppError::Forbidden => (StatusCode::FORBIDDEN, message),
            AppError::UsernameTaken | AppError::EmailTaken => (StatusCode::CONFLICT, message),
            AppError::Store(detail) => {
                tracing::error!(%detail, "user store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "user store unavailable".to_string(),
                )
            }
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(detail) => {
                tracing::error!(%detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_role_lookup() {
        let claims = Claims {
            sub: "user-1".to_string(),
            username: "alice".to_string(),
            roles: vec!["admin".to_string(), "user".to_string()],
            email: "alice@example.com".to_string(),
            full_name: "Alice Example".to_string(),
            iat: 0,
            exp: 60,
        };

        assert!(claims.has_role("admin"));
        assert!(claims.has_role("user"));
        assert!(!claims.has_role("auditor"));
    }

    #[test]
    fn claims_wire_names_are_stable() {
        let claims = Claims {
            sub: "user-1".to_string(),
            username: "alice".to_string(),
            roles: vec!["user".to_string()],
            email: "alice@example.com".to_string(),
            full_name: "Alice Example".to_string(),
            iat: 10,
            exp: 20,
        };

        let value = serde_json::to_value(&claims).expect("claims serialize");
        let object = value.as_object().expect("claims are a JSON object");

        for key in ["sub", "username", "roles", "email", "fullName", "iat", "exp"] {
            assert!(object.contains_key(key), "missing claim field {key}");
        }
        assert!(!object.contains_key("full_name"));
    }

    #[test]
    fn sanitized_user_has_no_hash_field() {
        let user = SanitizedUser {
            user_id: "user-1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: "Alice Example".to_string(),
            is_active: true,
            roles: vec!["user".to_string()],
            created_at: 0,
        };

        let value = serde_json::to_value(&user).expect("user serialize");
        let text = value.to_string();
        assert!(!text.contains("password"));
        assert!(!text.contains("hash"));
    }
}
