//! User storage abstraction
//!
//! This module provides the `UserRepository` trait that abstracts over the
//! account store backends (in-process map store, local SQLite file, remote
//! Turso).
//!
//! # Example
//!
//! ```rust,ignore
//! use warden::users::StoreProvider;
//!
//! // In-process store (default for development/testing)
//! let repo = StoreProvider::Memory.create_repository().await?;
//!
//! // File-based SQLite
//! let repo = StoreProvider::Sqlite { path: "users.db".into() }.create_repository().await?;
//!
//! // Remote Turso (requires `turso` feature)
//! let repo = StoreProvider::Turso { url, auth_token }.create_repository().await?;
//! ```

use crate::types::{Result, SanitizedUser};
use async_trait::async_trait;

/// A stored account record, password hash included.
///
/// Never serialized to the wire as-is; handlers convert to
/// [`SanitizedUser`] first.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique account identifier
    pub id: String,
    /// Login name, unique across the store
    pub username: String,
    /// Contact address, unique across the store
    pub email: String,
    /// PHC-formatted password hash
    pub password_hash: String,
    /// Display name
    pub full_name: String,
    /// Whether the account may log in
    pub is_active: bool,
    /// Roles held by the account
    pub roles: Vec<String>,
    /// Unix timestamp of creation
    pub created_at: i64,
}

impl From<&User> for SanitizedUser {
    fn from(user: &User) -> Self {
        SanitizedUser {
            user_id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            is_active: user.is_active,
            roles: user.roles.clone(),
            created_at: user.created_at,
        }
    }
}

/// Fields for a not-yet-stored account. The store assigns `id` and
/// `created_at` and marks the account active.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login name to register
    pub username: String,
    /// Contact address to register
    pub email: String,
    /// Already-hashed password
    pub password_hash: String,
    /// Display name
    pub full_name: String,
    /// Initial roles
    pub roles: Vec<String>,
}

/// Abstract trait for account store operations
///
/// Implementations must make `create` atomic with respect to the
/// uniqueness checks: two concurrent creates with the same username or
/// email resolve to exactly one winner, the loser gets the matching
/// conflict error.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account, enforcing username and email uniqueness.
    ///
    /// A taken username reports before a taken email when both collide.
    async fn create(&self, new_user: NewUser) -> Result<User>;

    /// Look up an account by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Look up an account by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Look up an account by id.
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    /// All accounts in creation order.
    async fn find_all(&self) -> Result<Vec<User>>;
}

/// Store provider configuration
#[derive(Debug, Clone, Default)]
pub enum StoreProvider {
    /// In-process map store (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    Sqlite {
        /// Path to the SQLite database file
        path: String,
    },
    /// Remote Turso database (requires network access)
    #[cfg(feature = "turso")]
    Turso {
        /// The Turso database URL (e.g., `libsql://your-db.turso.io`)
        url: String,
        /// Authentication token for the Turso database
        auth_token: String,
    },
}

impl StoreProvider {
    /// Create a user repository from this provider configuration
    pub async fn create_repository(&self) -> Result<Box<dyn UserRepository>> {
        match self {
            StoreProvider::Memory => {
                let repo = super::memory::InMemoryUserRepository::new();
                Ok(Box::new(repo))
            }
            StoreProvider::Sqlite { path } => {
                let repo = super::sqlite::SqliteUserRepository::new_local(path).await?;
                Ok(Box::new(repo))
            }
            #[cfg(feature = "turso")]
            StoreProvider::Turso { url, auth_token } => {
                let repo = super::sqlite::SqliteUserRepository::new_remote(
                    url.clone(),
                    auth_token.clone(),
                )
                .await?;
                Ok(Box::new(repo))
            }
        }
    }

    /// Create from environment variables or use defaults
    pub fn from_env() -> Self {
        // Check for Turso configuration first
        #[cfg(feature = "turso")]
        {
            if let (Ok(url), Ok(token)) = (
                std::env::var("TURSO_DATABASE_URL"),
                std::env::var("TURSO_AUTH_TOKEN"),
            ) {
                if !url.is_empty() && !token.is_empty() {
                    return StoreProvider::Turso {
                        url,
                        auth_token: token,
                    };
                }
            }
        }

        // Check for SQLite file path
        if let Ok(path) = std::env::var("DATABASE_PATH") {
            if !path.is_empty() && path != ":memory:" {
                return StoreProvider::Sqlite { path };
            }
        }

        // Default to in-memory
        StoreProvider::Memory
    }
}

/// Loggable form of the provider. The Turso auth token is never printed.
impl std::fmt::Display for StoreProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreProvider::Memory => write!(f, "memory"),
            StoreProvider::Sqlite { path } => write!(f, "sqlite:{}", path),
            #[cfg(feature = "turso")]
            StoreProvider::Turso { url, .. } => write!(f, "turso:{}", url),
        }
    }
}
