//! Account storage and management.
//!
//! This module provides the account layer:
//! - **Repository**: the `UserRepository` trait plus the in-process and
//!   SQLite/Turso backends, selected through `StoreProvider`
//! - **Service**: `UserService`, which owns password hashing, input
//!   validation, and the admin bootstrap
//!
//! Plaintext passwords never reach a repository; `UserService` hashes them
//! first and the stored record only ever carries the hash.

/// In-process map store.
pub mod memory;
/// The `UserRepository` trait, record types, and `StoreProvider`.
pub mod repository;
/// Account management and the admin bootstrap.
pub mod service;
/// libSQL store (local file, in-memory, or remote Turso).
pub mod sqlite;

// Re-exports
pub use memory::InMemoryUserRepository;
pub use repository::{NewUser, StoreProvider, User, UserRepository};
pub use service::{UserService, ADMIN_ROLES, DEFAULT_ROLES};
pub use sqlite::SqliteUserRepository;
