use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::repository::{NewUser, User, UserRepository};
use crate::types::{AppError, Result};

#[derive(Default)]
struct Tables {
    by_id: HashMap<String, User>,
    username_to_id: HashMap<String, String>,
    email_to_id: HashMap<String, String>,
    creation_order: Vec<String>,
}

/// Account store held entirely in process memory.
///
/// Accounts live in a map guarded by a single `RwLock`; everything is lost
/// on restart. Suited to development and tests, and to deployments that
/// only ever use the bootstrapped admin account.
pub struct InMemoryUserRepository {
    tables: RwLock<Tables>,
}

impl InMemoryUserRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User> {
        // Uniqueness check and insert happen under one write lock, so
        // concurrent creates with the same username or email serialize
        // and exactly one wins.
        let mut tables = self.tables.write();

        if tables.username_to_id.contains_key(&new_user.username) {
            return Err(AppError::UsernameTaken);
        }
        if tables.email_to_id.contains_key(&new_user.email) {
            return Err(AppError::EmailTaken);
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            full_name: new_user.full_name,
            is_active: true,
            roles: new_user.roles,
            created_at: Utc::now().timestamp(),
        };

        tables
            .username_to_id
            .insert(user.username.clone(), user.id.clone());
        tables
            .email_to_id
            .insert(user.email.clone(), user.id.clone());
        tables.creation_order.push(user.id.clone());
        tables.by_id.insert(user.id.clone(), user.clone());

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read();

        Ok(tables
            .username_to_id
            .get(username)
            .and_then(|id| tables.by_id.get(id))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read();

        Ok(tables
            .email_to_id
            .get(email)
            .and_then(|id| tables.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let tables = self.tables.read();

        Ok(tables.by_id.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        let tables = self.tables.read();

        Ok(tables
            .creation_order
            .iter()
            .filter_map(|id| tables.by_id.get(id))
            .cloned()
            .collect())
    }
}
