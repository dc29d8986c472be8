use std::sync::Arc;

use tracing::{info, warn};

use super::repository::{NewUser, UserRepository};
use crate::auth::password::PasswordHasher;
use crate::types::{AppError, CreateUserRequest, Result, SanitizedUser};
use crate::utils::config::AdminConfig;

/// Roles granted to self-registered accounts.
pub const DEFAULT_ROLES: &[&str] = &["user"];

/// Roles granted to the bootstrapped administrator account.
pub const ADMIN_ROLES: &[&str] = &["admin", "user"];

/// Account management on top of a [`UserRepository`].
///
/// Owns the password-hashing policy: plaintext passwords enter here and
/// only hashes reach the store. Repository records never leave either;
/// callers only ever see [`SanitizedUser`]. Hashing and verification run
/// on the blocking thread pool so the async runtime is not stalled by the
/// memory-hard work.
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
}

impl UserService {
    /// Creates a service over the given store and hashing policy.
    pub fn new(repo: Arc<dyn UserRepository>, hasher: PasswordHasher) -> Self {
        Self { repo, hasher }
    }

    /// Checks a username/password pair against the store.
    ///
    /// Returns `Ok(None)` for every non-matching case: unknown username,
    /// wrong password, deactivated account. Unknown usernames still burn
    /// one hash verification so response timing does not reveal which
    /// accounts exist.
    pub async fn validate_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<SanitizedUser>> {
        match self.repo.find_by_username(username).await? {
            Some(user) => {
                let hasher = self.hasher.clone();
                let password = password.to_string();
                let hash = user.password_hash.clone();
                let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
                    .await
                    .map_err(|e| AppError::Internal(format!("verification task failed: {}", e)))??;

                if matches && user.is_active {
                    Ok(Some(SanitizedUser::from(&user)))
                } else {
                    Ok(None)
                }
            }
            None => {
                let hasher = self.hasher.clone();
                let password = password.to_string();
                tokio::task::spawn_blocking(move || hasher.verify_throwaway(&password))
                    .await
                    .map_err(|e| AppError::Internal(format!("verification task failed: {}", e)))?;

                Ok(None)
            }
        }
    }

    /// Creates an account with the given roles.
    ///
    /// The roles list must be non-empty; callers choose the default. The
    /// username and email are checked up front so an obvious conflict does
    /// not cost a hash, but the repository's own uniqueness guard remains
    /// the authority when creates race.
    pub async fn create(
        &self,
        req: CreateUserRequest,
        roles: Vec<String>,
    ) -> Result<SanitizedUser> {
        validate_new_account(&req)?;
        if roles.is_empty() {
            return Err(AppError::InvalidInput("roles must not be empty".to_string()));
        }

        if self.repo.find_by_username(&req.username).await?.is_some() {
            return Err(AppError::UsernameTaken);
        }
        if self.repo.find_by_email(&req.email).await?.is_some() {
            return Err(AppError::EmailTaken);
        }

        let hasher = self.hasher.clone();
        let password = req.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("hashing task failed: {}", e)))??;

        let user = self
            .repo
            .create(NewUser {
                username: req.username,
                email: req.email,
                password_hash,
                full_name: req.full_name,
                roles,
            })
            .await?;

        info!(username = %user.username, user_id = %user.id, "Created user account");

        Ok(SanitizedUser::from(&user))
    }

    /// Ensures the administrator account exists, creating it on first boot.
    ///
    /// Idempotent: an account matching the configured username or email
    /// means there is nothing to do. Losing a creation race to a concurrent
    /// boot counts as already-existing and is only worth a warning.
    pub async fn bootstrap_admin(&self, admin: &AdminConfig) -> Result<()> {
        let existing = match self.repo.find_by_username(&admin.username).await? {
            Some(user) => Some(user),
            None => self.repo.find_by_email(&admin.email).await?,
        };
        if existing.is_some() {
            info!(username = %admin.username, "Admin account already present, skipping bootstrap");
            return Ok(());
        }

        let req = CreateUserRequest {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password: admin.password.clone(),
            full_name: admin.full_name.clone(),
        };
        let admin_roles = ADMIN_ROLES.iter().map(|r| r.to_string()).collect();

        match self.create(req, admin_roles).await {
            Ok(user) => {
                info!(username = %user.username, user_id = %user.user_id, "Bootstrapped admin account");
                Ok(())
            }
            Err(AppError::UsernameTaken) | Err(AppError::EmailTaken) => {
                warn!(
                    username = %admin.username,
                    "Admin bootstrap lost a creation race, account already exists"
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// All accounts in creation order, without password hashes.
    pub async fn find_all(&self) -> Result<Vec<SanitizedUser>> {
        let users = self.repo.find_all().await?;

        Ok(users.iter().map(SanitizedUser::from).collect())
    }
}

fn validate_new_account(req: &CreateUserRequest) -> Result<()> {
    if req.username.trim().is_empty() {
        return Err(AppError::InvalidInput("username must not be empty".to_string()));
    }
    if req.email.trim().is_empty() {
        return Err(AppError::InvalidInput("email must not be empty".to_string()));
    }
    if !req.email.contains('@') {
        return Err(AppError::InvalidInput("email must contain '@'".to_string()));
    }
    if req.password.trim().is_empty() {
        return Err(AppError::InvalidInput("password must not be empty".to_string()));
    }
    if req.full_name.trim().is_empty() {
        return Err(AppError::InvalidInput("full name must not be empty".to_string()));
    }

    Ok(())
}
