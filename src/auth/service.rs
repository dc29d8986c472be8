use std::sync::Arc;

use tracing::{info, warn};

use super::policy::AuthorizationPolicy;
use super::token::TokenService;
use crate::types::{AppError, Claims, CreateUserRequest, LoginResponse, Result, SanitizedUser};
use crate::users::{UserService, DEFAULT_ROLES};

/// Front door for the three authentication questions: who are you
/// (login), is this token yours (authenticate), may you do this
/// (authorize).
///
/// Login failures all collapse to [`AppError::InvalidCredentials`], so the
/// response never tells a caller whether the username exists, the password
/// was wrong, or the account was deactivated.
pub struct AuthService {
    users: Arc<UserService>,
    tokens: TokenService,
}

impl AuthService {
    /// Creates the orchestrator over an account service and a token signer.
    pub fn new(users: Arc<UserService>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Exchanges a username/password pair for a signed token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let user = match self.users.validate_user(username, password).await? {
            Some(user) => user,
            None => {
                warn!(%username, "Login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self.tokens.issue(&user)?;
        info!(username = %user.username, user_id = %user.user_id, "User logged in");

        Ok(LoginResponse { token, user })
    }

    /// Creates a self-registered account with the default role set.
    pub async fn register(&self, req: CreateUserRequest) -> Result<SanitizedUser> {
        let roles = DEFAULT_ROLES.iter().map(|r| r.to_string()).collect();

        self.users.create(req, roles).await
    }

    /// Validates a bearer token and returns its claims.
    pub fn authenticate(&self, token: &str) -> Result<Claims> {
        self.tokens.validate(token)
    }

    /// Checks a claim set against a role policy.
    pub fn authorize(&self, claims: &Claims, policy: &AuthorizationPolicy) -> Result<()> {
        if policy.permits(&claims.roles) {
            Ok(())
        } else {
            warn!(
                username = %claims.username,
                required = ?policy.required(),
                "Access denied by role policy"
            );
            Err(AppError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::PasswordHasher;
    use crate::auth::token::DEFAULT_TOKEN_TTL_SECS;
    use crate::users::{InMemoryUserRepository, UserService};

    const TEST_SECRET: &str = "test-secret-key-that-is-at-least-32-chars";

    async fn create_test_service() -> AuthService {
        let repo = Arc::new(InMemoryUserRepository::new());
        let hasher = PasswordHasher::tuned(64, 1, 1).expect("should build hasher");
        let users = Arc::new(UserService::new(repo, hasher));
        let tokens =
            TokenService::new(TEST_SECRET, DEFAULT_TOKEN_TTL_SECS).expect("should build tokens");

        let service = AuthService::new(users, tokens);
        service
            .register(CreateUserRequest {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "password123".to_string(),
                full_name: "Alice Example".to_string(),
            })
            .await
            .expect("should seed user");

        service
    }

    #[tokio::test]
    async fn test_login_issues_a_valid_token() {
        let service = create_test_service().await;

        let response = service
            .login("alice", "password123")
            .await
            .expect("should log in");
        assert_eq!(response.user.username, "alice");

        let claims = service
            .authenticate(&response.token)
            .expect("issued token should validate");
        assert_eq!(claims.sub, response.user.user_id);
        assert_eq!(claims.roles, vec!["user"]);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_fail_the_same_way() {
        let service = create_test_service().await;

        let wrong = service.login("alice", "not-the-password").await;
        let unknown = service.login("ghost", "password123").await;

        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_register_applies_default_roles() {
        let service = create_test_service().await;

        let user = service
            .register(CreateUserRequest {
                username: "bob".to_string(),
                email: "bob@example.com".to_string(),
                password: "password123".to_string(),
                full_name: "Bob Example".to_string(),
            })
            .await
            .expect("should register");

        assert_eq!(user.roles, vec!["user"]);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_garbage() {
        let service = create_test_service().await;

        let result = service.authenticate("not.a.token");

        assert!(matches!(result, Err(AppError::TokenInvalid)));
    }

    #[tokio::test]
    async fn test_authorize_enforces_roles() {
        let service = create_test_service().await;
        let response = service
            .login("alice", "password123")
            .await
            .expect("should log in");
        let claims = service
            .authenticate(&response.token)
            .expect("should validate");

        let open = AuthorizationPolicy::authenticated();
        let user_only = AuthorizationPolicy::require("user");
        let admin_only = AuthorizationPolicy::require("admin");

        assert!(service.authorize(&claims, &open).is_ok());
        assert!(service.authorize(&claims, &user_only).is_ok());
        assert!(matches!(
            service.authorize(&claims, &admin_only),
            Err(AppError::Forbidden)
        ));
    }
}
