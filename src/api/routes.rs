use crate::auth::{AuthorizationPolicy, AuthService};
use crate::AppState;
use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Builds the `/api` router: a public part merged with a token-gated part,
/// with the admin-only routes additionally behind a role gate.
pub fn create_router(auth_service: Arc<AuthService>) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/auth/register", post(crate::api::handlers::auth::register))
        .route("/auth/login", post(crate::api::handlers::auth::login));

    let admin_routes = Router::new()
        // Admin-role routes
        .route("/auth/admin", get(crate::api::handlers::auth::admin_area))
        .route(
            "/users",
            get(crate::api::handlers::users::list_users)
                .post(crate::api::handlers::users::create_user),
        )
        .layer(middleware::from_fn({
            let auth_service = auth_service.clone();
            move |req: Request, next: Next| {
                crate::auth::middleware::authorize_middleware(
                    auth_service.clone(),
                    AuthorizationPolicy::require("admin"),
                    req,
                    next,
                )
            }
        }));

    let protected_routes = Router::new()
        // Protected routes (auth required)
        .route("/auth/profile", get(crate::api::handlers::auth::profile))
        .merge(admin_routes)
        .layer(middleware::from_fn(move |req: Request, next: Next| {
            crate::auth::middleware::auth_middleware(auth_service.clone(), req, next)
        }));

    public_routes.merge(protected_routes)
}
