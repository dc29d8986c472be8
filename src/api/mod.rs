//! HTTP API surface
//!
//! Routes:
//! - `POST /api/auth/register` - create an account with the default role
//! - `POST /api/auth/login` - exchange credentials for a bearer token
//! - `GET /api/auth/profile` - claims of the presented token (auth required)
//! - `GET /api/auth/admin` - admin landing payload (admin role required)
//! - `GET /api/users` - list accounts (admin role required)
//! - `POST /api/users` - create an account with explicit roles (admin role required)
//! - `GET /health` - liveness probe
//! - `GET /api-docs/openapi.json` - OpenAPI document

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

use axum::{routing::get, Json, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::types::{
    AdminAreaResponse, AdminCreateUserRequest, Claims, CreateUserRequest, LoginRequest,
    LoginResponse, SanitizedUser,
};
use crate::AppState;

// Re-exports
pub use routes::create_router;

/// OpenAPI document for the HTTP surface, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::auth::register,
        handlers::auth::profile,
        handlers::auth::admin_area,
        handlers::users::list_users,
        handlers::users::create_user,
    ),
    components(schemas(
        LoginRequest,
        LoginResponse,
        CreateUserRequest,
        AdminCreateUserRequest,
        AdminAreaResponse,
        SanitizedUser,
        Claims,
    )),
    tags(
        (name = "auth", description = "Login, registration and token-gated profile routes"),
        (name = "users", description = "Administrative account management"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Assembles the full application: API routes nested under `/api`, the health
/// and OpenAPI routes at the root, and the trace and CORS layers.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", routes::create_router(state.auth_service.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
