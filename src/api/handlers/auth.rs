use crate::{
    auth::AuthUser,
    types::{
        AdminAreaResponse, Claims, CreateUserRequest, LoginRequest, LoginResponse, Result,
        SanitizedUser,
    },
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let response = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(response))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = SanitizedUser),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username or email already taken")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<SanitizedUser>)> {
    let user = state.auth_service.register(payload).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Echo the claims of the presented token
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Claims carried by the token", body = Claims),
        (status = 401, description = "Missing, invalid, or expired token")
    ),
    tag = "auth"
)]
pub async fn profile(AuthUser(claims): AuthUser) -> Json<Claims> {
    Json(claims)
}

/// Probe reachable only with the admin role
#[utoipa::path(
    get,
    path = "/api/auth/admin",
    responses(
        (status = 200, description = "Caller holds the admin role", body = AdminAreaResponse),
        (status = 401, description = "Missing, invalid, or expired token"),
        (status = 403, description = "Valid token without the admin role")
    ),
    tag = "auth"
)]
pub async fn admin_area(AuthUser(claims): AuthUser) -> Json<AdminAreaResponse> {
    Json(AdminAreaResponse {
        message: "Welcome, administrator.".to_string(),
        user: claims,
    })
}
