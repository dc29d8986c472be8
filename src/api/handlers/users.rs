use crate::{
    types::{AdminCreateUserRequest, Result, SanitizedUser},
    users::DEFAULT_ROLES,
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};

/// List every account
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All accounts in creation order", body = [SanitizedUser]),
        (status = 401, description = "Missing, invalid, or expired token"),
        (status = 403, description = "Valid token without the admin role")
    ),
    tag = "users"
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<SanitizedUser>>> {
    let users = state.user_service.find_all().await?;

    Ok(Json(users))
}

/// Create an account, optionally with an explicit role set
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = AdminCreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = SanitizedUser),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Missing, invalid, or expired token"),
        (status = 403, description = "Valid token without the admin role"),
        (status = 409, description = "Username or email already taken")
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<AdminCreateUserRequest>,
) -> Result<(StatusCode, Json<SanitizedUser>)> {
    let (req, roles) = payload.into_parts();
    // Omitted roles fall back to the default; an explicit empty list is
    // rejected by the service.
    let roles =
        roles.unwrap_or_else(|| DEFAULT_ROLES.iter().map(|r| r.to_string()).collect());

    let user = state.user_service.create(req, roles).await?;

    Ok((StatusCode::CREATED, Json(user)))
}
