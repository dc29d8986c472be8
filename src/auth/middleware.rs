use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use super::policy::AuthorizationPolicy;
use super::service::AuthService;
use crate::types::{AppError, Claims, Result};

/// Token gate for protected routes.
///
/// Reads the `Authorization: Bearer <token>` header, validates the token,
/// and stores the claims in request extensions for handlers and later
/// layers. A missing or malformed header fails exactly like a bad token.
/// Routers attach it through `middleware::from_fn` with the service
/// captured by the closure.
pub async fn auth_middleware(
    auth_service: Arc<AuthService>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::TokenInvalid)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::TokenInvalid)?;

    let claims = auth_service.authenticate(token)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Role gate for routes that need more than a valid token.
///
/// Must run inside [`auth_middleware`], which stores the claims this
/// reads. Routers compose it through `middleware::from_fn` with the
/// policy captured by the closure.
pub async fn authorize_middleware(
    auth_service: Arc<AuthService>,
    policy: AuthorizationPolicy,
    req: Request,
    next: Next,
) -> Result<Response> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or(AppError::TokenInvalid)?;

    auth_service.authorize(claims, &policy)?;

    Ok(next.run(req).await)
}

/// Handler-side extractor for the claims stored by [`auth_middleware`].
///
/// Rejects with the same error as a missing token when used on a route
/// outside the token gate.
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::TokenInvalid)
    }
}
