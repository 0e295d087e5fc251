use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::errors::AuthFailure;
use crate::user::errors::UserError;

/// Principal resolved from the request's bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Middleware that resolves the bearer token to a principal and stores it
/// in the request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())
        .ok_or(UserError::Unauthenticated(AuthFailure::MissingToken))?;

    let user = state.user_service.resolve_principal(token).await?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Middleware that only lets administrators through. Must run after `authenticate`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .map(|current| &current.0)
        .ok_or(UserError::Unauthenticated(AuthFailure::MissingToken))?;

    user.ensure_role(Role::Admin).map_err(|e| {
        tracing::warn!(user_id = %user.id, "Admin route refused");
        e
    })?;

    Ok(next.run(req).await)
}

/// Extract `<token>` from `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
