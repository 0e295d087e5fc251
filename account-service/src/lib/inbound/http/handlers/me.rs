use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::Password;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn get_me(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiSuccess<UserData> {
    ApiSuccess::new(StatusCode::OK, (&user).into())
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let new_password = Password::new(body.new_password).map_err(UserError::from)?;

    state
        .user_service
        .change_password(
            &user.id,
            ChangePasswordCommand {
                current_password: body.current_password,
                new_password,
            },
        )
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

pub async fn delete_me(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<StatusCode, ApiError> {
    state.user_service.delete_user(&user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
