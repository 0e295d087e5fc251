use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminWelcomeData {
    pub message: String,
}

pub async fn admin_welcome(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiSuccess<AdminWelcomeData> {
    ApiSuccess::new(
        StatusCode::OK,
        AdminWelcomeData {
            message: format!("Welcome, administrator {}", user.username),
        },
    )
}
