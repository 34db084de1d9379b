use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UnauthorizedReason;
use crate::domain::user::models::User;
use crate::inbound::http::middleware::Session;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn whoami(
    State(state): State<AppState>,
    session: Session,
) -> Result<ApiSuccess<WhoAmIResponseData>, ApiError> {
    let user = state
        .login_service
        .get_user(&session.user_id)
        .await
        .map_err(|e| match e {
            UserError::NotFound(_) => {
                tracing::warn!(user_id = %session.user_id, "Session refers to a missing user");
                ApiError::Unauthorized(UnauthorizedReason::InvalidToken)
            }
            _ => ApiError::from(e),
        })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "Authenticated",
        WhoAmIResponseData::new(&user, &session),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhoAmIResponseData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
}

impl WhoAmIResponseData {
    fn new(user: &User, session: &Session) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            display_name: user.display_name.clone(),
            expires_at: session.expires_at,
            role: session.role.clone(),
            tenant: session.tenant.clone(),
        }
    }
}
