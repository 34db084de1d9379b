use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;
use axum_extra::extract::CookieJar;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::SESSION_COOKIE;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginIdentifier;
use crate::domain::user::models::User;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::validate;
use crate::inbound::http::validation::FieldRule;
use crate::inbound::http::validation::Validate;
use crate::inbound::http::validation::ValidationErrors;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<(CookieJar, ApiSuccess<LoginResponseData>), ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Login body rejected");
        ApiError::from(ValidationErrors::default())
    })?;
    let command = body.try_into_command()?;

    let outcome = state
        .login_service
        .login(command)
        .await
        .map_err(ApiError::from)?;

    let max_age = outcome.expires_in(Utc::now().timestamp());
    let cookie = Cookie::build((SESSION_COOKIE, outcome.token.clone()))
        .http_only(true)
        .path("/")
        .secure(state.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age));

    Ok((
        jar.add(cookie),
        ApiSuccess::new(StatusCode::OK, "Login successful", (&outcome.user).into()),
    ))
}

/// HTTP request body for login (raw JSON).
///
/// Fields are optional so that missing ones surface as validation
/// messages rather than a deserialization failure.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    #[serde(default)]
    username_or_email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl std::fmt::Debug for LoginRequestBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequestBody")
            .field("username_or_email", &self.username_or_email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Validate for LoginRequestBody {
    const RULES: &'static [FieldRule] = &[
        FieldRule::required("username_or_email"),
        FieldRule::required("password"),
    ];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "username_or_email" => self.username_or_email.as_deref(),
            "password" => self.password.as_deref(),
            _ => None,
        }
    }
}

impl LoginRequestBody {
    fn try_into_command(self) -> Result<LoginCommand, ValidationErrors> {
        validate(&self)?;

        let identifier = LoginIdentifier::parse(self.username_or_email.as_deref().unwrap_or_default());
        let password = self.password.unwrap_or_default();
        Ok(LoginCommand::new(identifier, password))
    }
}

/// Public user fields returned after login. Never includes the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<&User> for LoginResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
        }
    }
}
