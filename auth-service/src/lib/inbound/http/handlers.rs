use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use serde_json::json;

use super::validation::ValidationErrors;
use crate::user::errors::ClaimsError;
use crate::user::errors::UserError;

pub mod health;
pub mod login;
pub mod logout;
pub mod whoami;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "jwt";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(message, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    ok: bool,
    message: String,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            ok: true,
            message: message.into(),
            data,
        }
    }
}

/// Why a gated request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedReason {
    NoToken,
    InvalidToken,
}

impl UnauthorizedReason {
    fn as_str(&self) -> &'static str {
        match self {
            UnauthorizedReason::NoToken => "no_token",
            UnauthorizedReason::InvalidToken => "invalid_token",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Validation(BTreeMap<String, String>),
    InvalidCredentials,
    Unauthorized(UnauthorizedReason),
    InternalServerError(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors.0)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "validation", "fields": fields })),
            )
                .into_response(),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid credentials" })),
            )
                .into_response(),
            ApiError::Unauthorized(reason) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized", "reason": reason.as_str() })),
            )
                .into_response(),
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            // Unknown users and wrong passwords share one response.
            UserError::NotFound(_) | UserError::InvalidCredentials => ApiError::InvalidCredentials,
            UserError::CredentialCheck(_)
            | UserError::TokenIssue(_)
            | UserError::DatabaseError(_)
            | UserError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<ClaimsError> for ApiError {
    fn from(err: ClaimsError) -> Self {
        match err {
            // Handler mounted outside the session gate.
            ClaimsError::NoClaims => ApiError::InternalServerError(err.to_string()),
            ClaimsError::Shape(_) => ApiError::Unauthorized(UnauthorizedReason::InvalidToken),
        }
    }
}
