use std::sync::Arc;

use auth::Authenticator;
use auth::Claims;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::request::Parts;
use axum::http::Extensions;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::CookieJar;
use chrono::DateTime;
use chrono::Utc;

use super::handlers::ApiError;
use super::handlers::UnauthorizedReason;
use super::handlers::SESSION_COOKIE;
use crate::domain::user::models::UserId;
use crate::user::errors::ClaimsError;

/// Verified token claims, stored in request extensions by [`require_session`].
#[derive(Debug, Clone)]
pub struct SessionClaims(pub Claims);

/// Typed view of the session claims for downstream handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub role: Option<String>,
    pub tenant: Option<String>,
}

impl Session {
    /// Read the session placed on the request by the gate.
    ///
    /// # Errors
    /// * `NoClaims` - The request did not pass through [`require_session`]
    /// * `Shape` - Subject or expiry cannot be interpreted
    pub fn from_extensions(extensions: &Extensions) -> Result<Self, ClaimsError> {
        let SessionClaims(claims) = extensions
            .get::<SessionClaims>()
            .ok_or(ClaimsError::NoClaims)?;

        Self::try_from(claims)
    }
}

impl TryFrom<&Claims> for Session {
    type Error = ClaimsError;

    fn try_from(claims: &Claims) -> Result<Self, Self::Error> {
        let user_id = UserId::from_string(&claims.sub)
            .map_err(|e| ClaimsError::Shape(format!("sub: {}", e)))?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| ClaimsError::Shape(format!("exp out of range: {}", claims.exp)))?;

        Ok(Self {
            user_id,
            expires_at,
            role: claims.role.clone(),
            tenant: claims.tenant.clone(),
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Session::from_extensions(&parts.extensions).map_err(|e| {
            tracing::warn!(error = %e, "Session claims unavailable");
            ApiError::from(e)
        })
    }
}

/// Middleware that verifies the session cookie and exposes its claims
/// to the wrapped handlers.
pub async fn require_session(
    State(authenticator): State<Arc<Authenticator>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            tracing::debug!(path = %req.uri().path(), "Rejected request without session cookie");
            ApiError::Unauthorized(UnauthorizedReason::NoToken)
        })?;

    let claims = authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(
            path = %req.uri().path(),
            reason = e.kind(),
            "Session token rejected"
        );
        ApiError::Unauthorized(UnauthorizedReason::InvalidToken)
    })?;

    req.extensions_mut().insert(SessionClaims(claims));

    Ok(next.run(req).await)
}
