use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Session token claims.
///
/// `sub` and `exp` are mandatory: a payload missing either, or carrying them
/// with the wrong JSON type, does not deserialize and the token is rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,

    /// Opaque role attribute, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Opaque tenant attribute, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
}

impl Claims {
    /// Create claims for a subject with no expiry set yet.
    ///
    /// [`JwtHandler::issue`](super::JwtHandler::issue) fills in `iat` and `exp`.
    pub fn new(sub: impl ToString) -> Self {
        Self {
            sub: sub.to_string(),
            exp: 0,
            iat: 0,
            role: None,
            tenant: None,
        }
    }

    /// Create claims for a user that expire `ttl` from now.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `ttl` - Time until the token expires
    pub fn for_user(user_id: impl ToString, ttl: Duration) -> Self {
        Self::new(user_id).valid_for(Utc::now().timestamp(), ttl)
    }

    /// Stamp `iat = now` and `exp = now + ttl`.
    pub fn valid_for(mut self, now: i64, ttl: Duration) -> Self {
        self.iat = now;
        self.exp = now + ttl.num_seconds();
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = iat;
        self
    }

    /// Set role attribute.
    pub fn with_role(mut self, role: impl ToString) -> Self {
        self.role = Some(role.to_string());
        self
    }

    /// Set tenant attribute.
    pub fn with_tenant(mut self, tenant: impl ToString) -> Self {
        self.tenant = Some(tenant.to_string());
        self
    }

    /// Check if token is expired.
    ///
    /// A token is only valid while its expiry is strictly in the future.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}
