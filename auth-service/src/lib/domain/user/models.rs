use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::UserIdError;

/// User record as stored in the credential store.
///
/// Read-only for this service; accounts are created elsewhere.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub display_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Arguments
    /// * `s` - UUID string to parse
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username as held by the credential store.
///
/// Accounts are created elsewhere, so stored values are taken as they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address as held by the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// How a login identifier is looked up.
///
/// Anything containing `@` is treated as an email address, everything
/// else as a username. No syntax checks are applied: an identifier that
/// matches nothing simply fails the lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Email(String),
    Username(String),
}

impl LoginIdentifier {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.contains('@') {
            LoginIdentifier::Email(input.to_string())
        } else {
            LoginIdentifier::Username(input.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LoginIdentifier::Email(value) | LoginIdentifier::Username(value) => value,
        }
    }

    /// Lookup kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            LoginIdentifier::Email(_) => "email",
            LoginIdentifier::Username(_) => "username",
        }
    }
}

/// Credentials presented at login.
pub struct LoginCommand {
    pub identifier: LoginIdentifier,
    pub password: String,
}

impl LoginCommand {
    pub fn new(identifier: LoginIdentifier, password: String) -> Self {
        Self {
            identifier,
            password,
        }
    }
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login: the user and the session token issued for it.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
    pub claims: auth::Claims,
}

impl LoginOutcome {
    /// Seconds until the issued token expires.
    pub fn expires_in(&self, now: i64) -> i64 {
        (self.claims.exp - now).max(0)
    }
}
