use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenError;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT generation.
///
/// Holds the only copy of the signing secret; it is immutable after construction
/// and the coordinator is shared across requests behind an `Arc`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    decoy_hash: String,
}

/// Plaintext behind the decoy hash checked for unknown accounts.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
    /// Claims embedded in the token
    pub claims: Claims,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator with the default password work factor.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    ///
    /// # Errors
    /// * `JwtError::MissingSecret` - The secret is empty
    /// * `PasswordError` - The decoy hash could not be computed
    pub fn new(jwt_secret: &[u8]) -> Result<Self, AuthenticationError> {
        Self::with_hasher(jwt_secret, PasswordHasher::new())
    }

    /// Create an authenticator with an explicit password hasher.
    ///
    /// Hashes a decoy password once, at the hasher's cost, for
    /// [`reject_unknown_account`](Self::reject_unknown_account).
    pub fn with_hasher(
        jwt_secret: &[u8],
        password_hasher: PasswordHasher,
    ) -> Result<Self, AuthenticationError> {
        let jwt_handler = JwtHandler::new(jwt_secret)?;
        let decoy_hash = password_hasher.hash(DECOY_PASSWORD)?;

        Ok(Self {
            password_hasher,
            jwt_handler,
            decoy_hash,
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a JWT token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `claims` - Claims to embed; `iat`/`exp` are stamped here
    /// * `ttl` - Token lifetime
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is unusable
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        claims: Claims,
        ttl: Duration,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        match self.password_hasher.compare(stored_hash, password) {
            Ok(()) => {}
            Err(PasswordError::Mismatch) => return Err(AuthenticationError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        }

        let (access_token, claims) = self.jwt_handler.issue_with_claims(claims, ttl)?;

        Ok(AuthenticationResult {
            access_token,
            claims,
        })
    }

    /// Fail a login for an account that does not exist.
    ///
    /// Runs the same Argon2 verification a known account would, against the
    /// decoy hash, so both failures take comparable time. Always ends in
    /// `InvalidCredentials`.
    pub fn reject_unknown_account(&self, password: &str) -> AuthenticationError {
        // The outcome is irrelevant; only the work matters.
        let _ = self.password_hasher.verify(password, &self.decoy_hash);
        AuthenticationError::InvalidCredentials
    }

    /// Issue a token without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn generate_token(&self, claims: Claims, ttl: Duration) -> Result<String, JwtError> {
        self.jwt_handler.issue(claims, ttl)
    }

    /// Validate and decode a JWT token.
    ///
    /// # Errors
    /// * `TokenError` - Token is malformed, forged, or expired
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.jwt_handler.verify(token)
    }
}
