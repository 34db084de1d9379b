use async_trait::async_trait;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginIdentifier;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for login operations.
#[async_trait]
pub trait LoginServicePort: Send + Sync + 'static {
    /// Check credentials and issue a session token.
    ///
    /// # Arguments
    /// * `command` - Identifier and plaintext password
    ///
    /// # Returns
    /// The user and the signed token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown identifier or wrong password, indistinguishably
    /// * `CredentialCheck` - Stored hash unusable or hashing failed
    /// * `TokenIssue` - Signing failed
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, UserError>;

    /// Retrieve user by username or email, with a single query.
    ///
    /// # Arguments
    /// * `identifier` - Parsed login identifier
    ///
    /// # Errors
    /// * `NotFound` - No matching user
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username_or_email(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<User, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;
}

/// Read access to the credential store.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
}
