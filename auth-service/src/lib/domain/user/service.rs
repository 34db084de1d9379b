use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Claims;
use chrono::Duration;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginIdentifier;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::LoginServicePort;
use crate::user::ports::UserRepository;

/// Login orchestrator.
///
/// Lookup, password check and token issuing, in that order, with no retries.
pub struct LoginService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    token_ttl: Duration,
}

impl<UR> LoginService<UR>
where
    UR: UserRepository,
{
    /// Create a new login service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store
    /// * `authenticator` - Password verification and token signing
    /// * `token_ttl` - Lifetime of issued session tokens
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>, token_ttl: Duration) -> Self {
        Self {
            repository,
            authenticator,
            token_ttl,
        }
    }
}

#[async_trait]
impl<UR> LoginServicePort for LoginService<UR>
where
    UR: UserRepository,
{
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, UserError> {
        let LoginCommand {
            identifier,
            password,
        } = command;

        let user = match self.find_by_username_or_email(&identifier).await {
            Ok(user) => user,
            Err(UserError::NotFound(_)) => {
                // Pay for a password check anyway so timing matches a wrong password.
                let authenticator = Arc::clone(&self.authenticator);
                let err = tokio::task::spawn_blocking(move || {
                    authenticator.reject_unknown_account(&password)
                })
                .await
                .map_err(|e| UserError::Unknown(format!("Authentication task failed: {}", e)))?;

                tracing::info!(
                    lookup = identifier.kind(),
                    reason = "unknown_identifier",
                    "Login rejected"
                );
                return Err(UserError::from(err));
            }
            Err(e) => return Err(e),
        };

        // Argon2 is CPU bound; keep it off the async workers.
        let authenticator = Arc::clone(&self.authenticator);
        let stored_hash = user.password_hash.clone();
        let claims = Claims::new(user.id);
        let ttl = self.token_ttl;
        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &stored_hash, claims, ttl)
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Authentication task failed: {}", e)))?;

        let result = result.map_err(|e| {
            let err = UserError::from(e);
            match &err {
                UserError::InvalidCredentials => tracing::info!(
                    user_id = %user.id,
                    reason = "wrong_password",
                    "Login rejected"
                ),
                other => tracing::error!(user_id = %user.id, error = %other, "Login failed"),
            }
            err
        })?;

        tracing::info!(user_id = %user.id, expires_at = result.claims.exp, "Login succeeded");

        Ok(LoginOutcome {
            user,
            token: result.access_token,
            claims: result.claims,
        })
    }

    async fn find_by_username_or_email(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<User, UserError> {
        let found = match identifier {
            LoginIdentifier::Email(email) => self.repository.find_by_email(email).await?,
            LoginIdentifier::Username(username) => {
                self.repository.find_by_username(username).await?
            }
        };

        found.ok_or_else(|| UserError::NotFound(identifier.as_str().to_string()))
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use auth::PasswordHasher;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Username;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        let hasher = PasswordHasher::with_cost(PasswordHasher::MIN_COST).unwrap();
        Arc::new(Authenticator::with_hasher(SECRET, hasher).unwrap())
    }

    fn alice(authenticator: &Authenticator) -> User {
        User {
            id: UserId::new(),
            username: Username::new("alice"),
            email: EmailAddress::new("alice@example.com"),
            display_name: "Alice".to_string(),
            password_hash: authenticator.hash_password("correct-pw").unwrap(),
            created_at: Utc::now(),
        }
    }

    fn command(identifier: &str, password: &str) -> LoginCommand {
        LoginCommand::new(LoginIdentifier::parse(identifier), password.to_string())
    }

    fn service(
        repository: MockTestUserRepository,
        authenticator: Arc<Authenticator>,
    ) -> LoginService<MockTestUserRepository> {
        LoginService::new(Arc::new(repository), authenticator, Duration::hours(24))
    }

    #[tokio::test]
    async fn test_login_by_email_success() {
        let authenticator = authenticator();
        let user = alice(&authenticator);
        let user_id = user.id;

        let mut repository = MockTestUserRepository::new();
        let returned_user = user.clone();
        repository
            .expect_find_by_email()
            .withf(|email| email == "alice@example.com")
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));
        repository.expect_find_by_username().times(0);

        let service = service(repository, Arc::clone(&authenticator));
        let outcome = service
            .login(command("alice@example.com", "correct-pw"))
            .await
            .expect("login should succeed");

        assert_eq!(outcome.user.id, user_id);
        assert_eq!(outcome.claims.sub, user_id.to_string());
        assert_eq!(outcome.claims.exp - outcome.claims.iat, 24 * 60 * 60);

        let verified = authenticator.validate_token(&outcome.token).unwrap();
        assert_eq!(verified.sub, user_id.to_string());
    }

    #[tokio::test]
    async fn test_login_by_username_issues_single_query() {
        let authenticator = authenticator();
        let user = alice(&authenticator);

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .withf(|username| username == "alice")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        repository.expect_find_by_email().times(0);

        let service = service(repository, authenticator);
        assert!(service.login(command("alice", "correct-pw")).await.is_ok());
    }

    #[tokio::test]
    async fn test_login_with_unconventional_stored_username() {
        let authenticator = authenticator();
        let mut user = alice(&authenticator);
        user.username = Username::new("john.doe");

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .withf(|username| username == "john.doe")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(repository, authenticator);
        let outcome = service
            .login(command("john.doe", "correct-pw"))
            .await
            .expect("login should succeed");

        assert_eq!(outcome.user.username.as_str(), "john.doe");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let authenticator = authenticator();
        let user = alice(&authenticator);

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(repository, authenticator);
        let result = service.login(command("alice", "wrong-pw")).await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_invalid_credentials() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(repository, authenticator());
        let result = service.login(command("nobody@example.com", "whatever")).await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_user_takes_as_long_as_wrong_password() {
        let hasher = PasswordHasher::with_cost(12).unwrap();
        let authenticator = Arc::new(Authenticator::with_hasher(SECRET, hasher).unwrap());
        let user = alice(&authenticator);

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .returning(move |_| Ok(Some(user.clone())));
        repository.expect_find_by_email().returning(|_| Ok(None));

        let service = service(repository, authenticator);

        let started = std::time::Instant::now();
        for _ in 0..3 {
            let result = service.login(command("alice", "wrong-pw")).await;
            assert!(matches!(result, Err(UserError::InvalidCredentials)));
        }
        let wrong_password = started.elapsed();

        let started = std::time::Instant::now();
        for _ in 0..3 {
            let result = service.login(command("nobody@example.com", "wrong-pw")).await;
            assert!(matches!(result, Err(UserError::InvalidCredentials)));
        }
        let unknown_user = started.elapsed();

        assert!(
            unknown_user * 4 >= wrong_password,
            "unknown user took {:?}, wrong password took {:?}",
            unknown_user,
            wrong_password
        );
    }

    #[tokio::test]
    async fn test_login_database_error_propagates() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection reset".to_string())));

        let service = service(repository, authenticator());
        let result = service.login(command("alice", "correct-pw")).await;

        assert!(matches!(result, Err(UserError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_login_corrupt_stored_hash() {
        let authenticator = authenticator();
        let mut user = alice(&authenticator);
        user.password_hash = "plaintext-oops".to_string();

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(repository, authenticator);
        let result = service.login(command("alice", "plaintext-oops")).await;

        assert!(matches!(result, Err(UserError::CredentialCheck(_))));
    }

    #[tokio::test]
    async fn test_find_by_username_or_email_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(repository, authenticator());
        let result = service
            .find_by_username_or_email(&LoginIdentifier::parse("ghost"))
            .await;

        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let authenticator = authenticator();
        let user = alice(&authenticator);
        let user_id = user.id;

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(repository, authenticator);
        let found = service.get_user(&user_id).await.unwrap();
        assert_eq!(found.username.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(repository, authenticator());
        let result = service.get_user(&UserId::new()).await;

        assert!(matches!(result, Err(UserError::NotFound(_))));
    }
}
