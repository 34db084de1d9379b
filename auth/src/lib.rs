//! Authentication utilities library
//!
//! Provides the authentication primitives used by the service:
//! - Password hashing (Argon2id with a power-of-two work factor)
//! - Session token issuing and verification (HS256, algorithm pinned)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_cost(10).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.compare(&hash, "my_password").is_ok());
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{Claims, JwtHandler};
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let token = handler.issue(Claims::new("user123"), Duration::hours(24)).unwrap();
//! let claims = handler.verify(&token).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Claims};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//!
//! let hash = auth.hash_password("password123").unwrap();
//!
//! let result = auth
//!     .authenticate("password123", &hash, Claims::new("user123"), Duration::hours(24))
//!     .unwrap();
//!
//! let decoded = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(decoded.sub, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenError;
pub use password::PasswordError;
pub use password::PasswordHasher;
