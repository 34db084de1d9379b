use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),

    #[error("Password does not match")]
    Mismatch,

    #[error("Work factor 2^{requested} is below the minimum of 2^{minimum}")]
    WeakCost { requested: u32, minimum: u32 },
}
