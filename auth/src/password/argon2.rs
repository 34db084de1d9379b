use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Salted one-way hashing with Argon2id. The work factor is expressed as a
/// power of two: memory cost is `2^cost` KiB.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Work factor used by [`PasswordHasher::new`] (16 MiB).
    pub const DEFAULT_COST: u32 = 14;
    /// Lowest accepted work factor.
    pub const MIN_COST: u32 = 10;
    /// Highest accepted work factor (4 GiB).
    pub const MAX_COST: u32 = 22;

    const TIME_COST: u32 = 2;
    const PARALLELISM: u32 = 1;

    /// Create a new password hasher with the default work factor.
    ///
    /// # Returns
    /// PasswordHasher instance configured with secure defaults
    pub fn new() -> Self {
        Self {
            params: Self::params_for(Self::DEFAULT_COST)
                .unwrap_or_else(|_| Params::default()),
        }
    }

    /// Create a password hasher with an explicit work factor.
    ///
    /// # Arguments
    /// * `cost` - Base two logarithm of the Argon2 memory cost in KiB
    ///
    /// # Errors
    /// * `WeakCost` - `cost` is below [`PasswordHasher::MIN_COST`]
    /// * `HashingFailed` - `cost` is above [`PasswordHasher::MAX_COST`]
    pub fn with_cost(cost: u32) -> Result<Self, PasswordError> {
        if cost < Self::MIN_COST {
            return Err(PasswordError::WeakCost {
                requested: cost,
                minimum: Self::MIN_COST,
            });
        }
        if cost > Self::MAX_COST {
            return Err(PasswordError::HashingFailed(format!(
                "work factor 2^{} exceeds the maximum of 2^{}",
                cost,
                Self::MAX_COST
            )));
        }

        Ok(Self {
            params: Self::params_for(cost)?,
        })
    }

    fn params_for(cost: u32) -> Result<Params, PasswordError> {
        Params::new(1 << cost, Self::TIME_COST, Self::PARALLELISM, None)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password securely.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// Parameters are read back from the PHC string, so hashes produced
    /// with a different work factor still verify.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Hash format is invalid
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Compare a plaintext password with a stored hash.
    ///
    /// # Errors
    /// * `Mismatch` - The password does not reproduce the hash
    /// * `VerificationFailed` - Hash format is invalid
    pub fn compare(&self, hash: &str, password: &str) -> Result<(), PasswordError> {
        if self.verify(password, hash)? {
            Ok(())
        } else {
            Err(PasswordError::Mismatch)
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
