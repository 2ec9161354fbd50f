//! Argon2id password hashing
//!
//! Hashes are stored in PHC string format (`$argon2id$v=19$m=...`), which
//! carries its own salt and parameters.
//!
//! # Examples
//!
//! ```
//! use application::PasswordHasherPort;
//! use infrastructure::adapters::Argon2PasswordHasher;
//!
//! let hasher = Argon2PasswordHasher::new();
//! let hash = hasher.hash("correct horse battery").unwrap();
//!
//! assert!(hasher.verify("correct horse battery", &hash).unwrap());
//! assert!(!hasher.verify("wrong", &hash).unwrap());
//! ```

use application::{ApplicationError, PasswordHasherPort};
use argon2::{
    Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors that can occur while hashing or checking a password
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),

    #[error("Invalid hash format: {0}")]
    InvalidHashFormat(String),
}

impl From<PasswordHashError> for ApplicationError {
    fn from(e: PasswordHashError) -> Self {
        Self::Internal(e.to_string())
    }
}

/// Password hasher using Argon2id with the crate's default parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Whether a stored value looks like a PHC Argon2 hash
    #[must_use]
    pub fn is_hashed(value: &str) -> bool {
        value.starts_with("$argon2")
    }

    fn hash_password(password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))
    }

    fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| PasswordHashError::InvalidHashFormat(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

impl PasswordHasherPort for Argon2PasswordHasher {
    #[instrument(skip_all)]
    fn hash(&self, password: &str) -> Result<String, ApplicationError> {
        let hash = Self::hash_password(password)?;
        debug!("Password hashed");
        Ok(hash)
    }

    #[instrument(skip_all)]
    fn verify(&self, password: &str, hash: &str) -> Result<bool, ApplicationError> {
        let matches = Self::verify_password(password, hash)?;
        debug!(matches, "Password verified");
        Ok(matches)
    }
}
