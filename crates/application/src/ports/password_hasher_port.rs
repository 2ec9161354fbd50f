//! Password hashing port

#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Hashes and verifies user passwords
///
/// Hashing is CPU-bound; callers on the async runtime should expect it to
/// take tens of milliseconds.
#[cfg_attr(test, automock)]
pub trait PasswordHasherPort: Send + Sync {
    /// Produce a self-describing hash string (salt and parameters included)
    fn hash(&self, password: &str) -> Result<String, ApplicationError>;

    /// Check a password against a stored hash
    fn verify(&self, password: &str, hash: &str) -> Result<bool, ApplicationError>;
}
