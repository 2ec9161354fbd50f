//! Application-level errors

use domain::DomainError;
use thiserror::Error;

use crate::db_error::{DatabaseError, DbErrorCode};

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Recognized database failure
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Requested resource does not exist; the message is user-facing
    #[error("{0}")]
    NotFound(String),

    /// Operation refused in the current state; the message is user-facing
    #[error("{0}")]
    InvalidOperation(String),

    /// User not authenticated or credentials rejected
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// `"Genre not found"` style error
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{entity} not found"))
    }

    /// The recognized database error carried by this error, if any
    #[must_use]
    pub const fn as_database(&self) -> Option<&DatabaseError> {
        match self {
            Self::Database(err) => Some(err),
            _ => None,
        }
    }

    /// Whether this is a database error with the given code
    #[must_use]
    pub fn is_db_code(&self, code: &DbErrorCode) -> bool {
        self.as_database().is_some_and(|err| &err.code == code)
    }
}
