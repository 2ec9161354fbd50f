//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Invalid email address format
    #[error("Invalid email address: {0}")]
    InvalidEmailAddress(String),

    /// Identifier could not be parsed
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// Unknown album type label
    #[error("Invalid album type: {0}")]
    InvalidAlbumType(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_album_type_message() {
        let err = DomainError::InvalidAlbumType("CASSETTE".to_string());
        assert_eq!(err.to_string(), "Invalid album type: CASSETTE");
    }

    #[test]
    fn invalid_email_message() {
        let err = DomainError::InvalidEmailAddress("nobody".to_string());
        assert_eq!(err.to_string(), "Invalid email address: nobody");
    }
}
