//! Recognized database errors
//!
//! Persistence adapters translate driver failures they understand into a
//! [`DatabaseError`]: a closed code plus optional metadata naming the
//! offending column(s). Anything else is reported as
//! [`ApplicationError::Internal`](crate::ApplicationError::Internal).

use std::fmt;

use thiserror::Error;

/// Known database failure codes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DbErrorCode {
    /// Duplicate value on a unique column
    UniqueConstraint,
    /// Value exceeds the column length limit
    ValueTooLong,
    /// Referenced row does not exist
    ForeignKeyConstraint,
    /// Any other constraint failure
    ConstraintFailed,
    /// Null written to a non-null column
    NullConstraint,
    /// Required relation value missing
    MissingRequiredValue,
    /// Required field missing when creating or connecting a record
    MissingRequiredField,
    /// Row targeted by an update or delete does not exist
    RecordNotFound,
    /// Driver code with no entry in the table above
    Unrecognized(String),
}

impl DbErrorCode {
    /// Stable identifier used in logs
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::UniqueConstraint => "unique_constraint",
            Self::ValueTooLong => "value_too_long",
            Self::ForeignKeyConstraint => "foreign_key_constraint",
            Self::ConstraintFailed => "constraint_failed",
            Self::NullConstraint => "null_constraint",
            Self::MissingRequiredValue => "missing_required_value",
            Self::MissingRequiredField => "missing_required_field",
            Self::RecordNotFound => "record_not_found",
            Self::Unrecognized(code) => code,
        }
    }
}

impl fmt::Display for DbErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Offending column(s) reported by the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbErrorTarget {
    Column(String),
    Columns(Vec<String>),
}

impl DbErrorTarget {
    /// The first named column, if any
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Column(column) => Some(column.as_str()),
            Self::Columns(columns) => columns.first().map(String::as_str),
        }
    }
}

/// Extra information attached to a database error
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbErrorMeta {
    pub target: Option<DbErrorTarget>,
}

/// A database failure the persistence layer understood
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct DatabaseError {
    pub code: DbErrorCode,
    pub meta: Option<DbErrorMeta>,
    /// Driver message, kept for diagnostics only
    pub message: Option<String>,
}

impl DatabaseError {
    #[must_use]
    pub const fn new(code: DbErrorCode) -> Self {
        Self {
            code,
            meta: None,
            message: None,
        }
    }

    /// Attach a single offending column
    #[must_use]
    pub fn with_column(self, column: impl Into<String>) -> Self {
        self.with_target(DbErrorTarget::Column(column.into()))
    }

    /// Attach an ordered list of offending columns
    #[must_use]
    pub fn with_columns<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_target(DbErrorTarget::Columns(
            columns.into_iter().map(Into::into).collect(),
        ))
    }

    #[must_use]
    pub fn with_target(mut self, target: DbErrorTarget) -> Self {
        self.meta = Some(DbErrorMeta {
            target: Some(target),
        });
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// First offending column named in the metadata
    #[must_use]
    pub fn target_column(&self) -> Option<&str> {
        self.meta
            .as_ref()
            .and_then(|meta| meta.target.as_ref())
            .and_then(DbErrorTarget::first)
    }

    /// Shorthand for a missing row
    #[must_use]
    pub const fn record_not_found() -> Self {
        Self::new(DbErrorCode::RecordNotFound)
    }
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Database error [{}]", self.code)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_column_takes_first_of_list() {
        let err = DatabaseError::new(DbErrorCode::UniqueConstraint)
            .with_columns(["playlist_id", "song_id"]);
        assert_eq!(err.target_column(), Some("playlist_id"));
    }

    #[test]
    fn target_column_single() {
        let err = DatabaseError::new(DbErrorCode::NullConstraint).with_column("lyrics");
        assert_eq!(err.target_column(), Some("lyrics"));
    }

    #[test]
    fn no_meta_no_target() {
        assert_eq!(DatabaseError::record_not_found().target_column(), None);
    }

    #[test]
    fn empty_column_list_has_no_target() {
        let err = DatabaseError::new(DbErrorCode::UniqueConstraint)
            .with_columns(Vec::<String>::new());
        assert_eq!(err.target_column(), None);
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = DatabaseError::new(DbErrorCode::Unrecognized("1032".to_string()))
            .with_message("attempt to write a readonly database");
        assert_eq!(
            err.to_string(),
            "Database error [1032]: attempt to write a readonly database"
        );
        assert_eq!(
            DatabaseError::record_not_found().to_string(),
            "Database error [record_not_found]"
        );
    }
}
