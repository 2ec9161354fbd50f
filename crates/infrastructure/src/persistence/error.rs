//! Translation of sqlx/SQLite errors into recognized database errors
//!
//! SQLite reports constraint violations through extended result codes and a
//! message naming the offending columns or constraint:
//!
//! | code | message                                          |
//! |------|--------------------------------------------------|
//! | 2067 | `UNIQUE constraint failed: genres.slug`          |
//! | 1555 | `UNIQUE constraint failed: users.id`             |
//! |  275 | `CHECK constraint failed: genres_name_length`    |
//! |  787 | `FOREIGN KEY constraint failed`                  |
//! | 1299 | `NOT NULL constraint failed: songs.album_id`     |
//!
//! CHECK constraints are named `<table>_<column>_<rule>`; a `_length` rule
//! is a length limit.

use application::{ApplicationError, DatabaseError, DbErrorCode};
use tracing::debug;

const SQLITE_CONSTRAINT_CHECK: &str = "275";
const SQLITE_CONSTRAINT_FOREIGNKEY: &str = "787";
const SQLITE_CONSTRAINT_NOTNULL: &str = "1299";
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";

const LENGTH_RULE_SUFFIX: &str = "_length";

/// Map a sqlx error to an application-layer error
pub fn map_sqlx_error(e: sqlx::Error) -> ApplicationError {
    match e {
        sqlx::Error::RowNotFound => DatabaseError::record_not_found().into(),
        sqlx::Error::Database(db_err) => match db_err.code() {
            Some(code) => translate(&code, db_err.message()).into(),
            None => ApplicationError::Internal(format!("Database error: {db_err}")),
        },
        other => ApplicationError::Internal(format!("Database error: {other}")),
    }
}

/// Translate an SQLite extended result code and message
pub fn translate(code: &str, message: &str) -> DatabaseError {
    debug!(code, message, "Translating database error");

    let error = match code {
        SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY => {
            DatabaseError::new(DbErrorCode::UniqueConstraint).with_columns(columns(message))
        },
        SQLITE_CONSTRAINT_CHECK => {
            let constraint = detail(message).unwrap_or_default();
            match constraint.strip_suffix(LENGTH_RULE_SUFFIX) {
                Some(rule) => {
                    let error = DatabaseError::new(DbErrorCode::ValueTooLong);
                    match rule.split_once('_') {
                        Some((_, column)) if !column.is_empty() => error.with_column(column),
                        _ => error,
                    }
                },
                None => DatabaseError::new(DbErrorCode::ConstraintFailed),
            }
        },
        SQLITE_CONSTRAINT_FOREIGNKEY => DatabaseError::new(DbErrorCode::ForeignKeyConstraint),
        SQLITE_CONSTRAINT_NOTNULL => {
            let column = columns(message).into_iter().next().unwrap_or_default();
            let code = if column.ends_with("_id") {
                DbErrorCode::MissingRequiredValue
            } else {
                DbErrorCode::NullConstraint
            };
            let error = DatabaseError::new(code);
            if column.is_empty() {
                error
            } else {
                error.with_column(column)
            }
        },
        other => DatabaseError::new(DbErrorCode::Unrecognized(other.to_string())),
    };

    error.with_message(message)
}

/// Text after the `constraint failed:` prefix
fn detail(message: &str) -> Option<&str> {
    message
        .split_once(": ")
        .map(|(_, rest)| rest.trim())
        .filter(|rest| !rest.is_empty())
}

/// Column names from `t.a, t.b`, table prefix stripped
fn columns(message: &str) -> Vec<String> {
    detail(message)
        .map(|list| {
            list.split(',')
                .map(|qualified| {
                    let qualified = qualified.trim();
                    qualified
                        .rsplit_once('.')
                        .map_or(qualified, |(_, column)| column)
                        .to_string()
                })
                .filter(|column| !column.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
