//! Helpers shared by the sqlx stores

use std::str::FromStr;

use application::{ApplicationError, DatabaseError, ListQuery};
use chrono::{DateTime, SecondsFormat, Utc};
use domain::{Creator, DomainError, EmailAddress, UserId};
use sqlx::{SqliteConnection, sqlite::SqliteQueryResult};

use super::error::map_sqlx_error;

/// Fixed-width UTC RFC3339, so stored timestamps sort as text
pub(crate) fn timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn optional_timestamp(dt: Option<&DateTime<Utc>>) -> Option<String> {
    dt.map(timestamp)
}

/// Parse an RFC3339 datetime string
pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, ApplicationError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ApplicationError::Internal(format!("Invalid datetime: {e}")))
}

pub(crate) fn parse_optional_datetime(
    s: Option<&str>,
) -> Result<Option<DateTime<Utc>>, ApplicationError> {
    s.map(parse_datetime).transpose()
}

/// Parse a stored identifier
pub(crate) fn parse_id<T>(s: &str) -> Result<T, ApplicationError>
where
    T: FromStr<Err = DomainError>,
{
    s.parse()
        .map_err(|e| ApplicationError::Internal(format!("Invalid stored id: {e}")))
}

/// `%term%` for a LIKE filter, with wildcards in the term escaped
///
/// Use together with `ESCAPE '\'`. `None` when the query has no search term.
pub(crate) fn like_pattern(query: &ListQuery) -> Option<String> {
    query.search_term().map(|term| {
        let mut pattern = String::with_capacity(term.len() + 2);
        pattern.push('%');
        for ch in term.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    })
}

/// LIMIT and OFFSET binds for a list query
pub(crate) fn limit_offset(query: &ListQuery) -> (i64, i64) {
    (
        i64::from(query.limit),
        i64::try_from(query.skip()).unwrap_or(i64::MAX),
    )
}

pub(crate) fn count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or_default()
}

/// Fail with `RecordNotFound` when a write touched no row
pub(crate) fn require_affected(result: &SqliteQueryResult) -> Result<(), ApplicationError> {
    if result.rows_affected() == 0 {
        return Err(DatabaseError::record_not_found().into());
    }
    Ok(())
}

/// Creator columns joined from `users`
pub(crate) fn creator(
    id: &str,
    name: Option<String>,
    email: String,
) -> Result<Creator, ApplicationError> {
    Ok(Creator {
        id: parse_id::<UserId>(id)?,
        name,
        email: EmailAddress::from_stored(email),
    })
}

/// Insert `(owner, target)` rows into a join table
///
/// A dangling target id fails with a foreign-key violation.
pub(crate) async fn insert_links<I>(
    conn: &mut SqliteConnection,
    table: &str,
    owner_column: &str,
    owner_id: &str,
    target_column: &str,
    target_ids: I,
) -> Result<(), ApplicationError>
where
    I: IntoIterator<Item = String>,
{
    let statement = format!(
        "INSERT OR IGNORE INTO {table} ({owner_column}, {target_column}) VALUES ($1, $2)"
    );
    for target_id in target_ids {
        sqlx::query(&statement)
            .bind(owner_id)
            .bind(target_id)
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_has_no_pattern() {
        assert!(like_pattern(&ListQuery::new(1, 10, "   ")).is_none());
    }

    #[test]
    fn search_pattern_escapes_wildcards() {
        let pattern = like_pattern(&ListQuery::new(1, 10, " 100%_rock ")).unwrap();
        assert_eq!(pattern, r"%100\%\_rock%");
    }

    #[test]
    fn limit_offset_from_page() {
        assert_eq!(limit_offset(&ListQuery::new(3, 20, "")), (20, 40));
        assert_eq!(limit_offset(&ListQuery::default()), (10, 0));
    }

    #[test]
    fn timestamps_sort_as_text() {
        let earlier = parse_datetime("2024-05-01T10:00:00Z").unwrap();
        let later = parse_datetime("2024-05-01T10:00:00.5Z").unwrap();
        assert_eq!(timestamp(&earlier), "2024-05-01T10:00:00.000000Z");
        assert!(timestamp(&earlier) < timestamp(&later));
    }

    #[test]
    fn datetime_round_trip_and_garbage() {
        let now = parse_datetime("2023-11-14T22:13:20.123456Z").unwrap();
        assert_eq!(parse_datetime(&timestamp(&now)).unwrap(), now);
        assert!(parse_datetime("yesterday").is_err());
        assert_eq!(parse_optional_datetime(None).unwrap(), None);
    }

    #[test]
    fn bad_stored_id_is_internal() {
        let err = parse_id::<UserId>("nope").unwrap_err();
        assert!(matches!(err, ApplicationError::Internal(_)));
    }
}
