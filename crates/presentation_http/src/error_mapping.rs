//! Database error classification
//!
//! Handlers pass the [`ApplicationError`] of a failed store call to an
//! [`ErrorClassifier`] configured for the route. Recognized database errors
//! become a `{status, error, details}` payload whose status is one the route
//! declares; every other error is left to the generic error path.
//!
//! ```
//! use application::{ApplicationError, DatabaseError, DbErrorCode};
//! use axum::http::StatusCode;
//! use presentation_http::error_mapping::ErrorClassifier;
//!
//! let classifier = ErrorClassifier::new(&[StatusCode::BAD_REQUEST, StatusCode::CONFLICT])
//!     .entity("genre")
//!     .field("slug", "genre name");
//!
//! let err: ApplicationError = DatabaseError::new(DbErrorCode::UniqueConstraint)
//!     .with_column("slug")
//!     .into();
//! let classified = classifier.classify(&err).unwrap();
//!
//! assert_eq!(classified.status, StatusCode::CONFLICT);
//! assert_eq!(classified.details, "Please check your input (genre name must be unique)");
//! ```

use std::fmt;

use application::{ApplicationError, DatabaseError, DbErrorCode};
use axum::http::StatusCode;
use tracing::error;

use crate::error::ApiError;

/// Entity noun used when a route does not name one
pub const DEFAULT_ENTITY: &str = "item";

/// HTTP-ready description of a database failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: StatusCode,
    pub error: String,
    pub details: String,
}

impl Classification {
    #[must_use]
    pub fn new(status: StatusCode, error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            details: details.into(),
        }
    }
}

/// Replacement handler for one error code
pub type CustomHandler = Box<dyn Fn(&DatabaseError) -> Classification + Send + Sync>;

/// Per-route translation of database errors into responses
pub struct ErrorClassifier {
    allowed: Vec<StatusCode>,
    entity: String,
    fields: Vec<(String, String)>,
    custom: Vec<(DbErrorCode, CustomHandler)>,
}

impl fmt::Debug for ErrorClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorClassifier")
            .field("allowed", &self.allowed)
            .field("entity", &self.entity)
            .field("fields", &self.fields)
            .field(
                "custom",
                &self.custom.iter().map(|(code, _)| code).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ErrorClassifier {
    /// Classifier for a route that may answer with `allowed`
    #[must_use]
    pub fn new(allowed: &[StatusCode]) -> Self {
        Self {
            allowed: allowed.to_vec(),
            entity: DEFAULT_ENTITY.to_string(),
            fields: Vec::new(),
            custom: Vec::new(),
        }
    }

    /// Noun used in messages, e.g. `"genre"`
    #[must_use]
    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = entity.into();
        self
    }

    /// Show column `raw` as `label` in messages
    #[must_use]
    pub fn field(mut self, raw: impl Into<String>, label: impl Into<String>) -> Self {
        self.fields.push((raw.into(), label.into()));
        self
    }

    #[must_use]
    pub fn fields(self, mappings: &[(&str, &str)]) -> Self {
        mappings
            .iter()
            .fold(self, |classifier, (raw, label)| classifier.field(*raw, *label))
    }

    /// Replace the built-in handling of `code`; the handler's result is
    /// returned as is
    #[must_use]
    pub fn custom<F>(mut self, code: DbErrorCode, handler: F) -> Self
    where
        F: Fn(&DatabaseError) -> Classification + Send + Sync + 'static,
    {
        self.custom.push((code, Box::new(handler)));
        self
    }

    #[must_use]
    pub fn allowed(&self) -> &[StatusCode] {
        &self.allowed
    }

    /// Classify `err`, or `None` when it is not a database error
    #[must_use]
    pub fn classify(&self, err: &ApplicationError) -> Option<Classification> {
        let db = err.as_database()?;

        if let Some((_, handler)) = self.custom.iter().find(|(code, _)| *code == db.code) {
            return Some(handler(db));
        }

        Some(self.builtin(db))
    }

    /// Turn `err` into the response error for this route
    #[must_use]
    pub fn reject(&self, err: ApplicationError) -> ApiError {
        self.classify(&err)
            .map_or_else(|| ApiError::from(err), ApiError::Classified)
    }

    fn builtin(&self, err: &DatabaseError) -> Classification {
        let entity = &self.entity;
        let field = self.field_label(err);

        match &err.code {
            DbErrorCode::UniqueConstraint if err.target_column() == Some("email") => self.result(
                StatusCode::CONFLICT,
                "An account with this email address already exists",
                "Please use a different email address or sign in with your existing account",
            ),
            DbErrorCode::UniqueConstraint => self.result(
                StatusCode::CONFLICT,
                format!("A {entity} with this information already exists"),
                field.map_or_else(
                    || "Please check your input".to_string(),
                    |field| format!("Please check your input ({field} must be unique)"),
                ),
            ),
            DbErrorCode::ValueTooLong => self.result(
                StatusCode::BAD_REQUEST,
                "One or more fields exceed the maximum allowed length",
                "Please check that all fields are within the allowed character limits",
            ),
            DbErrorCode::ForeignKeyConstraint => self.result(
                StatusCode::BAD_REQUEST,
                format!("Invalid reference in {entity} data"),
                "One or more referenced items do not exist",
            ),
            DbErrorCode::ConstraintFailed => self.result(
                StatusCode::BAD_REQUEST,
                "Data constraint violation",
                "The provided data does not meet the required constraints",
            ),
            DbErrorCode::NullConstraint => self.result(
                StatusCode::BAD_REQUEST,
                field.map_or_else(
                    || "Missing required field".to_string(),
                    |field| format!("Missing required field: {field}"),
                ),
                "Please provide all required information",
            ),
            DbErrorCode::MissingRequiredValue => self.result(
                StatusCode::BAD_REQUEST,
                field.map_or_else(
                    || "Missing required value".to_string(),
                    |field| format!("Missing required value for {field}"),
                ),
                "Please provide all required fields",
            ),
            DbErrorCode::MissingRequiredField => self.result(
                StatusCode::BAD_REQUEST,
                field.map_or_else(
                    || "Missing required field".to_string(),
                    |field| format!("Missing required field: {field}"),
                ),
                "Please ensure all required fields are provided",
            ),
            DbErrorCode::RecordNotFound => self.result(
                StatusCode::NOT_FOUND,
                format!("{entity} not found"),
                "The requested item does not exist or has been deleted",
            ),
            DbErrorCode::Unrecognized(code) => {
                error!(
                    code = %code,
                    message = err.message.as_deref().unwrap_or_default(),
                    entity = %entity,
                    "Unhandled database error"
                );
                self.result(
                    StatusCode::BAD_REQUEST,
                    format!("Invalid {entity} data provided"),
                    "Please check your input and try again",
                )
            },
        }
    }

    fn result(
        &self,
        preferred: StatusCode,
        error: impl Into<String>,
        details: impl Into<String>,
    ) -> Classification {
        Classification::new(
            map_to_allowed_status(preferred, &self.allowed),
            error,
            details,
        )
    }

    /// Offending column, shown under its mapped label when one exists
    fn field_label<'a>(&'a self, err: &'a DatabaseError) -> Option<&'a str> {
        let raw = err.target_column()?;
        Some(
            self.fields
                .iter()
                .find(|(column, _)| column == raw)
                .map_or(raw, |(_, label)| label.as_str()),
        )
    }
}

/// Pick the status to send when `preferred` may not be declared by the route
///
/// Conflicts and not-found fall back to 400 when the route offers it;
/// anything else falls back to the first error status in `allowed`, then to
/// `allowed[0]`. An empty list leaves `preferred` unchanged.
#[must_use]
pub fn map_to_allowed_status(preferred: StatusCode, allowed: &[StatusCode]) -> StatusCode {
    if allowed.is_empty() || allowed.contains(&preferred) {
        return preferred;
    }

    let downgrades = preferred == StatusCode::CONFLICT || preferred == StatusCode::NOT_FOUND;
    if downgrades && allowed.contains(&StatusCode::BAD_REQUEST) {
        return StatusCode::BAD_REQUEST;
    }

    allowed
        .iter()
        .copied()
        .find(|status| status.as_u16() >= 400)
        .or_else(|| allowed.first().copied())
        .unwrap_or(preferred)
}

/// Shorthand for classifying the error of a service call
pub trait ClassifyExt<T> {
    /// Map the error through `classifier`
    ///
    /// # Errors
    ///
    /// Returns the classified or generic [`ApiError`] when `self` is `Err`.
    fn classify_err(self, classifier: &ErrorClassifier) -> Result<T, ApiError>;
}

impl<T> ClassifyExt<T> for Result<T, ApplicationError> {
    fn classify_err(self, classifier: &ErrorClassifier) -> Result<T, ApiError> {
        self.map_err(|err| classifier.reject(err))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const BAD_REQUEST: StatusCode = StatusCode::BAD_REQUEST;
    const NOT_FOUND: StatusCode = StatusCode::NOT_FOUND;
    const CONFLICT: StatusCode = StatusCode::CONFLICT;

    fn db(code: DbErrorCode) -> ApplicationError {
        DatabaseError::new(code).into()
    }

    fn db_on(code: DbErrorCode, column: &str) -> ApplicationError {
        DatabaseError::new(code).with_column(column).into()
    }

    // ------------------------------------------------------------------
    // map_to_allowed_status
    // ------------------------------------------------------------------

    #[test]
    fn conflict_downgrades_to_bad_request() {
        assert_eq!(
            map_to_allowed_status(CONFLICT, &[BAD_REQUEST, NOT_FOUND]),
            BAD_REQUEST
        );
    }

    #[test]
    fn not_found_downgrades_to_bad_request() {
        assert_eq!(map_to_allowed_status(NOT_FOUND, &[BAD_REQUEST]), BAD_REQUEST);
    }

    #[test]
    fn allowed_status_is_kept() {
        assert_eq!(
            map_to_allowed_status(StatusCode::OK, &[StatusCode::OK, BAD_REQUEST]),
            StatusCode::OK
        );
        assert_eq!(map_to_allowed_status(CONFLICT, &[BAD_REQUEST, CONFLICT]), CONFLICT);
    }

    #[test]
    fn falls_back_to_first_error_status() {
        assert_eq!(
            map_to_allowed_status(BAD_REQUEST, &[StatusCode::OK, NOT_FOUND, CONFLICT]),
            NOT_FOUND
        );
        assert_eq!(map_to_allowed_status(CONFLICT, &[NOT_FOUND]), NOT_FOUND);
    }

    #[test]
    fn success_only_list_uses_first_entry() {
        assert_eq!(
            map_to_allowed_status(BAD_REQUEST, &[StatusCode::CREATED, StatusCode::OK]),
            StatusCode::CREATED
        );
    }

    #[test]
    fn empty_list_keeps_preferred() {
        assert_eq!(map_to_allowed_status(CONFLICT, &[]), CONFLICT);
    }

    // ------------------------------------------------------------------
    // Built-in table
    // ------------------------------------------------------------------

    #[test]
    fn non_database_errors_are_not_classified() {
        let classifier = ErrorClassifier::new(&[BAD_REQUEST]);
        for err in [
            ApplicationError::Internal("pool timed out".to_string()),
            ApplicationError::NotFound("Genre not found".to_string()),
            ApplicationError::InvalidOperation("busy".to_string()),
            ApplicationError::NotAuthorized("nope".to_string()),
        ] {
            assert!(classifier.classify(&err).is_none(), "{err:?}");
        }
    }

    #[test]
    fn unique_violation_names_mapped_field() {
        let classifier = ErrorClassifier::new(&[BAD_REQUEST, CONFLICT])
            .entity("user")
            .field("first_name", "first name");

        let result = classifier
            .classify(&db_on(DbErrorCode::UniqueConstraint, "first_name"))
            .unwrap();

        assert_eq!(result.status, CONFLICT);
        assert_eq!(result.error, "A user with this information already exists");
        assert_eq!(
            result.details,
            "Please check your input (first name must be unique)"
        );
        assert!(!result.details.contains("first_name"));
    }

    #[test]
    fn unmapped_field_uses_raw_column() {
        let classifier = ErrorClassifier::new(&[CONFLICT]).entity("artist");
        let result = classifier
            .classify(&db_on(DbErrorCode::UniqueConstraint, "spotify_url"))
            .unwrap();
        assert_eq!(
            result.details,
            "Please check your input (spotify_url must be unique)"
        );
    }

    #[test]
    fn unique_violation_without_target() {
        let result = ErrorClassifier::new(&[CONFLICT])
            .classify(&db(DbErrorCode::UniqueConstraint))
            .unwrap();
        assert_eq!(result.error, "A item with this information already exists");
        assert_eq!(result.details, "Please check your input");
    }

    #[test]
    fn column_list_uses_first_entry() {
        let err: ApplicationError = DatabaseError::new(DbErrorCode::UniqueConstraint)
            .with_columns(["playlist_id", "song_id"])
            .into();
        let result = ErrorClassifier::new(&[BAD_REQUEST, CONFLICT, NOT_FOUND])
            .entity("playlist item")
            .field("playlist_id", "song in playlist")
            .classify(&err)
            .unwrap();

        assert_eq!(result.status, CONFLICT);
        assert_eq!(
            result.details,
            "Please check your input (song in playlist must be unique)"
        );
    }

    #[test]
    fn email_conflict_ignores_field_mapping() {
        let result = ErrorClassifier::new(&[BAD_REQUEST, CONFLICT])
            .entity("user")
            .field("email", "email address")
            .classify(&db_on(DbErrorCode::UniqueConstraint, "email"))
            .unwrap();

        assert_eq!(result.status, CONFLICT);
        assert_eq!(
            result.error,
            "An account with this email address already exists"
        );
        assert_eq!(
            result.details,
            "Please use a different email address or sign in with your existing account"
        );
    }

    #[test]
    fn static_messages() {
        let classifier = ErrorClassifier::new(&[BAD_REQUEST]).entity("song");

        let too_long = classifier
            .classify(&db_on(DbErrorCode::ValueTooLong, "title"))
            .unwrap();
        assert_eq!(
            too_long.error,
            "One or more fields exceed the maximum allowed length"
        );

        let dangling = classifier
            .classify(&db(DbErrorCode::ForeignKeyConstraint))
            .unwrap();
        assert_eq!(dangling.error, "Invalid reference in song data");
        assert_eq!(dangling.details, "One or more referenced items do not exist");

        let check = classifier.classify(&db(DbErrorCode::ConstraintFailed)).unwrap();
        assert_eq!(check.error, "Data constraint violation");
        assert_eq!(check.status, BAD_REQUEST);
    }

    #[test]
    fn missing_field_variants() {
        let classifier = ErrorClassifier::new(&[BAD_REQUEST]).field("album_id", "album");

        let null = classifier
            .classify(&db_on(DbErrorCode::NullConstraint, "lyrics"))
            .unwrap();
        assert_eq!(null.error, "Missing required field: lyrics");
        assert_eq!(null.details, "Please provide all required information");

        let relation = classifier
            .classify(&db_on(DbErrorCode::MissingRequiredValue, "album_id"))
            .unwrap();
        assert_eq!(relation.error, "Missing required value for album");
        assert_eq!(relation.details, "Please provide all required fields");

        let connect = classifier
            .classify(&db(DbErrorCode::MissingRequiredField))
            .unwrap();
        assert_eq!(connect.error, "Missing required field");
        assert_eq!(
            connect.details,
            "Please ensure all required fields are provided"
        );

        let generic = classifier
            .classify(&db(DbErrorCode::MissingRequiredValue))
            .unwrap();
        assert_eq!(generic.error, "Missing required value");
    }

    #[test]
    fn unrecognized_code_falls_back_to_invalid_data() {
        let err: ApplicationError =
            DatabaseError::new(DbErrorCode::Unrecognized("SQLITE_BUSY".to_string()))
                .with_message("database is locked")
                .into();

        let result = ErrorClassifier::new(&[NOT_FOUND])
            .entity("album")
            .classify(&err)
            .unwrap();

        assert_eq!(result.status, NOT_FOUND);
        assert_eq!(result.error, "Invalid album data provided");
        assert_eq!(result.details, "Please check your input and try again");
    }

    #[test]
    fn custom_handler_wins_verbatim() {
        let classifier = ErrorClassifier::new(&[BAD_REQUEST]).custom(
            DbErrorCode::UniqueConstraint,
            |_| Classification::new(StatusCode::IM_A_TEAPOT, "taken", "pick another"),
        );

        let result = classifier
            .classify(&db_on(DbErrorCode::UniqueConstraint, "email"))
            .unwrap();
        assert_eq!(
            result,
            Classification::new(StatusCode::IM_A_TEAPOT, "taken", "pick another")
        );

        let other = classifier.classify(&db(DbErrorCode::ValueTooLong)).unwrap();
        assert_eq!(other.status, BAD_REQUEST);
    }

    #[test]
    fn reject_keeps_generic_errors() {
        let classifier = ErrorClassifier::new(&[BAD_REQUEST]);
        let api = classifier.reject(ApplicationError::not_found("Genre"));
        assert!(matches!(api, ApiError::NotFound(msg) if msg == "Genre not found"));

        let api = classifier.reject(db(DbErrorCode::ConstraintFailed));
        assert!(matches!(api, ApiError::Classified(_)));
    }

    // ------------------------------------------------------------------
    // Route scenarios
    // ------------------------------------------------------------------

    #[test]
    fn duplicate_album_title() {
        let result = ErrorClassifier::new(&[BAD_REQUEST, CONFLICT])
            .entity("album")
            .fields(&[("title", "album title"), ("slug", "album title")])
            .classify(&db_on(DbErrorCode::UniqueConstraint, "slug"))
            .unwrap();

        assert_eq!(
            result,
            Classification::new(
                CONFLICT,
                "A album with this information already exists",
                "Please check your input (album title must be unique)",
            )
        );
    }

    #[test]
    fn deleting_missing_genre() {
        let result = ErrorClassifier::new(&[BAD_REQUEST, NOT_FOUND])
            .entity("genre")
            .classify(&db(DbErrorCode::RecordNotFound))
            .unwrap();

        assert_eq!(
            result,
            Classification::new(
                NOT_FOUND,
                "genre not found",
                "The requested item does not exist or has been deleted",
            )
        );
    }

    #[test]
    fn updating_missing_song_without_not_found_status() {
        let result = ErrorClassifier::new(&[BAD_REQUEST])
            .entity("song")
            .classify(&db(DbErrorCode::RecordNotFound))
            .unwrap();

        assert_eq!(result.status, BAD_REQUEST);
        assert_eq!(result.error, "song not found");
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    fn status() -> impl Strategy<Value = StatusCode> {
        prop::sample::select(vec![
            StatusCode::OK,
            StatusCode::CREATED,
            BAD_REQUEST,
            StatusCode::UNAUTHORIZED,
            NOT_FOUND,
            CONFLICT,
            StatusCode::UNPROCESSABLE_ENTITY,
            StatusCode::INTERNAL_SERVER_ERROR,
        ])
    }

    fn code() -> impl Strategy<Value = DbErrorCode> {
        prop_oneof![
            Just(DbErrorCode::UniqueConstraint),
            Just(DbErrorCode::ValueTooLong),
            Just(DbErrorCode::ForeignKeyConstraint),
            Just(DbErrorCode::ConstraintFailed),
            Just(DbErrorCode::NullConstraint),
            Just(DbErrorCode::MissingRequiredValue),
            Just(DbErrorCode::MissingRequiredField),
            Just(DbErrorCode::RecordNotFound),
            "[A-Z_]{1,12}".prop_map(DbErrorCode::Unrecognized),
        ]
    }

    proptest! {
        #[test]
        fn status_is_always_allowed(
            allowed in prop::collection::vec(status(), 1..5),
            code in code(),
            column in prop::option::of("[a-z_]{1,12}"),
        ) {
            let mut err = DatabaseError::new(code);
            if let Some(column) = column {
                err = err.with_column(column);
            }
            let result = ErrorClassifier::new(&allowed)
                .classify(&err.into())
                .unwrap();
            prop_assert!(allowed.contains(&result.status));
        }

        #[test]
        fn remap_is_deterministic(
            preferred in status(),
            allowed in prop::collection::vec(status(), 0..5),
        ) {
            prop_assert_eq!(
                map_to_allowed_status(preferred, &allowed),
                map_to_allowed_status(preferred, &allowed)
            );
        }
    }
}
