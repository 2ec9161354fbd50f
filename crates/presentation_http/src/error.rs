//! API error handling
//!
//! Every failure leaves the API as `{status, error, details?}`. Internal
//! error text is only echoed to clients while exposure is enabled; production
//! configurations switch it off.

use std::sync::atomic::{AtomicBool, Ordering};

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::error_mapping::Classification;

/// Global flag to control error detail exposure
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

const GENERIC_INTERNAL_ERROR: &str = "An internal error occurred";

/// Configure whether internal error messages are sent to clients
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

fn internal_message(msg: &str, expose: bool) -> String {
    if expose {
        msg.to_string()
    } else {
        GENERIC_INTERNAL_ERROR.to_string()
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Database failure translated by the route's classifier
    #[error("{}", .0.error)]
    Classified(Classification),

    /// Request body, query or path failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No valid session on a protected route
    #[error("Authentication required")]
    Unauthenticated,

    /// Credentials were rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status code, repeated from the response line
    #[schema(example = 409)]
    pub status: u16,
    /// Error message
    #[schema(example = "A genre with this information already exists")]
    pub error: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Status code and body for this error
    #[must_use]
    pub fn to_parts(&self) -> (StatusCode, ErrorResponse) {
        let (status, error, details) = match self {
            Self::Classified(c) => (c.status, c.error.clone(), Some(c.details.clone())),
            Self::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "Invalid request data".to_string(),
                Some(msg.clone()),
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            Self::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
                Some("You must be signed in to access this resource".to_string()),
            ),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            Self::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                internal_message(msg, should_expose_details()),
                None,
            ),
        };

        (
            status,
            ErrorResponse {
                status: status.as_u16(),
                error,
                details,
            },
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(msg) = &self {
            error!(error = %msg, "Internal server error");
        }

        let (status, body) = self.to_parts();
        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::NotFound(msg) => Self::NotFound(msg),
            ApplicationError::InvalidOperation(msg) => Self::BadRequest(msg),
            ApplicationError::NotAuthorized(msg) => Self::Unauthorized(msg),
            ApplicationError::Database(e) => Self::Internal(e.to_string()),
            ApplicationError::Configuration(_) | ApplicationError::Internal(_) => {
                Self::Internal(err.to_string())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use application::{DatabaseError, DbErrorCode};
    use domain::DomainError;

    use super::*;

    #[test]
    fn classified_uses_its_status_and_details() {
        let err = ApiError::Classified(Classification::new(
            StatusCode::CONFLICT,
            "A genre with this information already exists",
            "Please check your input (genre name must be unique)",
        ));
        let (status, body) = err.to_parts();

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.status, 409);
        assert_eq!(
            body.details.as_deref(),
            Some("Please check your input (genre name must be unique)")
        );
    }

    #[test]
    fn unauthenticated_body() {
        let (status, body) = ApiError::Unauthenticated.to_parts();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error, "Authentication required");
        assert_eq!(
            body.details.as_deref(),
            Some("You must be signed in to access this resource")
        );
    }

    #[test]
    fn details_are_omitted_when_absent() {
        let (_, body) = ApiError::NotFound("404 Not Found".to_string()).to_parts();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": 404, "error": "404 Not Found"})
        );
    }

    #[test]
    fn internal_message_respects_exposure() {
        assert_eq!(internal_message("disk full", true), "disk full");
        assert_eq!(internal_message("disk full", false), GENERIC_INTERNAL_ERROR);
    }

    #[test]
    fn application_errors_convert() {
        let not_found: ApiError = ApplicationError::not_found("Playlist").into();
        assert!(matches!(not_found, ApiError::NotFound(msg) if msg == "Playlist not found"));

        let refused: ApiError = ApplicationError::InvalidOperation(
            "Cannot delete album with associated songs".to_string(),
        )
        .into();
        assert!(matches!(refused, ApiError::BadRequest(_)));

        let domain: ApiError =
            ApplicationError::Domain(DomainError::InvalidEmailAddress("x".to_string())).into();
        assert!(matches!(domain, ApiError::BadRequest(_)));

        let denied: ApiError = ApplicationError::NotAuthorized("nope".to_string()).into();
        assert!(matches!(denied, ApiError::Unauthorized(_)));

        let internal: ApiError = ApplicationError::Internal("boom".to_string()).into();
        assert!(matches!(internal, ApiError::Internal(msg) if msg == "Internal error: boom"));
    }

    #[test]
    fn unclassified_database_error_is_internal() {
        let err: ApiError =
            ApplicationError::from(DatabaseError::new(DbErrorCode::ConstraintFailed)).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn into_response_sets_status() {
        let response = ApiError::Validation("name: length".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::Internal("crash".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
