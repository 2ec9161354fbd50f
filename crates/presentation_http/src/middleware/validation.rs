//! Request validation
//!
//! `ValidatedJson` and `ValidatedQuery` deserialize with axum's extractors
//! and then run the `validator` rules. Every failure is a 400
//! [`ApiError::Validation`] whose details list the offending fields.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;

/// A JSON extractor that also validates the request body
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateGenreRequest {
///     #[validate(length(min = 1, max = 50))]
///     name: String,
/// }
///
/// async fn handler(ValidatedJson(req): ValidatedJson<CreateGenreRequest>) {}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::Validation(e.body_text()))?;

        value.validate().map_err(|e| describe(&e))?;
        Ok(Self(value))
    }
}

/// Query-string counterpart of [`ValidatedJson`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::Validation(e.body_text()))?;

        value.validate().map_err(|e| describe(&e))?;
        Ok(Self(value))
    }
}

/// `field: message` pairs joined with `; `, sorted by field
fn describe(errors: &ValidationErrors) -> ApiError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                format!(
                    "{field}: {}",
                    error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), ToString::to_string)
                )
            })
        })
        .collect();
    fields.sort();

    ApiError::Validation(fields.join("; "))
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::StatusCode,
        routing::{get, post},
    };
    use serde::Deserialize;
    use tower::ServiceExt;
    use validator::Validate;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct TestRequest {
        #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
        message: String,
        #[validate(range(min = 0, max = 10))]
        #[serde(default)]
        count: u32,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct TestQuery {
        #[validate(range(min = 1, max = 100))]
        #[serde(default = "ten")]
        limit: u32,
    }

    const fn ten() -> u32 {
        10
    }

    async fn body_handler(ValidatedJson(req): ValidatedJson<TestRequest>) -> String {
        req.message
    }

    async fn query_handler(ValidatedQuery(query): ValidatedQuery<TestQuery>) -> String {
        query.limit.to_string()
    }

    fn create_test_app() -> Router {
        Router::new()
            .route("/test", post(body_handler))
            .route("/query", get(query_handler))
    }

    async fn post_json(body: &str) -> (StatusCode, serde_json::Value) {
        let response = create_test_app()
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/test")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    async fn get_query(uri: &str) -> StatusCode {
        create_test_app()
            .oneshot(
                axum::http::Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn valid_request_passes() {
        let (status, _) = post_json(r#"{"message": "hello"}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn empty_message_rejected_with_field_detail() {
        let (status, body) = post_json(r#"{"message": ""}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
        assert_eq!(body["error"], "Invalid request data");
        assert_eq!(
            body["details"],
            "message: must be between 1 and 100 characters"
        );
    }

    #[tokio::test]
    async fn rule_code_used_without_message() {
        let (status, body) = post_json(r#"{"message": "hello", "count": 100}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"], "count: range");
    }

    #[tokio::test]
    async fn invalid_json_rejected() {
        let (status, body) = post_json(r#"{"message": not valid json}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request data");
    }

    #[tokio::test]
    async fn query_defaults_and_limits() {
        assert_eq!(get_query("/query").await, StatusCode::OK);
        assert_eq!(get_query("/query?limit=100").await, StatusCode::OK);
        assert_eq!(get_query("/query?limit=101").await, StatusCode::BAD_REQUEST);
        assert_eq!(get_query("/query?limit=abc").await, StatusCode::BAD_REQUEST);
    }
}
