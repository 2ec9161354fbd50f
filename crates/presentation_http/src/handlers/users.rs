//! User handlers

use application::NewUser;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use domain::{User, UserId};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{ApiResponse, ListParams, PaginationResponse, Reply, created, ok, path_id};
use crate::{
    error::{ApiError, ErrorResponse},
    error_mapping::{ClassifyExt, ErrorClassifier},
    middleware::{CurrentUser, ValidatedJson, ValidatedQuery},
    state::AppState,
};

pub(crate) fn classifier(allowed: &[StatusCode]) -> ErrorClassifier {
    ErrorClassifier::new(allowed).entity("user").fields(&[
        ("email", "email address"),
        ("first_name", "first name"),
        ("last_name", "last name"),
    ])
}

/// Public view of an account
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub is_public: bool,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.as_uuid(),
            email: user.email.as_str().to_string(),
            name: user.name,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            is_public: user.is_public,
            email_verified: user.email_verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub users: Vec<UserResponse>,
    pub pagination: PaginationResponse,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "must be between 8 and 128 characters"))]
    #[schema(format = Password)]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 50))]
    pub first_name: Option<String>,
    #[validate(length(max = 50))]
    pub last_name: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            email: req.email,
            password: SecretString::from(req.password),
            name: req.name,
            first_name: req.first_name,
            last_name: req.last_name,
            bio: req.bio,
            is_public: req.is_public,
        }
    }
}

/// List users, newest first
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(ListParams),
    responses(
        (status = 200, description = "Page of users", body = ApiResponse<UserList>),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<ListParams>,
) -> Result<Reply<UserList>, ApiError> {
    let page = state
        .users
        .list(&params.into())
        .await
        .classify_err(&classifier(&[StatusCode::BAD_REQUEST]))?;

    Ok(ok(UserList {
        pagination: page.pagination().into(),
        users: page.items.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Reply<UserResponse>, ApiError> {
    let id: UserId = path_id(&id, "User")?;

    let user = state
        .users
        .get(&id)
        .await
        .classify_err(&classifier(&[StatusCode::NOT_FOUND]))?;

    Ok(ok(user.into()))
}

/// Create an account on behalf of someone else
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 409, description = "Email address taken", body = ErrorResponse)
    ),
    security(("session" = []))
)]
#[instrument(skip(state, user, body), fields(user = %user.id))]
pub async fn create_user(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(body): ValidatedJson<CreateUserRequest>,
) -> Result<Reply<UserResponse>, ApiError> {
    let created_user = state
        .users
        .create(body.into())
        .await
        .classify_err(&classifier(&[StatusCode::BAD_REQUEST, StatusCode::CONFLICT]))?;

    Ok(created(created_user.into()))
}

#[cfg(test)]
mod tests {
    use application::{DatabaseError, DbErrorCode};

    use super::*;

    #[test]
    fn duplicate_email_uses_account_message() {
        let err = DatabaseError::new(DbErrorCode::UniqueConstraint)
            .with_column("email")
            .into();
        let classification = classifier(&[StatusCode::BAD_REQUEST, StatusCode::CONFLICT])
            .classify(&err)
            .unwrap();

        assert_eq!(classification.status, StatusCode::CONFLICT);
        assert_eq!(
            classification.error,
            "An account with this email address already exists"
        );
    }

    #[test]
    fn missing_last_name_uses_label() {
        let err = DatabaseError::new(DbErrorCode::NullConstraint)
            .with_column("last_name")
            .into();
        let classification = classifier(&[StatusCode::BAD_REQUEST])
            .classify(&err)
            .unwrap();

        assert_eq!(classification.error, "Missing required field: last name");
    }

    #[test]
    fn short_password_and_bad_email_rejected() {
        let req: CreateUserRequest =
            serde_json::from_str(r#"{"email": "nope", "password": "short"}"#).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }
}
