//! Genre handlers

use application::NewGenre;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use domain::{Attributed, Genre, GenreChanges, GenreId};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{
    CreatorResponse, Deleted, ListParams, PaginationResponse, Reply, created, ok, path_id,
    validate_hex_color, validate_sluggable,
};
use crate::{
    error::ApiError,
    error_mapping::{ClassifyExt, ErrorClassifier},
    middleware::{CurrentUser, ValidatedJson, ValidatedQuery},
    state::AppState,
};

fn classifier(allowed: &[StatusCode]) -> ErrorClassifier {
    ErrorClassifier::new(allowed)
        .entity("genre")
        .fields(&[("name", "genre name"), ("slug", "genre name")])
}

/// A genre with its creator
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": "0190f1e2-7c3a-7d10-8a7e-5b1f0c2d3e4f",
    "name": "Indie Rock",
    "slug": "indie-rock",
    "description": "Guitar music from independent labels",
    "color": "#FF5722",
    "createdAt": "2024-07-01T12:00:00Z",
    "updatedAt": "2024-07-01T12:00:00Z",
    "createdBy": {"id": "0190f1e2-0000-7000-8000-000000000001", "name": "Curator", "email": "curator@example.com"}
}))]
pub struct GenreResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// Hex color, `#RRGGBB`
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: CreatorResponse,
}

impl From<Attributed<Genre>> for GenreResponse {
    fn from(Attributed { record, creator }: Attributed<Genre>) -> Self {
        Self {
            id: record.id.as_uuid(),
            name: record.name,
            slug: record.slug.as_str().to_string(),
            description: record.description,
            color: record.color,
            created_at: record.created_at,
            updated_at: record.updated_at,
            created_by: creator.into(),
        }
    }
}

/// One page of genres
#[derive(Debug, Serialize, ToSchema)]
pub struct GenreList {
    pub genres: Vec<GenreResponse>,
    pub pagination: PaginationResponse,
}

/// Request body for creating a genre
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGenreRequest {
    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    #[validate(custom(function = "validate_sluggable"))]
    pub name: String,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,
}

impl From<CreateGenreRequest> for NewGenre {
    fn from(req: CreateGenreRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            color: req.color,
        }
    }
}

/// Request body for updating a genre; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateGenreRequest {
    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    #[validate(custom(function = "validate_sluggable"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,
}

impl From<UpdateGenreRequest> for GenreChanges {
    fn from(req: UpdateGenreRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            color: req.color,
        }
    }
}

/// List genres ordered by name
#[utoipa::path(
    get,
    path = "/api/genres",
    tag = "genres",
    params(ListParams),
    responses(
        (status = 200, description = "Page of genres", body = super::common::ApiResponse<GenreList>),
        (status = 400, description = "Invalid query", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_genres(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<ListParams>,
) -> Result<Reply<GenreList>, ApiError> {
    let page = state
        .genres
        .list(&params.into())
        .await
        .classify_err(&classifier(&[StatusCode::BAD_REQUEST]))?;

    Ok(ok(GenreList {
        pagination: page.pagination().into(),
        genres: page.items.into_iter().map(Into::into).collect(),
    }))
}

/// Get a genre by id
#[utoipa::path(
    get,
    path = "/api/genres/{id}",
    tag = "genres",
    params(("id" = Uuid, Path, description = "Genre id")),
    responses(
        (status = 200, description = "The genre", body = super::common::ApiResponse<GenreResponse>),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Reply<GenreResponse>, ApiError> {
    let id: GenreId = path_id(&id, "Genre")?;

    let genre = state
        .genres
        .get(&id)
        .await
        .classify_err(&classifier(&[StatusCode::NOT_FOUND]))?;

    Ok(ok(genre.into()))
}

/// Create a genre
#[utoipa::path(
    post,
    path = "/api/genres",
    tag = "genres",
    request_body = CreateGenreRequest,
    responses(
        (status = 201, description = "Genre created", body = super::common::ApiResponse<GenreResponse>),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Not signed in", body = crate::error::ErrorResponse),
        (status = 409, description = "Genre name taken", body = crate::error::ErrorResponse)
    ),
    security(("session" = []))
)]
#[instrument(skip(state, user, body), fields(user = %user.id))]
pub async fn create_genre(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(body): ValidatedJson<CreateGenreRequest>,
) -> Result<Reply<GenreResponse>, ApiError> {
    let genre = state
        .genres
        .create(body.into(), &user)
        .await
        .classify_err(&classifier(&[StatusCode::BAD_REQUEST, StatusCode::CONFLICT]))?;

    Ok(created(genre.into()))
}

/// Update a genre
#[utoipa::path(
    put,
    path = "/api/genres/{id}",
    tag = "genres",
    params(("id" = Uuid, Path, description = "Genre id")),
    request_body = UpdateGenreRequest,
    responses(
        (status = 200, description = "Genre updated", body = super::common::ApiResponse<GenreResponse>),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Not signed in", body = crate::error::ErrorResponse),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Genre name taken", body = crate::error::ErrorResponse)
    ),
    security(("session" = []))
)]
#[instrument(skip(state, user, body), fields(user = %user.id))]
pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: CurrentUser,
    ValidatedJson(body): ValidatedJson<UpdateGenreRequest>,
) -> Result<Reply<GenreResponse>, ApiError> {
    let id: GenreId = path_id(&id, "Genre")?;

    let genre = state
        .genres
        .update(&id, body.into(), user.id)
        .await
        .classify_err(&classifier(&[
            StatusCode::BAD_REQUEST,
            StatusCode::CONFLICT,
            StatusCode::NOT_FOUND,
        ]))?;

    Ok(ok(genre.into()))
}

/// Delete a genre that no album or song uses
#[utoipa::path(
    delete,
    path = "/api/genres/{id}",
    tag = "genres",
    params(("id" = Uuid, Path, description = "Genre id")),
    responses(
        (status = 200, description = "Genre deleted", body = super::common::ApiResponse<Deleted>),
        (status = 400, description = "Genre still in use", body = crate::error::ErrorResponse),
        (status = 401, description = "Not signed in", body = crate::error::ErrorResponse),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    ),
    security(("session" = []))
)]
#[instrument(skip(state, user), fields(user = %user.id))]
pub async fn delete_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> Result<Reply<Deleted>, ApiError> {
    let id: GenreId = path_id(&id, "Genre")?;

    state
        .genres
        .delete(&id)
        .await
        .classify_err(&classifier(&[StatusCode::BAD_REQUEST, StatusCode::NOT_FOUND]))?;

    Ok(ok(Deleted { deleted: true }))
}
