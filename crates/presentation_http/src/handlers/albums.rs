//! Album handlers

use application::{CatalogLinks, NewAlbum};
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use domain::{Album, AlbumChanges, AlbumId, AlbumType, ArtistId, Attributed, GenreId};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{
    ApiResponse, CreatorResponse, Deleted, ListParams, PaginationResponse, Reply, created, ok,
    path_id, validate_sluggable,
};
use crate::{
    error::{ApiError, ErrorResponse},
    error_mapping::{ClassifyExt, ErrorClassifier},
    middleware::{CurrentUser, ValidatedJson, ValidatedQuery},
    state::AppState,
};

fn classifier(allowed: &[StatusCode]) -> ErrorClassifier {
    ErrorClassifier::new(allowed)
        .entity("album")
        .fields(&[("title", "album title"), ("slug", "album title")])
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlbumResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    /// `ALBUM`, `EP`, `SINGLE`, ...
    #[schema(example = "ALBUM")]
    pub album_type: String,
    pub total_tracks: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: CreatorResponse,
}

impl From<Attributed<Album>> for AlbumResponse {
    fn from(Attributed { record, creator }: Attributed<Album>) -> Self {
        Self {
            id: record.id.as_uuid(),
            title: record.title,
            slug: record.slug.as_str().to_string(),
            description: record.description,
            cover_image: record.cover_image,
            release_date: record.release_date,
            album_type: record.album_type.as_str().to_string(),
            total_tracks: record.total_tracks,
            created_at: record.created_at,
            updated_at: record.updated_at,
            created_by: creator.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AlbumList {
    pub albums: Vec<AlbumResponse>,
    pub pagination: PaginationResponse,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbumRequest {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    #[validate(custom(function = "validate_sluggable"))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(url)]
    pub cover_image: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "EP")]
    pub album_type: AlbumType,
    #[validate(range(min = 1, max = 500))]
    pub total_tracks: Option<i32>,
    /// Artists credited on the album
    #[serde(default)]
    #[schema(value_type = Vec<Uuid>)]
    pub artist_ids: Vec<ArtistId>,
    #[serde(default)]
    #[schema(value_type = Vec<Uuid>)]
    pub genre_ids: Vec<GenreId>,
}

impl From<CreateAlbumRequest> for NewAlbum {
    fn from(req: CreateAlbumRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            cover_image: req.cover_image,
            release_date: req.release_date,
            album_type: req.album_type,
            total_tracks: req.total_tracks,
            links: CatalogLinks {
                artist_ids: req.artist_ids,
                genre_ids: req.genre_ids,
            },
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlbumRequest {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    #[validate(custom(function = "validate_sluggable"))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(url)]
    pub cover_image: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>, example = "LP")]
    pub album_type: Option<AlbumType>,
    #[validate(range(min = 1, max = 500))]
    pub total_tracks: Option<i32>,
}

impl From<UpdateAlbumRequest> for AlbumChanges {
    fn from(req: UpdateAlbumRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            cover_image: req.cover_image,
            release_date: req.release_date,
            album_type: req.album_type,
            total_tracks: req.total_tracks,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/albums",
    tag = "albums",
    params(ListParams),
    responses(
        (status = 200, description = "Page of albums", body = ApiResponse<AlbumList>),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_albums(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<ListParams>,
) -> Result<Reply<AlbumList>, ApiError> {
    let page = state
        .albums
        .list(&params.into())
        .await
        .classify_err(&classifier(&[StatusCode::BAD_REQUEST]))?;

    Ok(ok(AlbumList {
        pagination: page.pagination().into(),
        albums: page.items.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/albums/{id}",
    tag = "albums",
    params(("id" = Uuid, Path, description = "Album id")),
    responses(
        (status = 200, description = "The album", body = ApiResponse<AlbumResponse>),
        (status = 404, description = "Album not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_album(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Reply<AlbumResponse>, ApiError> {
    let id: AlbumId = path_id(&id, "Album")?;

    let album = state
        .albums
        .get(&id)
        .await
        .classify_err(&classifier(&[StatusCode::NOT_FOUND]))?;

    Ok(ok(album.into()))
}

/// Create an album and link it to artists and genres
#[utoipa::path(
    post,
    path = "/api/albums",
    tag = "albums",
    request_body = CreateAlbumRequest,
    responses(
        (status = 201, description = "Album created", body = ApiResponse<AlbumResponse>),
        (status = 400, description = "Invalid request or unknown artist/genre", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 409, description = "Album title taken", body = ErrorResponse)
    ),
    security(("session" = []))
)]
#[instrument(skip(state, user, body), fields(user = %user.id))]
pub async fn create_album(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(body): ValidatedJson<CreateAlbumRequest>,
) -> Result<Reply<AlbumResponse>, ApiError> {
    let album = state
        .albums
        .create(body.into(), &user)
        .await
        .classify_err(&classifier(&[StatusCode::BAD_REQUEST, StatusCode::CONFLICT]))?;

    Ok(created(album.into()))
}

#[utoipa::path(
    put,
    path = "/api/albums/{id}",
    tag = "albums",
    params(("id" = Uuid, Path, description = "Album id")),
    request_body = UpdateAlbumRequest,
    responses(
        (status = 200, description = "Album updated", body = ApiResponse<AlbumResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Album not found", body = ErrorResponse),
        (status = 409, description = "Album title taken", body = ErrorResponse)
    ),
    security(("session" = []))
)]
#[instrument(skip(state, user, body), fields(user = %user.id))]
pub async fn update_album(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: CurrentUser,
    ValidatedJson(body): ValidatedJson<UpdateAlbumRequest>,
) -> Result<Reply<AlbumResponse>, ApiError> {
    let id: AlbumId = path_id(&id, "Album")?;

    let album = state
        .albums
        .update(&id, body.into(), user.id)
        .await
        .classify_err(&classifier(&[
            StatusCode::BAD_REQUEST,
            StatusCode::CONFLICT,
            StatusCode::NOT_FOUND,
        ]))?;

    Ok(ok(album.into()))
}

#[utoipa::path(
    delete,
    path = "/api/albums/{id}",
    tag = "albums",
    params(("id" = Uuid, Path, description = "Album id")),
    responses(
        (status = 200, description = "Album deleted", body = ApiResponse<Deleted>),
        (status = 400, description = "Album still has songs", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Album not found", body = ErrorResponse)
    ),
    security(("session" = []))
)]
#[instrument(skip(state, user), fields(user = %user.id))]
pub async fn delete_album(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> Result<Reply<Deleted>, ApiError> {
    let id: AlbumId = path_id(&id, "Album")?;

    state
        .albums
        .delete(&id)
        .await
        .classify_err(&classifier(&[StatusCode::BAD_REQUEST, StatusCode::NOT_FOUND]))?;

    Ok(ok(Deleted { deleted: true }))
}
