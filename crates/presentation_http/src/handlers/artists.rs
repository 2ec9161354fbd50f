//! Artist handlers
//!
//! Reads and updates address an artist by slug, deletes by id.

use application::NewArtist;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use domain::{Artist, ArtistChanges, ArtistId, Attributed, Slug};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{
    ApiResponse, CreatorResponse, Deleted, ListParams, PaginationResponse, Reply, created, ok,
    path_id, validate_debut_year, validate_sluggable,
};
use crate::{
    error::{ApiError, ErrorResponse},
    error_mapping::{ClassifyExt, ErrorClassifier},
    middleware::{CurrentUser, ValidatedJson, ValidatedQuery},
    state::AppState,
};

fn classifier(allowed: &[StatusCode]) -> ErrorClassifier {
    ErrorClassifier::new(allowed)
        .entity("artist")
        .fields(&[("name", "artist name"), ("slug", "artist name")])
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArtistResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub website: Option<String>,
    pub spotify_url: Option<String>,
    pub country: Option<String>,
    pub debut_year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: CreatorResponse,
}

impl From<Attributed<Artist>> for ArtistResponse {
    fn from(Attributed { record, creator }: Attributed<Artist>) -> Self {
        Self {
            id: record.id.as_uuid(),
            name: record.name,
            slug: record.slug.as_str().to_string(),
            bio: record.bio,
            image: record.image,
            website: record.website,
            spotify_url: record.spotify_url,
            country: record.country,
            debut_year: record.debut_year,
            created_at: record.created_at,
            updated_at: record.updated_at,
            created_by: creator.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArtistList {
    pub artists: Vec<ArtistResponse>,
    pub pagination: PaginationResponse,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateArtistRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    #[validate(custom(function = "validate_sluggable"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[validate(url)]
    pub image: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(url)]
    pub spotify_url: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
    #[validate(custom(function = "validate_debut_year"))]
    pub debut_year: Option<i32>,
}

impl From<CreateArtistRequest> for NewArtist {
    fn from(req: CreateArtistRequest) -> Self {
        Self {
            name: req.name,
            bio: req.bio,
            image: req.image,
            website: req.website,
            spotify_url: req.spotify_url,
            country: req.country,
            debut_year: req.debut_year,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArtistRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    #[validate(custom(function = "validate_sluggable"))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[validate(url)]
    pub image: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(url)]
    pub spotify_url: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
    #[validate(custom(function = "validate_debut_year"))]
    pub debut_year: Option<i32>,
}

impl From<UpdateArtistRequest> for ArtistChanges {
    fn from(req: UpdateArtistRequest) -> Self {
        Self {
            name: req.name,
            bio: req.bio,
            image: req.image,
            website: req.website,
            spotify_url: req.spotify_url,
            country: req.country,
            debut_year: req.debut_year,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/artists",
    tag = "artists",
    params(ListParams),
    responses(
        (status = 200, description = "Page of artists", body = ApiResponse<ArtistList>),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_artists(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<ListParams>,
) -> Result<Reply<ArtistList>, ApiError> {
    let page = state
        .artists
        .list(&params.into())
        .await
        .classify_err(&classifier(&[StatusCode::BAD_REQUEST]))?;

    Ok(ok(ArtistList {
        pagination: page.pagination().into(),
        artists: page.items.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/artists/{slug}",
    tag = "artists",
    params(("slug" = String, Path, description = "Artist slug")),
    responses(
        (status = 200, description = "The artist", body = ApiResponse<ArtistResponse>),
        (status = 404, description = "Artist not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_artist(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Reply<ArtistResponse>, ApiError> {
    let artist = state
        .artists
        .get_by_slug(&Slug::from_stored(slug))
        .await
        .classify_err(&classifier(&[StatusCode::NOT_FOUND]))?;

    Ok(ok(artist.into()))
}

#[utoipa::path(
    post,
    path = "/api/artists",
    tag = "artists",
    request_body = CreateArtistRequest,
    responses(
        (status = 201, description = "Artist created", body = ApiResponse<ArtistResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 409, description = "Artist name taken", body = ErrorResponse)
    ),
    security(("session" = []))
)]
#[instrument(skip(state, user, body), fields(user = %user.id))]
pub async fn create_artist(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(body): ValidatedJson<CreateArtistRequest>,
) -> Result<Reply<ArtistResponse>, ApiError> {
    let artist = state
        .artists
        .create(body.into(), &user)
        .await
        .classify_err(&classifier(&[StatusCode::BAD_REQUEST, StatusCode::CONFLICT]))?;

    Ok(created(artist.into()))
}

#[utoipa::path(
    put,
    path = "/api/artists/{slug}",
    tag = "artists",
    params(("slug" = String, Path, description = "Artist slug")),
    request_body = UpdateArtistRequest,
    responses(
        (status = 200, description = "Artist updated", body = ApiResponse<ArtistResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Artist not found", body = ErrorResponse),
        (status = 409, description = "Artist name taken", body = ErrorResponse)
    ),
    security(("session" = []))
)]
#[instrument(skip(state, user, body), fields(user = %user.id))]
pub async fn update_artist(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    user: CurrentUser,
    ValidatedJson(body): ValidatedJson<UpdateArtistRequest>,
) -> Result<Reply<ArtistResponse>, ApiError> {
    let artist = state
        .artists
        .update(&Slug::from_stored(slug), body.into(), user.id)
        .await
        .classify_err(&classifier(&[
            StatusCode::BAD_REQUEST,
            StatusCode::CONFLICT,
            StatusCode::NOT_FOUND,
        ]))?;

    Ok(ok(artist.into()))
}

/// Delete an artist that no album or song credits
#[utoipa::path(
    delete,
    path = "/api/artists/{id}",
    tag = "artists",
    params(("id" = Uuid, Path, description = "Artist id")),
    responses(
        (status = 200, description = "Artist deleted", body = ApiResponse<Deleted>),
        (status = 400, description = "Artist still credited", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Artist not found", body = ErrorResponse)
    ),
    security(("session" = []))
)]
#[instrument(skip(state, user), fields(user = %user.id))]
pub async fn delete_artist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> Result<Reply<Deleted>, ApiError> {
    let id: ArtistId = path_id(&id, "Artist")?;

    state
        .artists
        .delete(&id)
        .await
        .classify_err(&classifier(&[StatusCode::BAD_REQUEST, StatusCode::NOT_FOUND]))?;

    Ok(ok(Deleted { deleted: true }))
}
