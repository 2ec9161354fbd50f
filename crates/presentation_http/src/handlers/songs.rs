//! Song handlers

use application::{CatalogLinks, NewSong};
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use domain::{AlbumId, ArtistId, Attributed, GenreId, Song, SongChanges, SongId};
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
        .entity("song")
        .fields(&[("title", "song title"), ("slug", "song title")])
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SongResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub lyrics: String,
    /// Length in seconds
    pub duration: Option<i32>,
    pub track_number: Option<i32>,
    pub album_id: Option<Uuid>,
    pub release_date: Option<DateTime<Utc>>,
    pub language: Option<String>,
    pub is_explicit: bool,
    pub is_published: bool,
    pub lyrics_source: Option<String>,
    pub lyrics_verified: bool,
    pub spotify_url: Option<String>,
    pub youtube_url: Option<String>,
    pub apple_music_url: Option<String>,
    pub view_count: i64,
    pub favorite_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: CreatorResponse,
}

impl From<Attributed<Song>> for SongResponse {
    fn from(Attributed { record, creator }: Attributed<Song>) -> Self {
        Self {
            id: record.id.as_uuid(),
            title: record.title,
            slug: record.slug.as_str().to_string(),
            lyrics: record.lyrics,
            duration: record.duration,
            track_number: record.track_number,
            album_id: record.album_id.map(|id| id.as_uuid()),
            release_date: record.release_date,
            language: record.language,
            is_explicit: record.is_explicit,
            is_published: record.is_published,
            lyrics_source: record.lyrics_source,
            lyrics_verified: record.lyrics_verified,
            spotify_url: record.spotify_url,
            youtube_url: record.youtube_url,
            apple_music_url: record.apple_music_url,
            view_count: record.view_count,
            favorite_count: record.favorite_count,
            created_at: record.created_at,
            updated_at: record.updated_at,
            created_by: creator.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SongList {
    pub songs: Vec<SongResponse>,
    pub pagination: PaginationResponse,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSongRequest {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    #[validate(custom(function = "validate_sluggable"))]
    pub title: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub lyrics: String,
    #[validate(range(min = 1, max = 7200))]
    pub duration: Option<i32>,
    #[validate(range(min = 1, max = 500))]
    pub track_number: Option<i32>,
    #[schema(value_type = Option<Uuid>)]
    pub album_id: Option<AlbumId>,
    pub release_date: Option<DateTime<Utc>>,
    #[validate(length(min = 2, max = 10))]
    pub language: Option<String>,
    #[serde(default)]
    pub is_explicit: bool,
    #[serde(default)]
    pub is_published: bool,
    #[validate(length(max = 200))]
    pub lyrics_source: Option<String>,
    #[validate(url)]
    pub spotify_url: Option<String>,
    #[validate(url)]
    pub youtube_url: Option<String>,
    #[validate(url)]
    pub apple_music_url: Option<String>,
    #[serde(default)]
    #[schema(value_type = Vec<Uuid>)]
    pub artist_ids: Vec<ArtistId>,
    #[serde(default)]
    #[schema(value_type = Vec<Uuid>)]
    pub genre_ids: Vec<GenreId>,
}

impl From<CreateSongRequest> for NewSong {
    fn from(req: CreateSongRequest) -> Self {
        Self {
            title: req.title,
            lyrics: req.lyrics,
            duration: req.duration,
            track_number: req.track_number,
            album_id: req.album_id,
            release_date: req.release_date,
            language: req.language,
            is_explicit: req.is_explicit,
            is_published: req.is_published,
            lyrics_source: req.lyrics_source,
            spotify_url: req.spotify_url,
            youtube_url: req.youtube_url,
            apple_music_url: req.apple_music_url,
            links: CatalogLinks {
                artist_ids: req.artist_ids,
                genre_ids: req.genre_ids,
            },
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSongRequest {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    #[validate(custom(function = "validate_sluggable"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub lyrics: Option<String>,
    #[validate(range(min = 1, max = 7200))]
    pub duration: Option<i32>,
    #[validate(range(min = 1, max = 500))]
    pub track_number: Option<i32>,
    #[schema(value_type = Option<Uuid>)]
    pub album_id: Option<AlbumId>,
    pub release_date: Option<DateTime<Utc>>,
    #[validate(length(min = 2, max = 10))]
    pub language: Option<String>,
    pub is_explicit: Option<bool>,
    pub is_published: Option<bool>,
    #[validate(length(max = 200))]
    pub lyrics_source: Option<String>,
    #[validate(url)]
    pub spotify_url: Option<String>,
    #[validate(url)]
    pub youtube_url: Option<String>,
    #[validate(url)]
    pub apple_music_url: Option<String>,
}

impl From<UpdateSongRequest> for SongChanges {
    fn from(req: UpdateSongRequest) -> Self {
        Self {
            title: req.title,
            lyrics: req.lyrics,
            duration: req.duration,
            track_number: req.track_number,
            album_id: req.album_id,
            release_date: req.release_date,
            language: req.language,
            is_explicit: req.is_explicit,
            is_published: req.is_published,
            lyrics_source: req.lyrics_source,
            spotify_url: req.spotify_url,
            youtube_url: req.youtube_url,
            apple_music_url: req.apple_music_url,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/songs",
    tag = "songs",
    params(ListParams),
    responses(
        (status = 200, description = "Page of songs", body = ApiResponse<SongList>),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_songs(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<ListParams>,
) -> Result<Reply<SongList>, ApiError> {
    let page = state
        .songs
        .list(&params.into())
        .await
        .classify_err(&classifier(&[StatusCode::BAD_REQUEST]))?;

    Ok(ok(SongList {
        pagination: page.pagination().into(),
        songs: page.items.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/songs/{id}",
    tag = "songs",
    params(("id" = Uuid, Path, description = "Song id")),
    responses(
        (status = 200, description = "The song with lyrics", body = ApiResponse<SongResponse>),
        (status = 404, description = "Song not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Reply<SongResponse>, ApiError> {
    let id: SongId = path_id(&id, "Song")?;

    let song = state
        .songs
        .get(&id)
        .await
        .classify_err(&classifier(&[StatusCode::NOT_FOUND]))?;

    Ok(ok(song.into()))
}

#[utoipa::path(
    post,
    path = "/api/songs",
    tag = "songs",
    request_body = CreateSongRequest,
    responses(
        (status = 201, description = "Song created", body = ApiResponse<SongResponse>),
        (status = 400, description = "Invalid request or unknown album/artist/genre", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 409, description = "Song title taken", body = ErrorResponse)
    ),
    security(("session" = []))
)]
#[instrument(skip(state, user, body), fields(user = %user.id))]
pub async fn create_song(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(body): ValidatedJson<CreateSongRequest>,
) -> Result<Reply<SongResponse>, ApiError> {
    let song = state
        .songs
        .create(body.into(), &user)
        .await
        .classify_err(&classifier(&[StatusCode::BAD_REQUEST, StatusCode::CONFLICT]))?;

    Ok(created(song.into()))
}

#[utoipa::path(
    put,
    path = "/api/songs/{id}",
    tag = "songs",
    params(("id" = Uuid, Path, description = "Song id")),
    request_body = UpdateSongRequest,
    responses(
        (status = 200, description = "Song updated", body = ApiResponse<SongResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Song not found", body = ErrorResponse),
        (status = 409, description = "Song title taken", body = ErrorResponse)
    ),
    security(("session" = []))
)]
#[instrument(skip(state, user, body), fields(user = %user.id))]
pub async fn update_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: CurrentUser,
    ValidatedJson(body): ValidatedJson<UpdateSongRequest>,
) -> Result<Reply<SongResponse>, ApiError> {
    let id: SongId = path_id(&id, "Song")?;

    let song = state
        .songs
        .update(&id, body.into(), user.id)
        .await
        .classify_err(&classifier(&[
            StatusCode::BAD_REQUEST,
            StatusCode::CONFLICT,
            StatusCode::NOT_FOUND,
        ]))?;

    Ok(ok(song.into()))
}

#[utoipa::path(
    delete,
    path = "/api/songs/{id}",
    tag = "songs",
    params(("id" = Uuid, Path, description = "Song id")),
    responses(
        (status = 200, description = "Song deleted", body = ApiResponse<Deleted>),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Song not found", body = ErrorResponse)
    ),
    security(("session" = []))
)]
#[instrument(skip(state, user), fields(user = %user.id))]
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> Result<Reply<Deleted>, ApiError> {
    let id: SongId = path_id(&id, "Song")?;

    state
        .songs
        .delete(&id)
        .await
        .classify_err(&classifier(&[StatusCode::NOT_FOUND]))?;

    Ok(ok(Deleted { deleted: true }))
}
