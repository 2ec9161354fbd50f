//! Playlist handlers

use application::{NewPlaylist, PlaylistDetails};
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use domain::{Playlist, PlaylistChanges, PlaylistId, PlaylistItem, SongId, UserId};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{
    ApiResponse, Deleted, ListParams, PaginationResponse, Removed, Reply, created, ok, path_id,
};
use crate::{
    error::{ApiError, ErrorResponse},
    error_mapping::{ClassifyExt, ErrorClassifier},
    middleware::{CurrentUser, ValidatedJson, ValidatedQuery},
    state::AppState,
};

fn classifier(allowed: &[StatusCode]) -> ErrorClassifier {
    ErrorClassifier::new(allowed)
        .entity("playlist")
        .field("name", "playlist name")
}

fn item_classifier(allowed: &[StatusCode]) -> ErrorClassifier {
    ErrorClassifier::new(allowed)
        .entity("playlist item")
        .field("playlist_id", "song in playlist")
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub is_public: bool,
    /// Owner
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Playlist> for PlaylistResponse {
    fn from(playlist: Playlist) -> Self {
        Self {
            id: playlist.id.as_uuid(),
            name: playlist.name,
            description: playlist.description,
            cover_image: playlist.cover_image,
            is_public: playlist.is_public,
            user_id: playlist.user_id.as_uuid(),
            created_at: playlist.created_at,
            updated_at: playlist.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemResponse {
    pub id: Uuid,
    pub playlist_id: Uuid,
    pub song_id: Uuid,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl From<PlaylistItem> for PlaylistItemResponse {
    fn from(item: PlaylistItem) -> Self {
        Self {
            id: item.id.as_uuid(),
            playlist_id: item.playlist_id.as_uuid(),
            song_id: item.song_id.as_uuid(),
            position: item.position,
            created_at: item.created_at,
        }
    }
}

/// A playlist with its songs in position order
#[derive(Debug, Serialize, ToSchema)]
pub struct PlaylistDetailResponse {
    #[serde(flatten)]
    pub playlist: PlaylistResponse,
    pub items: Vec<PlaylistItemResponse>,
}

impl From<PlaylistDetails> for PlaylistDetailResponse {
    fn from(details: PlaylistDetails) -> Self {
        Self {
            playlist: details.playlist.into(),
            items: details.items.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlaylistList {
    pub playlists: Vec<PlaylistResponse>,
    pub pagination: PaginationResponse,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(url)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    /// Owner; defaults to the signed-in user
    #[schema(value_type = Option<Uuid>)]
    pub user_id: Option<UserId>,
}

impl From<CreatePlaylistRequest> for NewPlaylist {
    fn from(req: CreatePlaylistRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            cover_image: req.cover_image,
            is_public: req.is_public,
            user_id: req.user_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaylistRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(url)]
    pub cover_image: Option<String>,
    pub is_public: Option<bool>,
}

impl From<UpdatePlaylistRequest> for PlaylistChanges {
    fn from(req: UpdatePlaylistRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            cover_image: req.cover_image,
            is_public: req.is_public,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddSongRequest {
    #[schema(value_type = Uuid)]
    pub song_id: SongId,
    /// 1-based; appended after the last item when absent
    #[validate(range(min = 1))]
    pub position: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/playlists",
    tag = "playlists",
    params(ListParams),
    responses(
        (status = 200, description = "Page of playlists", body = ApiResponse<PlaylistList>),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_playlists(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<ListParams>,
) -> Result<Reply<PlaylistList>, ApiError> {
    let page = state
        .playlists
        .list(&params.into())
        .await
        .classify_err(&classifier(&[StatusCode::BAD_REQUEST]))?;

    Ok(ok(PlaylistList {
        pagination: page.pagination().into(),
        playlists: page.items.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/playlists/{id}",
    tag = "playlists",
    params(("id" = Uuid, Path, description = "Playlist id")),
    responses(
        (status = 200, description = "The playlist and its songs", body = ApiResponse<PlaylistDetailResponse>),
        (status = 404, description = "Playlist not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_playlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Reply<PlaylistDetailResponse>, ApiError> {
    let id: PlaylistId = path_id(&id, "Playlist")?;

    let details = state
        .playlists
        .get(&id)
        .await
        .classify_err(&classifier(&[StatusCode::NOT_FOUND]))?;

    Ok(ok(details.into()))
}

#[utoipa::path(
    post,
    path = "/api/playlists",
    tag = "playlists",
    request_body = CreatePlaylistRequest,
    responses(
        (status = 201, description = "Playlist created", body = ApiResponse<PlaylistResponse>),
        (status = 400, description = "Invalid request or unknown owner", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("session" = []))
)]
#[instrument(skip(state, user, body), fields(user = %user.id))]
pub async fn create_playlist(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(body): ValidatedJson<CreatePlaylistRequest>,
) -> Result<Reply<PlaylistResponse>, ApiError> {
    let playlist = state
        .playlists
        .create(body.into(), &user)
        .await
        .classify_err(&classifier(&[StatusCode::BAD_REQUEST]))?;

    Ok(created(playlist.into()))
}

#[utoipa::path(
    put,
    path = "/api/playlists/{id}",
    tag = "playlists",
    params(("id" = Uuid, Path, description = "Playlist id")),
    request_body = UpdatePlaylistRequest,
    responses(
        (status = 200, description = "Playlist updated", body = ApiResponse<PlaylistResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Playlist not found", body = ErrorResponse)
    ),
    security(("session" = []))
)]
#[instrument(skip(state, user, body), fields(user = %user.id))]
pub async fn update_playlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: CurrentUser,
    ValidatedJson(body): ValidatedJson<UpdatePlaylistRequest>,
) -> Result<Reply<PlaylistResponse>, ApiError> {
    let id: PlaylistId = path_id(&id, "Playlist")?;

    let playlist = state
        .playlists
        .update(&id, body.into())
        .await
        .classify_err(&classifier(&[StatusCode::BAD_REQUEST, StatusCode::NOT_FOUND]))?;

    Ok(ok(playlist.into()))
}

#[utoipa::path(
    delete,
    path = "/api/playlists/{id}",
    tag = "playlists",
    params(("id" = Uuid, Path, description = "Playlist id")),
    responses(
        (status = 200, description = "Playlist and its items deleted", body = ApiResponse<Deleted>),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Playlist not found", body = ErrorResponse)
    ),
    security(("session" = []))
)]
#[instrument(skip(state, user), fields(user = %user.id))]
pub async fn delete_playlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> Result<Reply<Deleted>, ApiError> {
    let id: PlaylistId = path_id(&id, "Playlist")?;

    state
        .playlists
        .delete(&id)
        .await
        .classify_err(&classifier(&[StatusCode::NOT_FOUND]))?;

    Ok(ok(Deleted { deleted: true }))
}

/// Add a song to a playlist
#[utoipa::path(
    post,
    path = "/api/playlists/{id}/songs",
    tag = "playlists",
    params(("id" = Uuid, Path, description = "Playlist id")),
    request_body = AddSongRequest,
    responses(
        (status = 201, description = "Song added", body = ApiResponse<PlaylistItemResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Playlist or song not found", body = ErrorResponse),
        (status = 409, description = "Song already in playlist", body = ErrorResponse)
    ),
    security(("session" = []))
)]
#[instrument(skip(state, user, body), fields(user = %user.id))]
pub async fn add_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: CurrentUser,
    ValidatedJson(body): ValidatedJson<AddSongRequest>,
) -> Result<Reply<PlaylistItemResponse>, ApiError> {
    let id: PlaylistId = path_id(&id, "Playlist")?;

    let item = state
        .playlists
        .add_song(&id, &body.song_id, body.position)
        .await
        .classify_err(&item_classifier(&[
            StatusCode::BAD_REQUEST,
            StatusCode::CONFLICT,
            StatusCode::NOT_FOUND,
        ]))?;

    Ok(created(item.into()))
}

/// Remove a song from a playlist
#[utoipa::path(
    delete,
    path = "/api/playlists/{id}/songs/{songId}",
    tag = "playlists",
    params(
        ("id" = Uuid, Path, description = "Playlist id"),
        ("songId" = Uuid, Path, description = "Song id")
    ),
    responses(
        (status = 200, description = "Song removed", body = ApiResponse<Removed>),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Song not found in playlist", body = ErrorResponse)
    ),
    security(("session" = []))
)]
#[instrument(skip(state, user), fields(user = %user.id))]
pub async fn remove_song(
    State(state): State<AppState>,
    Path((id, song_id)): Path<(String, String)>,
    user: CurrentUser,
) -> Result<Reply<Removed>, ApiError> {
    let id: PlaylistId = path_id(&id, "Playlist")?;
    let song_id: SongId = path_id(&song_id, "Song")?;

    state
        .playlists
        .remove_song(&id, &song_id)
        .await
        .classify_err(&item_classifier(&[StatusCode::NOT_FOUND]))?;

    Ok(ok(Removed { removed: true }))
}
