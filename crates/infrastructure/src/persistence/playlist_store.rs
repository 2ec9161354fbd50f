//! sqlx-backed playlist store

use application::{ApplicationError, ListQuery, Page, PlaylistStore};
use async_trait::async_trait;
use domain::{Playlist, PlaylistId, PlaylistItem, PlaylistItemId, SongId};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::{
    error::map_sqlx_error,
    sql::{count, like_pattern, limit_offset, parse_datetime, parse_id, require_affected, timestamp},
};

const PLAYLIST_COLUMNS: &str =
    "id, name, description, cover_image, is_public, user_id, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, playlist_id, song_id, position, created_at";

const SEARCH_FILTER: &str =
    "($1 IS NULL OR name LIKE $1 ESCAPE '\\' OR description LIKE $1 ESCAPE '\\')";

/// Playlist store using sqlx
#[derive(Debug, Clone)]
pub struct SqlitePlaylistStore {
    pool: SqlitePool,
}

impl SqlitePlaylistStore {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaylistStore for SqlitePlaylistStore {
    #[instrument(skip(self))]
    async fn list(&self, query: &ListQuery) -> Result<Page<Playlist>, ApplicationError> {
        let pattern = like_pattern(query);
        let (limit, offset) = limit_offset(query);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM playlists WHERE {SEARCH_FILTER}"
        ))
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let rows: Vec<PlaylistRow> = sqlx::query_as(&format!(
            "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE {SEARCH_FILTER} \
             ORDER BY name ASC LIMIT $2 OFFSET $3"
        ))
        .bind(pattern.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let playlists = rows
            .into_iter()
            .map(PlaylistRow::into_playlist)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(playlists, count(total), query))
    }

    #[instrument(skip(self), fields(playlist_id = %id))]
    async fn get(&self, id: &PlaylistId) -> Result<Option<Playlist>, ApplicationError> {
        let row: Option<PlaylistRow> = sqlx::query_as(&format!(
            "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = $1"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(PlaylistRow::into_playlist).transpose()
    }

    #[instrument(skip(self, playlist), fields(playlist_id = %playlist.id))]
    async fn insert(&self, playlist: &Playlist) -> Result<(), ApplicationError> {
        sqlx::query(
            r"
            INSERT INTO playlists (id, name, description, cover_image, is_public, user_id,
                                   created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(playlist.id.to_string())
        .bind(&playlist.name)
        .bind(&playlist.description)
        .bind(&playlist.cover_image)
        .bind(playlist.is_public)
        .bind(playlist.user_id.to_string())
        .bind(timestamp(&playlist.created_at))
        .bind(timestamp(&playlist.updated_at))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!("Playlist stored");
        Ok(())
    }

    #[instrument(skip(self, playlist), fields(playlist_id = %playlist.id))]
    async fn update(&self, playlist: &Playlist) -> Result<(), ApplicationError> {
        let result = sqlx::query(
            r"
            UPDATE playlists
            SET name = $2, description = $3, cover_image = $4, is_public = $5,
                updated_at = $6
            WHERE id = $1
            ",
        )
        .bind(playlist.id.to_string())
        .bind(&playlist.name)
        .bind(&playlist.description)
        .bind(&playlist.cover_image)
        .bind(playlist.is_public)
        .bind(timestamp(&playlist.updated_at))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        require_affected(&result)
    }

    #[instrument(skip(self), fields(playlist_id = %id))]
    async fn delete(&self, id: &PlaylistId) -> Result<(), ApplicationError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let items = sqlx::query("DELETE FROM playlist_items WHERE playlist_id = $1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let result = sqlx::query("DELETE FROM playlists WHERE id = $1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        require_affected(&result)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(items = items.rows_affected(), "Playlist deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(playlist_id = %id))]
    async fn items(&self, id: &PlaylistId) -> Result<Vec<PlaylistItem>, ApplicationError> {
        let rows: Vec<ItemRow> = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM playlist_items WHERE playlist_id = $1 \
             ORDER BY position ASC, created_at ASC"
        ))
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(ItemRow::into_item).collect()
    }

    #[instrument(skip(self), fields(playlist_id = %id))]
    async fn item_count(&self, id: &PlaylistId) -> Result<u64, ApplicationError> {
        let items: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM playlist_items WHERE playlist_id = $1")
                .bind(id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(count(items))
    }

    #[instrument(skip(self))]
    async fn find_item(
        &self,
        playlist_id: &PlaylistId,
        song_id: &SongId,
    ) -> Result<Option<PlaylistItem>, ApplicationError> {
        let row: Option<ItemRow> = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM playlist_items WHERE playlist_id = $1 AND song_id = $2"
        ))
        .bind(playlist_id.to_string())
        .bind(song_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(ItemRow::into_item).transpose()
    }

    #[instrument(skip(self, item), fields(item_id = %item.id, position = item.position))]
    async fn add_item(&self, item: &PlaylistItem) -> Result<(), ApplicationError> {
        sqlx::query(
            r"
            INSERT INTO playlist_items (id, playlist_id, song_id, position, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(item.id.to_string())
        .bind(item.playlist_id.to_string())
        .bind(item.song_id.to_string())
        .bind(item.position)
        .bind(timestamp(&item.created_at))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    #[instrument(skip(self), fields(item_id = %id))]
    async fn remove_item(&self, id: &PlaylistItemId) -> Result<(), ApplicationError> {
        let result = sqlx::query("DELETE FROM playlist_items WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        require_affected(&result)
    }
}

#[derive(sqlx::FromRow)]
struct PlaylistRow {
    id: String,
    name: String,
    description: Option<String>,
    cover_image: Option<String>,
    is_public: bool,
    user_id: String,
    created_at: String,
    updated_at: String,
}

impl PlaylistRow {
    fn into_playlist(self) -> Result<Playlist, ApplicationError> {
        Ok(Playlist {
            id: parse_id(&self.id)?,
            name: self.name,
            description: self.description,
            cover_image: self.cover_image,
            is_public: self.is_public,
            user_id: parse_id(&self.user_id)?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: String,
    playlist_id: String,
    song_id: String,
    position: i32,
    created_at: String,
}

impl ItemRow {
    fn into_item(self) -> Result<PlaylistItem, ApplicationError> {
        Ok(PlaylistItem {
            id: parse_id(&self.id)?,
            playlist_id: parse_id(&self.playlist_id)?,
            song_id: parse_id(&self.song_id)?,
            position: self.position,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}
