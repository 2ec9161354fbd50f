//! sqlx-backed album store

use application::{AlbumStore, ApplicationError, CatalogLinks, ListQuery, Page};
use async_trait::async_trait;
use domain::{Album, AlbumId, AlbumType, Attributed, Slug};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::{
    error::map_sqlx_error,
    sql::{
        count, creator, insert_links, like_pattern, limit_offset, optional_timestamp,
        parse_datetime, parse_id, parse_optional_datetime, require_affected, timestamp,
    },
};

const ALBUM_SELECT: &str = r"
    SELECT a.id, a.title, a.slug, a.description, a.cover_image, a.release_date,
           a.album_type, a.total_tracks,
           a.created_by, a.updated_by, a.created_at, a.updated_at,
           u.name AS creator_name, u.email AS creator_email
    FROM albums a
    JOIN users u ON u.id = a.created_by
";

const SEARCH_FILTER: &str =
    "($1 IS NULL OR a.title LIKE $1 ESCAPE '\\' OR a.description LIKE $1 ESCAPE '\\')";

/// Album store using sqlx
#[derive(Debug, Clone)]
pub struct SqliteAlbumStore {
    pool: SqlitePool,
}

impl SqliteAlbumStore {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlbumStore for SqliteAlbumStore {
    #[instrument(skip(self))]
    async fn list(&self, query: &ListQuery) -> Result<Page<Attributed<Album>>, ApplicationError> {
        let pattern = like_pattern(query);
        let (limit, offset) = limit_offset(query);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM albums a WHERE {SEARCH_FILTER}"
        ))
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let rows: Vec<AlbumRow> = sqlx::query_as(&format!(
            "{ALBUM_SELECT} WHERE {SEARCH_FILTER} ORDER BY a.title ASC LIMIT $2 OFFSET $3"
        ))
        .bind(pattern.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let albums = rows
            .into_iter()
            .map(AlbumRow::into_attributed)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(albums, count(total), query))
    }

    #[instrument(skip(self), fields(album_id = %id))]
    async fn get(&self, id: &AlbumId) -> Result<Option<Attributed<Album>>, ApplicationError> {
        let row: Option<AlbumRow> = sqlx::query_as(&format!("{ALBUM_SELECT} WHERE a.id = $1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(AlbumRow::into_attributed).transpose()
    }

    #[instrument(skip(self, album, links), fields(album_id = %album.id, slug = %album.slug))]
    async fn insert(&self, album: &Album, links: &CatalogLinks) -> Result<(), ApplicationError> {
        let album_id = album.id.to_string();
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r"
            INSERT INTO albums (id, title, slug, description, cover_image, release_date,
                                album_type, total_tracks,
                                created_by, updated_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(&album_id)
        .bind(&album.title)
        .bind(album.slug.as_str())
        .bind(&album.description)
        .bind(&album.cover_image)
        .bind(optional_timestamp(album.release_date.as_ref()))
        .bind(album.album_type.as_str())
        .bind(album.total_tracks)
        .bind(album.created_by.to_string())
        .bind(album.updated_by.to_string())
        .bind(timestamp(&album.created_at))
        .bind(timestamp(&album.updated_at))
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        insert_links(
            &mut *tx,
            "album_artists",
            "album_id",
            &album_id,
            "artist_id",
            links.artist_ids.iter().map(ToString::to_string),
        )
        .await?;
        insert_links(
            &mut *tx,
            "album_genres",
            "album_id",
            &album_id,
            "genre_id",
            links.genre_ids.iter().map(ToString::to_string),
        )
        .await?;

        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(
            artists = links.artist_ids.len(),
            genres = links.genre_ids.len(),
            "Album stored"
        );
        Ok(())
    }

    #[instrument(skip(self, album), fields(album_id = %album.id))]
    async fn update(&self, album: &Album) -> Result<(), ApplicationError> {
        let result = sqlx::query(
            r"
            UPDATE albums
            SET title = $2, slug = $3, description = $4, cover_image = $5,
                release_date = $6, album_type = $7, total_tracks = $8,
                updated_by = $9, updated_at = $10
            WHERE id = $1
            ",
        )
        .bind(album.id.to_string())
        .bind(&album.title)
        .bind(album.slug.as_str())
        .bind(&album.description)
        .bind(&album.cover_image)
        .bind(optional_timestamp(album.release_date.as_ref()))
        .bind(album.album_type.as_str())
        .bind(album.total_tracks)
        .bind(album.updated_by.to_string())
        .bind(timestamp(&album.updated_at))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        require_affected(&result)
    }

    #[instrument(skip(self), fields(album_id = %id))]
    async fn delete(&self, id: &AlbumId) -> Result<(), ApplicationError> {
        let result = sqlx::query("DELETE FROM albums WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        require_affected(&result)
    }

    #[instrument(skip(self), fields(album_id = %id))]
    async fn song_count(&self, id: &AlbumId) -> Result<u64, ApplicationError> {
        let songs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs WHERE album_id = $1")
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count(songs))
    }
}

#[derive(sqlx::FromRow)]
struct AlbumRow {
    id: String,
    title: String,
    slug: String,
    description: Option<String>,
    cover_image: Option<String>,
    release_date: Option<String>,
    album_type: String,
    total_tracks: Option<i32>,
    created_by: String,
    updated_by: String,
    created_at: String,
    updated_at: String,
    creator_name: Option<String>,
    creator_email: String,
}

impl AlbumRow {
    fn into_attributed(self) -> Result<Attributed<Album>, ApplicationError> {
        let creator = creator(&self.created_by, self.creator_name, self.creator_email)?;
        let album_type = self
            .album_type
            .parse::<AlbumType>()
            .map_err(|e| ApplicationError::Internal(format!("Invalid stored album type: {e}")))?;

        let record = Album {
            id: parse_id(&self.id)?,
            title: self.title,
            slug: Slug::from_stored(self.slug),
            description: self.description,
            cover_image: self.cover_image,
            release_date: parse_optional_datetime(self.release_date.as_deref())?,
            album_type,
            total_tracks: self.total_tracks,
            created_by: creator.id,
            updated_by: parse_id(&self.updated_by)?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        };
        Ok(Attributed { record, creator })
    }
}
