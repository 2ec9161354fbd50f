//! sqlx-backed song store

use application::{ApplicationError, CatalogLinks, ListQuery, Page, SongStore};
use async_trait::async_trait;
use domain::{Attributed, Slug, Song, SongId};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::{
    error::map_sqlx_error,
    sql::{
        count, creator, insert_links, like_pattern, limit_offset, optional_timestamp,
        parse_datetime, parse_id, parse_optional_datetime, require_affected, timestamp,
    },
};

const SONG_SELECT: &str = r"
    SELECT s.id, s.title, s.slug, s.lyrics, s.duration, s.track_number, s.album_id,
           s.release_date, s.language, s.is_explicit, s.is_published,
           s.lyrics_source, s.lyrics_verified,
           s.spotify_url, s.youtube_url, s.apple_music_url,
           s.view_count, s.favorite_count,
           s.created_by, s.updated_by, s.created_at, s.updated_at,
           u.name AS creator_name, u.email AS creator_email
    FROM songs s
    JOIN users u ON u.id = s.created_by
";

const SEARCH_FILTER: &str =
    "($1 IS NULL OR s.title LIKE $1 ESCAPE '\\' OR s.lyrics LIKE $1 ESCAPE '\\')";

/// Song store using sqlx
#[derive(Debug, Clone)]
pub struct SqliteSongStore {
    pool: SqlitePool,
}

impl SqliteSongStore {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SongStore for SqliteSongStore {
    #[instrument(skip(self))]
    async fn list(&self, query: &ListQuery) -> Result<Page<Attributed<Song>>, ApplicationError> {
        let pattern = like_pattern(query);
        let (limit, offset) = limit_offset(query);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM songs s WHERE {SEARCH_FILTER}"
        ))
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let rows: Vec<SongRow> = sqlx::query_as(&format!(
            "{SONG_SELECT} WHERE {SEARCH_FILTER} ORDER BY s.title ASC LIMIT $2 OFFSET $3"
        ))
        .bind(pattern.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let songs = rows
            .into_iter()
            .map(SongRow::into_attributed)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(songs, count(total), query))
    }

    #[instrument(skip(self), fields(song_id = %id))]
    async fn get(&self, id: &SongId) -> Result<Option<Attributed<Song>>, ApplicationError> {
        let row: Option<SongRow> = sqlx::query_as(&format!("{SONG_SELECT} WHERE s.id = $1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(SongRow::into_attributed).transpose()
    }

    #[instrument(skip(self, song, links), fields(song_id = %song.id, slug = %song.slug))]
    async fn insert(&self, song: &Song, links: &CatalogLinks) -> Result<(), ApplicationError> {
        let song_id = song.id.to_string();
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r"
            INSERT INTO songs (id, title, slug, lyrics, duration, track_number, album_id,
                               release_date, language, is_explicit, is_published,
                               lyrics_source, lyrics_verified,
                               spotify_url, youtube_url, apple_music_url,
                               view_count, favorite_count,
                               created_by, updated_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21, $22)
            ",
        )
        .bind(&song_id)
        .bind(&song.title)
        .bind(song.slug.as_str())
        .bind(&song.lyrics)
        .bind(song.duration)
        .bind(song.track_number)
        .bind(song.album_id.map(|id| id.to_string()))
        .bind(optional_timestamp(song.release_date.as_ref()))
        .bind(&song.language)
        .bind(song.is_explicit)
        .bind(song.is_published)
        .bind(&song.lyrics_source)
        .bind(song.lyrics_verified)
        .bind(&song.spotify_url)
        .bind(&song.youtube_url)
        .bind(&song.apple_music_url)
        .bind(song.view_count)
        .bind(song.favorite_count)
        .bind(song.created_by.to_string())
        .bind(song.updated_by.to_string())
        .bind(timestamp(&song.created_at))
        .bind(timestamp(&song.updated_at))
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        insert_links(
            &mut *tx,
            "song_artists",
            "song_id",
            &song_id,
            "artist_id",
            links.artist_ids.iter().map(ToString::to_string),
        )
        .await?;
        insert_links(
            &mut *tx,
            "song_genres",
            "song_id",
            &song_id,
            "genre_id",
            links.genre_ids.iter().map(ToString::to_string),
        )
        .await?;

        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(
            artists = links.artist_ids.len(),
            genres = links.genre_ids.len(),
            "Song stored"
        );
        Ok(())
    }

    #[instrument(skip(self, song), fields(song_id = %song.id))]
    async fn update(&self, song: &Song) -> Result<(), ApplicationError> {
        let result = sqlx::query(
            r"
            UPDATE songs
            SET title = $2, slug = $3, lyrics = $4, duration = $5, track_number = $6,
                album_id = $7, release_date = $8, language = $9, is_explicit = $10,
                is_published = $11, lyrics_source = $12, spotify_url = $13,
                youtube_url = $14, apple_music_url = $15,
                updated_by = $16, updated_at = $17
            WHERE id = $1
            ",
        )
        .bind(song.id.to_string())
        .bind(&song.title)
        .bind(song.slug.as_str())
        .bind(&song.lyrics)
        .bind(song.duration)
        .bind(song.track_number)
        .bind(song.album_id.map(|id| id.to_string()))
        .bind(optional_timestamp(song.release_date.as_ref()))
        .bind(&song.language)
        .bind(song.is_explicit)
        .bind(song.is_published)
        .bind(&song.lyrics_source)
        .bind(&song.spotify_url)
        .bind(&song.youtube_url)
        .bind(&song.apple_music_url)
        .bind(song.updated_by.to_string())
        .bind(timestamp(&song.updated_at))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        require_affected(&result)
    }

    #[instrument(skip(self), fields(song_id = %id))]
    async fn delete(&self, id: &SongId) -> Result<(), ApplicationError> {
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        require_affected(&result)
    }
}

#[derive(sqlx::FromRow)]
struct SongRow {
    id: String,
    title: String,
    slug: String,
    lyrics: String,
    duration: Option<i32>,
    track_number: Option<i32>,
    album_id: Option<String>,
    release_date: Option<String>,
    language: Option<String>,
    is_explicit: bool,
    is_published: bool,
    lyrics_source: Option<String>,
    lyrics_verified: bool,
    spotify_url: Option<String>,
    youtube_url: Option<String>,
    apple_music_url: Option<String>,
    view_count: i64,
    favorite_count: i64,
    created_by: String,
    updated_by: String,
    created_at: String,
    updated_at: String,
    creator_name: Option<String>,
    creator_email: String,
}

impl SongRow {
    fn into_attributed(self) -> Result<Attributed<Song>, ApplicationError> {
        let creator = creator(&self.created_by, self.creator_name, self.creator_email)?;
        let record = Song {
            id: parse_id(&self.id)?,
            title: self.title,
            slug: Slug::from_stored(self.slug),
            lyrics: self.lyrics,
            duration: self.duration,
            track_number: self.track_number,
            album_id: self.album_id.as_deref().map(parse_id).transpose()?,
            release_date: parse_optional_datetime(self.release_date.as_deref())?,
            language: self.language,
            is_explicit: self.is_explicit,
            is_published: self.is_published,
            lyrics_source: self.lyrics_source,
            lyrics_verified: self.lyrics_verified,
            spotify_url: self.spotify_url,
            youtube_url: self.youtube_url,
            apple_music_url: self.apple_music_url,
            view_count: self.view_count,
            favorite_count: self.favorite_count,
            created_by: creator.id,
            updated_by: parse_id(&self.updated_by)?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        };
        Ok(Attributed { record, creator })
    }
}
