//! sqlx-backed artist store

use application::{ApplicationError, ArtistStore, ListQuery, Page};
use async_trait::async_trait;
use domain::{Artist, ArtistId, Attributed, Slug};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::{
    error::map_sqlx_error,
    sql::{
        count, creator, like_pattern, limit_offset, parse_datetime, parse_id, require_affected,
        timestamp,
    },
};

const ARTIST_SELECT: &str = r"
    SELECT a.id, a.name, a.slug, a.bio, a.image, a.website, a.spotify_url,
           a.country, a.debut_year,
           a.created_by, a.updated_by, a.created_at, a.updated_at,
           u.name AS creator_name, u.email AS creator_email
    FROM artists a
    JOIN users u ON u.id = a.created_by
";

const SEARCH_FILTER: &str =
    "($1 IS NULL OR a.name LIKE $1 ESCAPE '\\' OR a.bio LIKE $1 ESCAPE '\\')";

/// Artist store using sqlx
#[derive(Debug, Clone)]
pub struct SqliteArtistStore {
    pool: SqlitePool,
}

impl SqliteArtistStore {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(
        &self,
        column: &str,
        value: String,
    ) -> Result<Option<Attributed<Artist>>, ApplicationError> {
        let row: Option<ArtistRow> =
            sqlx::query_as(&format!("{ARTIST_SELECT} WHERE a.{column} = $1"))
                .bind(value)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        row.map(ArtistRow::into_attributed).transpose()
    }
}

#[async_trait]
impl ArtistStore for SqliteArtistStore {
    #[instrument(skip(self))]
    async fn list(&self, query: &ListQuery) -> Result<Page<Attributed<Artist>>, ApplicationError> {
        let pattern = like_pattern(query);
        let (limit, offset) = limit_offset(query);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM artists a WHERE {SEARCH_FILTER}"
        ))
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let rows: Vec<ArtistRow> = sqlx::query_as(&format!(
            "{ARTIST_SELECT} WHERE {SEARCH_FILTER} ORDER BY a.name ASC LIMIT $2 OFFSET $3"
        ))
        .bind(pattern.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let artists = rows
            .into_iter()
            .map(ArtistRow::into_attributed)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(artists, count(total), query))
    }

    #[instrument(skip(self), fields(artist_id = %id))]
    async fn get(&self, id: &ArtistId) -> Result<Option<Attributed<Artist>>, ApplicationError> {
        self.fetch_one_by("id", id.to_string()).await
    }

    #[instrument(skip(self), fields(slug = %slug))]
    async fn get_by_slug(
        &self,
        slug: &Slug,
    ) -> Result<Option<Attributed<Artist>>, ApplicationError> {
        self.fetch_one_by("slug", slug.as_str().to_string()).await
    }

    #[instrument(skip(self, artist), fields(artist_id = %artist.id, slug = %artist.slug))]
    async fn insert(&self, artist: &Artist) -> Result<(), ApplicationError> {
        sqlx::query(
            r"
            INSERT INTO artists (id, name, slug, bio, image, website, spotify_url,
                                 country, debut_year,
                                 created_by, updated_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ",
        )
        .bind(artist.id.to_string())
        .bind(&artist.name)
        .bind(artist.slug.as_str())
        .bind(&artist.bio)
        .bind(&artist.image)
        .bind(&artist.website)
        .bind(&artist.spotify_url)
        .bind(&artist.country)
        .bind(artist.debut_year)
        .bind(artist.created_by.to_string())
        .bind(artist.updated_by.to_string())
        .bind(timestamp(&artist.created_at))
        .bind(timestamp(&artist.updated_at))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!("Artist stored");
        Ok(())
    }

    #[instrument(skip(self, artist), fields(artist_id = %artist.id))]
    async fn update(&self, artist: &Artist) -> Result<(), ApplicationError> {
        let result = sqlx::query(
            r"
            UPDATE artists
            SET name = $2, slug = $3, bio = $4, image = $5, website = $6,
                spotify_url = $7, country = $8, debut_year = $9,
                updated_by = $10, updated_at = $11
            WHERE id = $1
            ",
        )
        .bind(artist.id.to_string())
        .bind(&artist.name)
        .bind(artist.slug.as_str())
        .bind(&artist.bio)
        .bind(&artist.image)
        .bind(&artist.website)
        .bind(&artist.spotify_url)
        .bind(&artist.country)
        .bind(artist.debut_year)
        .bind(artist.updated_by.to_string())
        .bind(timestamp(&artist.updated_at))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        require_affected(&result)
    }

    #[instrument(skip(self), fields(artist_id = %id))]
    async fn delete(&self, id: &ArtistId) -> Result<(), ApplicationError> {
        let result = sqlx::query("DELETE FROM artists WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        require_affected(&result)
    }

    #[instrument(skip(self), fields(artist_id = %id))]
    async fn usage_count(&self, id: &ArtistId) -> Result<u64, ApplicationError> {
        let used: i64 = sqlx::query_scalar(
            r"
            SELECT (SELECT COUNT(*) FROM song_artists WHERE artist_id = $1)
                 + (SELECT COUNT(*) FROM album_artists WHERE artist_id = $1)
            ",
        )
        .bind(id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(count(used))
    }
}

#[derive(sqlx::FromRow)]
struct ArtistRow {
    id: String,
    name: String,
    slug: String,
    bio: Option<String>,
    image: Option<String>,
    website: Option<String>,
    spotify_url: Option<String>,
    country: Option<String>,
    debut_year: Option<i32>,
    created_by: String,
    updated_by: String,
    created_at: String,
    updated_at: String,
    creator_name: Option<String>,
    creator_email: String,
}

impl ArtistRow {
    fn into_attributed(self) -> Result<Attributed<Artist>, ApplicationError> {
        let creator = creator(&self.created_by, self.creator_name, self.creator_email)?;
        let record = Artist {
            id: parse_id(&self.id)?,
            name: self.name,
            slug: Slug::from_stored(self.slug),
            bio: self.bio,
            image: self.image,
            website: self.website,
            spotify_url: self.spotify_url,
            country: self.country,
            debut_year: self.debut_year,
            created_by: creator.id,
            updated_by: parse_id(&self.updated_by)?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        };
        Ok(Attributed { record, creator })
    }
}
