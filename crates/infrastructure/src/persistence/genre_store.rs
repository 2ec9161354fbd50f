//! sqlx-backed genre store

use application::{ApplicationError, GenreStore, ListQuery, Page};
use async_trait::async_trait;
use domain::{Attributed, Genre, GenreId, Slug};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::{
    error::map_sqlx_error,
    sql::{
        count, creator, like_pattern, limit_offset, parse_datetime, parse_id, require_affected,
        timestamp,
    },
};

const GENRE_SELECT: &str = r"
    SELECT g.id, g.name, g.slug, g.description, g.color,
           g.created_by, g.updated_by, g.created_at, g.updated_at,
           u.name AS creator_name, u.email AS creator_email
    FROM genres g
    JOIN users u ON u.id = g.created_by
";

const SEARCH_FILTER: &str =
    "($1 IS NULL OR g.name LIKE $1 ESCAPE '\\' OR g.description LIKE $1 ESCAPE '\\')";

/// Genre store using sqlx
#[derive(Debug, Clone)]
pub struct SqliteGenreStore {
    pool: SqlitePool,
}

impl SqliteGenreStore {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenreStore for SqliteGenreStore {
    #[instrument(skip(self))]
    async fn list(&self, query: &ListQuery) -> Result<Page<Attributed<Genre>>, ApplicationError> {
        let pattern = like_pattern(query);
        let (limit, offset) = limit_offset(query);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM genres g WHERE {SEARCH_FILTER}"
        ))
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let rows: Vec<GenreRow> = sqlx::query_as(&format!(
            "{GENRE_SELECT} WHERE {SEARCH_FILTER} ORDER BY g.name ASC LIMIT $2 OFFSET $3"
        ))
        .bind(pattern.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let genres = rows
            .into_iter()
            .map(GenreRow::into_attributed)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(genres, count(total), query))
    }

    #[instrument(skip(self), fields(genre_id = %id))]
    async fn get(&self, id: &GenreId) -> Result<Option<Attributed<Genre>>, ApplicationError> {
        let row: Option<GenreRow> = sqlx::query_as(&format!("{GENRE_SELECT} WHERE g.id = $1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(GenreRow::into_attributed).transpose()
    }

    #[instrument(skip(self, genre), fields(genre_id = %genre.id, slug = %genre.slug))]
    async fn insert(&self, genre: &Genre) -> Result<(), ApplicationError> {
        sqlx::query(
            r"
            INSERT INTO genres (id, name, slug, description, color,
                                created_by, updated_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(genre.id.to_string())
        .bind(&genre.name)
        .bind(genre.slug.as_str())
        .bind(&genre.description)
        .bind(&genre.color)
        .bind(genre.created_by.to_string())
        .bind(genre.updated_by.to_string())
        .bind(timestamp(&genre.created_at))
        .bind(timestamp(&genre.updated_at))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!("Genre stored");
        Ok(())
    }

    #[instrument(skip(self, genre), fields(genre_id = %genre.id))]
    async fn update(&self, genre: &Genre) -> Result<(), ApplicationError> {
        let result = sqlx::query(
            r"
            UPDATE genres
            SET name = $2, slug = $3, description = $4, color = $5,
                updated_by = $6, updated_at = $7
            WHERE id = $1
            ",
        )
        .bind(genre.id.to_string())
        .bind(&genre.name)
        .bind(genre.slug.as_str())
        .bind(&genre.description)
        .bind(&genre.color)
        .bind(genre.updated_by.to_string())
        .bind(timestamp(&genre.updated_at))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        require_affected(&result)
    }

    #[instrument(skip(self), fields(genre_id = %id))]
    async fn delete(&self, id: &GenreId) -> Result<(), ApplicationError> {
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        require_affected(&result)
    }

    #[instrument(skip(self), fields(genre_id = %id))]
    async fn usage_count(&self, id: &GenreId) -> Result<u64, ApplicationError> {
        let used: i64 = sqlx::query_scalar(
            r"
            SELECT (SELECT COUNT(*) FROM song_genres WHERE genre_id = $1)
                 + (SELECT COUNT(*) FROM album_genres WHERE genre_id = $1)
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
struct GenreRow {
    id: String,
    name: String,
    slug: String,
    description: Option<String>,
    color: Option<String>,
    created_by: String,
    updated_by: String,
    created_at: String,
    updated_at: String,
    creator_name: Option<String>,
    creator_email: String,
}

impl GenreRow {
    fn into_attributed(self) -> Result<Attributed<Genre>, ApplicationError> {
        let creator = creator(&self.created_by, self.creator_name, self.creator_email)?;
        let record = Genre {
            id: parse_id(&self.id)?,
            name: self.name,
            slug: Slug::from_stored(self.slug),
            description: self.description,
            color: self.color,
            created_by: creator.id,
            updated_by: parse_id(&self.updated_by)?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        };
        Ok(Attributed { record, creator })
    }
}
