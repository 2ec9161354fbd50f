//! sqlx-backed user store

use application::{ApplicationError, ListQuery, Page, UserCredentials, UserStore};
use async_trait::async_trait;
use domain::{EmailAddress, User, UserId};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::{
    error::map_sqlx_error,
    sql::{count, like_pattern, limit_offset, parse_datetime, parse_id, timestamp},
};

const USER_COLUMNS: &str = "id, email, password_hash, name, first_name, last_name, bio, \
                            is_public, email_verified, created_at, updated_at";

const SEARCH_FILTER: &str = "($1 IS NULL OR first_name LIKE $1 ESCAPE '\\' \
                             OR last_name LIKE $1 ESCAPE '\\' OR email LIKE $1 ESCAPE '\\')";

/// User store using sqlx
#[derive(Debug, Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_row(
        &self,
        column: &str,
        value: String,
    ) -> Result<Option<UserRow>, ApplicationError> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {column} = $1"
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    #[instrument(skip(self))]
    async fn list(&self, query: &ListQuery) -> Result<Page<User>, ApplicationError> {
        let pattern = like_pattern(query);
        let (limit, offset) = limit_offset(query);

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users WHERE {SEARCH_FILTER}"))
                .bind(pattern.as_deref())
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {SEARCH_FILTER} \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(pattern.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let users = rows
            .into_iter()
            .map(UserRow::into_user)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(users, count(total), query))
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn get(&self, id: &UserId) -> Result<Option<User>, ApplicationError> {
        self.fetch_row("id", id.to_string())
            .await?
            .map(UserRow::into_user)
            .transpose()
    }

    #[instrument(skip(self, email))]
    async fn credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>, ApplicationError> {
        self.fetch_row("email", email.as_str().to_string())
            .await?
            .map(|mut row| {
                let password_hash = row.password_hash.take();
                row.into_user().map(|user| UserCredentials {
                    user,
                    password_hash,
                })
            })
            .transpose()
    }

    #[instrument(skip(self, user, password_hash), fields(user_id = %user.id))]
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), ApplicationError> {
        sqlx::query(
            r"
            INSERT INTO users (id, email, password_hash, name, first_name, last_name, bio,
                               is_public, email_verified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(user.id.to_string())
        .bind(user.email.as_str())
        .bind(password_hash)
        .bind(&user.name)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.bio)
        .bind(user.is_public)
        .bind(user.email_verified)
        .bind(timestamp(&user.created_at))
        .bind(timestamp(&user.updated_at))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!("User stored");
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    password_hash: Option<String>,
    name: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    bio: Option<String>,
    is_public: bool,
    email_verified: bool,
    created_at: String,
    updated_at: String,
}

impl UserRow {
    fn into_user(self) -> Result<User, ApplicationError> {
        Ok(User {
            id: parse_id(&self.id)?,
            email: EmailAddress::from_stored(self.email),
            name: self.name,
            first_name: self.first_name,
            last_name: self.last_name,
            bio: self.bio,
            is_public: self.is_public,
            email_verified: self.email_verified,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}
