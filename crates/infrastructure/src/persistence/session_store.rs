//! sqlx-backed session store

use application::{ApplicationError, SessionStore};
use async_trait::async_trait;
use chrono::Utc;
use domain::Session;
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::{
    error::map_sqlx_error,
    sql::{parse_datetime, parse_id, timestamp},
};

/// Session store using sqlx
#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    #[instrument(skip(self, session), fields(session_id = %session.id, user_id = %session.user_id))]
    async fn insert(&self, session: &Session) -> Result<(), ApplicationError> {
        sqlx::query(
            r"
            INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(session.id.to_string())
        .bind(session.user_id.to_string())
        .bind(&session.token_hash)
        .bind(timestamp(&session.expires_at))
        .bind(timestamp(&session.created_at))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!("Session stored");
        Ok(())
    }

    #[instrument(skip_all)]
    async fn get_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, ApplicationError> {
        let row: Option<SessionRow> = sqlx::query_as(
            r"
            SELECT id, user_id, token_hash, expires_at, created_at
            FROM sessions
            WHERE token_hash = $1
            ",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(SessionRow::into_session).transpose()
    }

    #[instrument(skip_all)]
    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<bool, ApplicationError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_expired(&self) -> Result<u64, ApplicationError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(timestamp(&Utc::now()))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: String,
    user_id: String,
    token_hash: String,
    expires_at: String,
    created_at: String,
}

impl SessionRow {
    fn into_session(self) -> Result<Session, ApplicationError> {
        Ok(Session {
            id: parse_id(&self.id)?,
            user_id: parse_id(&self.user_id)?,
            token_hash: self.token_hash,
            expires_at: parse_datetime(&self.expires_at)?,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}
