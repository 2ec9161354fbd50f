//! SQLite database health adapter

use std::time::Instant;

use application::{ApplicationError, DatabaseHealth, DatabaseHealthPort};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, instrument, warn};

/// Health check running `SELECT sqlite_version()` on the pool
#[derive(Debug, Clone)]
pub struct SqliteDatabaseHealth {
    pool: SqlitePool,
}

impl SqliteDatabaseHealth {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseHealthPort for SqliteDatabaseHealth {
    #[instrument(skip(self))]
    async fn check_health(&self) -> Result<DatabaseHealth, ApplicationError> {
        if self.pool.is_closed() {
            warn!("Database health check on closed pool");
            return Ok(DatabaseHealth::unreachable());
        }

        let start = Instant::now();
        let version: String = sqlx::query_scalar("SELECT sqlite_version()")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ApplicationError::Internal(format!("Health check query failed: {e}")))?;

        // Check latency is bounded by the service timeout
        #[allow(clippy::cast_possible_truncation)]
        let response_time_ms = start.elapsed().as_millis() as u64;

        debug!(
            %version,
            pool_size = self.pool.size(),
            response_time_ms,
            "Database health check passed"
        );
        Ok(DatabaseHealth::reachable(version, response_time_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::AsyncDatabase;

    #[tokio::test]
    async fn reports_sqlite_version() {
        let db = AsyncDatabase::in_memory().await.unwrap();
        let health = SqliteDatabaseHealth::new(db.pool().clone())
            .check_health()
            .await
            .unwrap();

        assert!(health.reachable);
        assert!(health.version.is_some_and(|v| v.starts_with('3')));
        assert!(health.response_time_ms.is_some());
    }

    #[tokio::test]
    async fn closed_pool_is_unreachable() {
        let db = AsyncDatabase::in_memory().await.unwrap();
        let check = SqliteDatabaseHealth::new(db.pool().clone());
        db.close().await;

        let health = check.check_health().await.unwrap();
        assert!(!health.reachable);
    }
}
