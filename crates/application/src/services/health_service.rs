//! Readiness checks
//!
//! Checks the database with a bounded timeout and reports per-dependency
//! status for the `/ready` endpoint.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::timeout;
use tracing::{instrument, warn};

use crate::ports::DatabaseHealthPort;

/// Default timeout for a dependency check in seconds
const DEFAULT_CHECK_TIMEOUT_SECS: u64 = 5;

/// Status of one dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceHealth {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    #[must_use]
    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            healthy: false,
            info: None,
            response_time_ms: None,
            error: Some(error.into()),
        }
    }
}

/// Aggregated readiness report
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// True when every dependency is healthy
    pub healthy: bool,
    pub services: BTreeMap<String, ServiceHealth>,
    pub checked_at: DateTime<Utc>,
}

impl HealthReport {
    #[must_use]
    pub fn new(services: BTreeMap<String, ServiceHealth>) -> Self {
        Self {
            healthy: services.values().all(|s| s.healthy),
            services,
            checked_at: Utc::now(),
        }
    }
}

/// Service aggregating dependency health
#[derive(Clone)]
pub struct HealthService {
    database: Arc<dyn DatabaseHealthPort>,
    check_timeout: Duration,
}

impl std::fmt::Debug for HealthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthService")
            .field("check_timeout", &self.check_timeout)
            .finish_non_exhaustive()
    }
}

impl HealthService {
    #[must_use]
    pub fn new(database: Arc<dyn DatabaseHealthPort>) -> Self {
        Self {
            database,
            check_timeout: Duration::from_secs(DEFAULT_CHECK_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub const fn with_check_timeout(mut self, check_timeout: Duration) -> Self {
        self.check_timeout = check_timeout;
        self
    }

    #[instrument(skip(self))]
    pub async fn check_all(&self) -> HealthReport {
        let mut services = BTreeMap::new();
        services.insert("database".to_string(), self.check_database().await);
        HealthReport::new(services)
    }

    #[instrument(skip(self))]
    pub async fn check_database(&self) -> ServiceHealth {
        match timeout(self.check_timeout, self.database.check_health()).await {
            Ok(Ok(health)) if health.reachable => ServiceHealth {
                healthy: true,
                info: health.version.map(|v| format!("SQLite {v}")),
                response_time_ms: health.response_time_ms,
                error: None,
            },
            Ok(Ok(_)) => ServiceHealth::unhealthy("Database unreachable"),
            Ok(Err(e)) => {
                warn!(error = %e, "Database health check failed");
                ServiceHealth::unhealthy(e.to_string())
            },
            Err(_) => {
                warn!(timeout = ?self.check_timeout, "Database health check timed out");
                ServiceHealth::unhealthy("Health check timed out")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ApplicationError,
        ports::{DatabaseHealth, MockDatabaseHealthPort},
    };

    #[tokio::test]
    async fn reachable_database_is_healthy() {
        let mut db = MockDatabaseHealthPort::new();
        db.expect_check_health()
            .returning(|| Ok(DatabaseHealth::reachable("3.45.1", 1)));

        let report = HealthService::new(Arc::new(db)).check_all().await;
        assert!(report.healthy);
        assert_eq!(
            report.services["database"].info.as_deref(),
            Some("SQLite 3.45.1")
        );
    }

    #[tokio::test]
    async fn failing_database_check_is_unhealthy() {
        let mut db = MockDatabaseHealthPort::new();
        db.expect_check_health()
            .returning(|| Err(ApplicationError::Internal("pool closed".to_string())));

        let report = HealthService::new(Arc::new(db)).check_all().await;
        assert!(!report.healthy);
        assert_eq!(
            report.services["database"].error.as_deref(),
            Some("Internal error: pool closed")
        );
    }

    #[tokio::test]
    async fn unreachable_database_is_unhealthy() {
        let mut db = MockDatabaseHealthPort::new();
        db.expect_check_health()
            .returning(|| Ok(DatabaseHealth::unreachable()));

        let health = HealthService::new(Arc::new(db)).check_database().await;
        assert!(!health.healthy);
    }
}
