//! Database readiness port

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

use crate::error::ApplicationError;

/// Result of a database health check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseHealth {
    pub reachable: bool,
    /// Engine version, when the check could read it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

impl DatabaseHealth {
    #[must_use]
    pub fn reachable(version: impl Into<String>, response_time_ms: u64) -> Self {
        Self {
            reachable: true,
            version: Some(version.into()),
            response_time_ms: Some(response_time_ms),
        }
    }

    #[must_use]
    pub const fn unreachable() -> Self {
        Self {
            reachable: false,
            version: None,
            response_time_ms: None,
        }
    }
}

/// Port for probing the database
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DatabaseHealthPort: Send + Sync {
    /// Run a trivial query and report the engine version
    async fn check_health(&self) -> Result<DatabaseHealth, ApplicationError>;
}
