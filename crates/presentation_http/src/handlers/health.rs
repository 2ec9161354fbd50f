//! Service banner and health check handlers

use std::collections::BTreeMap;

use application::{HealthReport, ServiceHealth};
use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// Where to find things
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Endpoints {
    pub users: String,
    pub docs: String,
    pub openapi: String,
}

/// Response of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    #[schema(example = "Lyriko API")]
    pub message: String,
    pub version: String,
    pub endpoints: Endpoints,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses((status = 200, description = "Service banner", body = ServiceInfo))
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Lyriko API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: Endpoints {
            users: "/api/users".to_string(),
            docs: "/doc".to_string(),
            openapi: "/openapi.json".to_string(),
        },
    })
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check - is the server running?
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Server is running", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Status of a dependency
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ServiceHealth> for ServiceStatus {
    fn from(health: ServiceHealth) -> Self {
        Self {
            healthy: health.healthy,
            info: health.info,
            response_time_ms: health.response_time_ms,
            error: health.error,
        }
    }
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResponse {
    pub ready: bool,
    pub services: BTreeMap<String, ServiceStatus>,
    pub checked_at: DateTime<Utc>,
}

impl From<HealthReport> for ReadinessResponse {
    fn from(report: HealthReport) -> Self {
        Self {
            ready: report.healthy,
            services: report
                .services
                .into_iter()
                .map(|(name, health)| (name, health.into()))
                .collect(),
            checked_at: report.checked_at,
        }
    }
}

/// Readiness check - can the server reach its database?
#[utoipa::path(
    get,
    path = "/ready",
    tag = "system",
    responses(
        (status = 200, description = "Ready to serve", body = ReadinessResponse),
        (status = 503, description = "A dependency is down", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let report = state.health.check_all().await;
    let status_code = if report.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(report.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn banner_lists_endpoints() {
        let Json(info) = root().await;
        assert_eq!(info.message, "Lyriko API");
        assert_eq!(info.endpoints.docs, "/doc");
        assert_eq!(info.endpoints.openapi, "/openapi.json");
    }

    #[tokio::test]
    async fn liveness_reports_version() {
        let Json(resp) = health_check().await;
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn unhealthy_database_makes_report_not_ready() {
        let mut services = BTreeMap::new();
        services.insert(
            "database".to_string(),
            ServiceHealth::unhealthy("Database unreachable"),
        );
        let resp = ReadinessResponse::from(HealthReport::new(services));

        assert!(!resp.ready);
        assert_eq!(
            resp.services["database"].error.as_deref(),
            Some("Database unreachable")
        );
    }

    #[test]
    fn readiness_serialization_omits_empty_fields() {
        let status = ServiceStatus {
            healthy: true,
            info: Some("SQLite 3.45.0".to_string()),
            response_time_ms: Some(2),
            error: None,
        };
        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json["responseTimeMs"], 2);
        assert!(json.get("error").is_none());
    }
}
