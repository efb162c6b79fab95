//! Liveness endpoint shared by both services.
//!
//! `GET /health` answers with the service identity and the port the
//! listener is actually bound to. The body is built fresh per request.

use axum::{extract::State, routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Path of the health endpoint on both services.
pub const HEALTH_PATH: &str = "/health";

/// Reported service status. Only one state exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// RFC 3339 / ISO-8601 UTC timestamp.
    pub timestamp: String,
    pub service: String,
    pub port: u16,
}

/// Identity a service reports from its health endpoint.
#[derive(Debug, Clone)]
pub struct ServiceIdentity {
    pub name: String,
    pub port: u16,
}

impl ServiceIdentity {
    pub fn new(name: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            port,
        }
    }

    /// Snapshot the current health of the service.
    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: HealthStatus::Healthy,
            timestamp: now_rfc3339(),
            service: self.name.clone(),
            port: self.port,
        }
    }
}

/// Current UTC time, millisecond precision, `Z` suffix.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn health_handler(State(identity): State<ServiceIdentity>) -> Json<HealthResponse> {
    Json(identity.health())
}

/// Router serving only the health endpoint, ready to merge.
pub fn health_router(identity: ServiceIdentity) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health_handler))
        .with_state(identity)
}
