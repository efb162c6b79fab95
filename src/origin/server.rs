//! Origin service HTTP server.
//!
//! # Routes
//! - `GET /health`: liveness probe
//! - `GET /api/test`: placeholder endpoint
//!
//! Everything else falls through to the framework's 404.

use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::OriginConfig;
use crate::health::{health_router, now_rfc3339, ServiceIdentity};
use crate::http::request::trace_layer;
use crate::lifecycle::shutdown::wait_for;

/// Path of the placeholder endpoint.
pub const TEST_PATH: &str = "/api/test";

/// Fixed message returned by [`TEST_PATH`].
pub const TEST_MESSAGE: &str = "Core Server is running!";

/// Body of `GET /api/test`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResponse {
    pub message: String,
    pub timestamp: String,
}

async fn test_handler() -> Json<TestResponse> {
    Json(TestResponse {
        message: TEST_MESSAGE.to_string(),
        timestamp: now_rfc3339(),
    })
}

/// The origin service.
pub struct OriginServer {
    config: OriginConfig,
}

impl OriginServer {
    /// Create a new origin server with the given configuration.
    pub fn new(config: OriginConfig) -> Self {
        Self { config }
    }

    /// Build the Axum router. `port` is what `/health` reports.
    pub fn router(&self, port: u16) -> Router {
        let identity = ServiceIdentity::new(self.config.service.name.clone(), port);

        Router::new()
            .route(TEST_PATH, get(test_handler))
            .merge(health_router(identity))
            .layer(trace_layer())
    }

    /// Serve on an already bound listener until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            service = %self.config.service.name,
            "Origin service starting"
        );

        let app = self.router(addr.port());

        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for(shutdown))
            .await?;

        tracing::info!("Origin service stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &OriginConfig {
        &self.config
    }
}
