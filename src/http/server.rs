//! Gateway HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router: `/health` plus the catch-all proxy handler
//! - Wire up middleware (request tracing)
//! - Dispatch requests to the routing engine
//! - Forward matched requests to their upstream
//! - Observability (uniform per-request proxy logs, metrics)

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::GatewayConfig;
use crate::health::{health_router, ServiceIdentity};
use crate::http::forward::Forwarder;
use crate::http::request::trace_layer;
use crate::http::response::GatewayError;
use crate::lifecycle::shutdown::wait_for;
use crate::observability::metrics;
use crate::routing::{RouteError, Router as ProxyRouter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub forwarder: Forwarder,
    /// Log forwarded requests at `info` instead of `debug`.
    pub log_proxied_requests: bool,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    config: GatewayConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails if a route target cannot be compiled.
    pub fn new(config: GatewayConfig) -> Result<Self, RouteError> {
        let proxy_router = Arc::new(ProxyRouter::from_config(&config.routes)?);

        for rule in proxy_router.rules() {
            tracing::info!(route = rule.name(), upstream = %rule.authority(), "Route registered");
        }

        let state = AppState {
            router: proxy_router,
            forwarder: Forwarder::new(config.timeouts.upstream_secs.map(Duration::from_secs)),
            log_proxied_requests: config.observability.log_proxied_requests,
        };

        Ok(Self { config, state })
    }

    /// Build the Axum router. `port` is what `/health` reports.
    pub fn router(&self, port: u16) -> Router {
        let identity = ServiceIdentity::new(self.config.service.name.clone(), port);

        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(self.state.clone())
            .merge(health_router(identity))
            .layer(trace_layer())
    }

    /// Run the server on an already bound listener until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            service = %self.config.service.name,
            "Gateway starting"
        );

        let app = self.router(addr.port());

        // Serve with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for(shutdown))
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Main proxy handler.
/// Looks up the first matching route and forwards the request to it.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    // 1. Match Route
    let Some(rule) = state.router.match_path(&path) else {
        tracing::debug!(method = %method, path = %path, "No route matched");
        metrics::record_unmatched();
        return GatewayError::NoRoute.into_response();
    };

    // 2. Rewrite
    let upstream = match rule.upstream_uri(request.uri()) {
        Ok(uri) => uri,
        Err(e) => {
            let err = GatewayError::from(e);
            tracing::error!(route = rule.name(), path = %path, error = %err, "Failed to build upstream URI");
            metrics::record_request(rule.name(), method.as_str(), err.status().as_u16(), start);
            return err.into_response();
        }
    };

    // 3. Forward
    match state
        .forwarder
        .forward(upstream.clone(), rule.authority(), request)
        .await
    {
        Ok(response) => {
            let status = response.status();
            log_forwarded(
                state.log_proxied_requests,
                rule.name(),
                &method,
                &path,
                &upstream,
                status,
                start,
            );
            metrics::record_request(rule.name(), method.as_str(), status.as_u16(), start);
            response
        }
        Err(err) => {
            tracing::warn!(
                route = rule.name(),
                method = %method,
                path = %path,
                upstream = %upstream,
                error = %err,
                "Upstream request failed"
            );
            metrics::record_request(rule.name(), method.as_str(), err.status().as_u16(), start);
            err.into_response()
        }
    }
}

/// Emit the per-request proxy log line at the configured verbosity.
fn log_forwarded(
    verbose: bool,
    route: &str,
    method: &Method,
    path: &str,
    upstream: &Uri,
    status: StatusCode,
    start: Instant,
) {
    let elapsed_ms = start.elapsed().as_millis() as u64;
    let status = status.as_u16();
    if verbose {
        tracing::info!(route, method = %method, path, upstream = %upstream, status, elapsed_ms, "Forwarded request");
    } else {
        tracing::debug!(route, method = %method, path, upstream = %upstream, status, elapsed_ms, "Forwarded request");
    }
}
