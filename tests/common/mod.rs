//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use service_gateway::config::{GatewayConfig, OriginConfig};
use service_gateway::lifecycle::{bind_listener, Shutdown};
use service_gateway::{HttpServer, OriginServer};
use tokio::net::TcpListener;

/// A request as seen by a mock upstream.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub host: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

/// Mock upstream that records every request and answers with a fixed response.
pub struct RecordingBackend {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<Captured>>>,
}

impl RecordingBackend {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }
}

/// Start a mock upstream answering `status` with `body` and an
/// `x-upstream: recording` header.
pub async fn start_recording_backend(status: u16, body: &'static str) -> RecordingBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();

    let app = axum::Router::new().fallback(move |request: Request<Body>| {
        let sink = sink.clone();
        async move {
            let (parts, incoming) = request.into_parts();
            let bytes = axum::body::to_bytes(incoming, usize::MAX).await.unwrap();
            let header_str = |name: header::HeaderName| {
                parts
                    .headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };

            sink.lock().unwrap().push(Captured {
                method: parts.method.to_string(),
                path: parts.uri.path().to_string(),
                query: parts.uri.query().map(str::to_string),
                host: header_str(header::HOST),
                content_type: header_str(header::CONTENT_TYPE),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });

            (
                StatusCode::from_u16(status).unwrap(),
                [("x-upstream", "recording")],
                body,
            )
        }
    });

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    RecordingBackend { addr, captured }
}

/// Start the origin service on an ephemeral loopback port.
pub async fn start_origin(mut config: OriginConfig, shutdown: &Shutdown) -> SocketAddr {
    config.listener.host = "127.0.0.1".into();
    if config.listener.port == OriginConfig::default().listener.port {
        config.listener.port = 0;
    }

    let listener = bind_listener(&config.listener).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = OriginServer::new(config);
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    addr
}

/// Start the gateway on an ephemeral loopback port.
pub async fn start_gateway(mut config: GatewayConfig, shutdown: &Shutdown) -> SocketAddr {
    config.listener.host = "127.0.0.1".into();
    if config.listener.port == GatewayConfig::default().listener.port {
        config.listener.port = 0;
    }

    let server = HttpServer::new(config).unwrap();
    let listener = bind_listener(&server.config().listener).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    addr
}

/// Gateway config whose `core` and `auth` routes point at the given bases.
pub fn gateway_config(core: &str, auth: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.routes[0].target = core.to_string();
    config.routes[1].target = auth.to_string();
    config
}

/// A port nothing is listening on.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Non-pooled client that ignores proxy environment variables.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
