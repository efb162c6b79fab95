//! Upstream forwarding.
//!
//! # Responsibilities
//! - Send the client's request to the upstream URI chosen by routing
//! - Point the `Host` header at the upstream authority
//! - Relay the upstream response back as-is
//!
//! # Design Decisions
//! - Bodies are streamed in both directions, never buffered
//! - Outbound requests are HTTP/1.1 over a shared pooled client
//! - Exactly one attempt per request; no retries
//! - Deadline applies only when configured

use std::time::Duration;

use axum::body::Body;
use axum::http::uri::Authority;
use axum::http::{header, HeaderValue, Request, Response, Uri, Version};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::http::response::GatewayError;

/// Pooled HTTP client used for all upstream calls.
pub type HttpClient = Client<HttpConnector, Body>;

/// Sends requests to upstreams.
#[derive(Clone)]
pub struct Forwarder {
    client: HttpClient,
    upstream_timeout: Option<Duration>,
}

impl Forwarder {
    /// Create a forwarder with an optional per-request upstream deadline.
    pub fn new(upstream_timeout: Option<Duration>) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            client,
            upstream_timeout,
        }
    }

    /// Forward `request` to `upstream`, which must be an absolute URI.
    ///
    /// Method, headers and body are kept; `Host` becomes `authority`.
    pub async fn forward(
        &self,
        upstream: Uri,
        authority: &Authority,
        request: Request<Body>,
    ) -> Result<Response<Body>, GatewayError> {
        let (mut parts, body) = request.into_parts();

        parts.uri = upstream;
        parts.version = Version::HTTP_11;
        parts.headers.insert(header::HOST, host_header(authority)?);

        let call = self.client.request(Request::from_parts(parts, body));

        let response: Response<Incoming> = match self.upstream_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| GatewayError::UpstreamTimeout(limit.as_secs()))??,
            None => call.await?,
        };

        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

/// `Host` value for `authority`: host and port only, userinfo dropped.
fn host_header(authority: &Authority) -> Result<HeaderValue, axum::http::Error> {
    let value = match authority.port_u16() {
        Some(port) => format!("{}:{port}", authority.host()),
        None => authority.host().to_string(),
    };
    Ok(HeaderValue::from_str(&value)?)
}

impl Default for Forwarder {
    fn default() -> Self {
        Self::new(None)
    }
}
