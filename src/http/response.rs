//! Mapping of forwarding failures to client responses.
//!
//! # Design Decisions
//! - Upstream responses, including 4xx/5xx, are relayed untouched; only
//!   failures to get a response at all become gateway errors
//! - Connection failures result in 502 Bad Gateway
//! - Upstream deadline exceeded results in 504 Gateway Timeout
//! - No route results in the framework-default empty 404

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors produced while forwarding a request.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No route rule accepted the path.
    #[error("no route matches the request path")]
    NoRoute,

    /// The upstream could not be reached or the exchange broke off.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    /// The configured upstream deadline elapsed.
    #[error("upstream did not respond within {0}s")]
    UpstreamTimeout(u64),

    /// The outbound request could not be built.
    #[error("invalid upstream request: {0}")]
    InvalidRequest(#[from] axum::http::Error),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::NoRoute => StatusCode::NOT_FOUND,
            GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
            GatewayError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::InvalidRequest(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            GatewayError::NoRoute => StatusCode::NOT_FOUND.into_response(),
            GatewayError::Upstream(_) => (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response(),
            GatewayError::UpstreamTimeout(_) => {
                (StatusCode::GATEWAY_TIMEOUT, "Gateway Timeout").into_response()
            }
            GatewayError::InvalidRequest(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
