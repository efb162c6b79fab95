//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind the listening socket once, before traffic is accepted
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, no retry on bind
//! - Listeners bind last (traffic only when ready)

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Failed to bind to address (in use, permission, unresolvable host).
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Bind the configured address.
pub async fn bind_listener(config: &ListenerConfig) -> Result<TcpListener, StartupError> {
    let address = config.bind_address();

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    let local_addr: SocketAddr = listener.local_addr().map_err(|source| StartupError::Bind {
        address: address.clone(),
        source,
    })?;

    tracing::info!(address = %local_addr, "Listener bound");
    Ok(listener)
}
