//! HTTP protocol handling subsystem for the gateway.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, /health, catch-all proxy handler)
//!     → request.rs (request ID span)
//!     → [routing layer picks the first matching rule]
//!     → forward.rs (rewrite URI, set Host, send upstream)
//!     → response.rs (relay response or map failure to status)
//!     → Send to client
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use forward::Forwarder;
pub use response::GatewayError;
pub use server::{AppState, HttpServer};
