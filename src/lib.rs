//! Path-prefix gateway and the origin service behind it.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                   GATEWAY                    │
//!   Client Request     │  ┌────────┐   ┌─────────┐   ┌────────────┐   │
//!  ────────────────────┼─▶│  http  │──▶│ routing │──▶│  forward   │───┼──▶ Upstream
//!                      │  │ server │   │ (prefix)│   │ (rewrite,  │   │   (origin,
//!  ◀───────────────────┼──│        │◀──┴─────────┴───│  Host)     │◀──┼─── auth, ...)
//!   Client Response    │  └────────┘                 └────────────┘   │
//!                      │      │                                       │
//!                      │      └── /health (served locally)            │
//!                      └──────────────────────────────────────────────┘
//! ```
//!
//! Both services share the `config`, `health`, `lifecycle` and
//! `observability` modules. The gateway lives in `http` and `routing`; the
//! origin service lives in `origin`.

// Core subsystems
pub mod config;
pub mod health;
pub mod http;
pub mod origin;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::{GatewayConfig, OriginConfig};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use origin::OriginServer;
