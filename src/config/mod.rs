//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file replaces defaults table by table)
//!     → loader.rs (environment overrides: PORT, HOST, <ROUTE>_SERVICE_URL, ...)
//!     → validation.rs (semantic checks, all errors collected)
//!     → GatewayConfig / OriginConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never reloaded
//! - All fields have defaults so the services start without a file
//! - Upstream hosts are configuration, never constants in routing code

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_gateway, load_origin, ConfigError};
pub use schema::{
    GatewayConfig, ListenerConfig, LogFormat, LoggingConfig, ObservabilityConfig, OriginConfig,
    RouteConfig, ServiceConfig, TimeoutConfig,
};
pub use validation::ValidationError;
