//! Configuration schema definitions.
//!
//! This module defines the configuration structure for both services.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Service identity reported by `/health`.
    pub service: ServiceConfig,

    /// Listener configuration (bind host, port).
    pub listener: ListenerConfig,

    /// Route rules, evaluated in declaration order.
    pub routes: Vec<RouteConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "api-gateway".to_string(),
            },
            listener: ListenerConfig {
                host: default_host(),
                port: 3000,
            },
            routes: vec![
                RouteConfig {
                    name: "core".to_string(),
                    prefix: "/api/core".to_string(),
                    target: "http://localhost:3001".to_string(),
                    rewrite: Some("/api".to_string()),
                },
                RouteConfig {
                    name: "auth".to_string(),
                    prefix: "/api/auth".to_string(),
                    target: "http://localhost:3002".to_string(),
                    rewrite: None,
                },
            ],
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Root configuration for the origin service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OriginConfig {
    pub service: ServiceConfig,
    pub listener: ListenerConfig,

    /// Logging only: the origin forwards nothing and exports no metrics,
    /// so the gateway's proxy-log and metrics keys are rejected here.
    pub observability: LoggingConfig,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "core-server".to_string(),
            },
            listener: ListenerConfig {
                host: default_host(),
                port: 3001,
            },
            observability: LoggingConfig::default(),
        }
    }
}

/// Service identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Name reported in the `service` field of `/health`.
    pub name: String,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenerConfig {
    /// Bind host (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port. `0` lets the OS choose.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// A single forwarding rule.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics and env overrides.
    pub name: String,

    /// Path prefix to match (segment boundary).
    pub prefix: String,

    /// Upstream base URL (e.g., "http://localhost:3001").
    pub target: String,

    /// Replacement for the matched prefix. `None` forwards the path unchanged.
    #[serde(default)]
    pub rewrite: Option<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for an upstream exchange, in seconds. Unset means no deadline.
    pub upstream_secs: Option<u64>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Log filter and output format, shared by both services.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is not set.
    pub log_level: String,

    /// Output format for log lines.
    pub log_format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

/// Gateway observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter when `RUST_LOG` is not set.
    pub log_level: String,

    /// Output format for log lines.
    pub log_format: LogFormat,

    /// Log every forwarded request at `info` (otherwise at `debug`).
    /// Applies to all routes alike.
    pub log_proxied_requests: bool,

    /// Prometheus exporter address. Metrics are disabled when unset.
    pub metrics_address: Option<String>,
}

impl ObservabilityConfig {
    /// The logging subset of these settings.
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            log_level: self.log_level.clone(),
            log_format: self.log_format,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let logging = LoggingConfig::default();
        Self {
            log_level: logging.log_level,
            log_format: logging.log_format,
            log_proxied_requests: true,
            metrics_address: None,
        }
    }
}
