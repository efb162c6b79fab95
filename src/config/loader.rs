//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::config::schema::{GatewayConfig, ListenerConfig, OriginConfig};
use crate::config::validation::{validate_gateway, validate_origin, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value '{value}' for {key}: {reason}")]
    Env {
        key: String,
        value: String,
        reason: String,
    },

    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read a TOML file into `T`, or return `T::default()` when no path is given.
pub fn read_config<T>(path: Option<&Path>) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        return Ok(T::default());
    };

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load, override and validate the gateway configuration.
///
/// `env` resolves environment variables; pass `|k| std::env::var(k).ok()`
/// in production.
pub fn load_gateway<F>(path: Option<&Path>, env: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: GatewayConfig = read_config(path)?;
    apply_gateway_env(&mut config, &env)?;
    validate_gateway(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load, override and validate the origin service configuration.
pub fn load_origin<F>(path: Option<&Path>, env: F) -> Result<OriginConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: OriginConfig = read_config(path)?;
    apply_common_env(
        &mut config.service.name,
        &mut config.listener,
        &mut config.observability.log_level,
        &env,
    )?;
    validate_origin(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides to a gateway configuration.
///
/// Besides the shared variables, each route's target can be replaced with
/// `<NAME>_SERVICE_URL`, where `NAME` is the route name uppercased with
/// `-` mapped to `_`.
pub fn apply_gateway_env<F>(config: &mut GatewayConfig, env: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    apply_common_env(
        &mut config.service.name,
        &mut config.listener,
        &mut config.observability.log_level,
        env,
    )?;

    for route in &mut config.routes {
        if let Some(target) = env(&route_target_var(&route.name)) {
            route.target = target;
        }
    }
    Ok(())
}

/// Name of the variable overriding a route's target.
pub fn route_target_var(route_name: &str) -> String {
    format!(
        "{}_SERVICE_URL",
        route_name.to_ascii_uppercase().replace('-', "_")
    )
}

fn apply_common_env<F>(
    service_name: &mut String,
    listener: &mut ListenerConfig,
    log_level: &mut String,
    env: &F,
) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = env("PORT") {
        listener.port = value.trim().parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::Env {
                key: "PORT".into(),
                value: value.clone(),
                reason: e.to_string(),
            }
        })?;
    }
    if let Some(host) = env("HOST") {
        listener.host = host;
    }
    if let Some(name) = env("SERVICE_NAME") {
        *service_name = name;
    }
    if let Some(level) = env("LOG_LEVEL") {
        *log_level = level;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "service-gateway-{}-{}.toml",
            name,
            uuid::Uuid::new_v4()
        ));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn defaults_without_file_or_env() {
        let config = load_gateway(None, env_from(&[])).unwrap();
        assert_eq!(config.listener.port, 3000);
        assert_eq!(config.routes[0].target, "http://localhost:3001");
    }

    #[test]
    fn port_env_overrides_listener() {
        let config = load_origin(None, env_from(&[("PORT", "4100")])).unwrap();
        assert_eq!(config.listener.port, 4100);

        let config = load_gateway(None, env_from(&[("PORT", "8088")])).unwrap();
        assert_eq!(config.listener.port, 8088);
    }

    #[test]
    fn invalid_port_env_is_rejected() {
        let err = load_gateway(None, env_from(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { ref key, .. } if key == "PORT"));
    }

    #[test]
    fn route_targets_come_from_env() {
        let config = load_gateway(
            None,
            env_from(&[
                ("CORE_SERVICE_URL", "http://core.internal:8001"),
                ("AUTH_SERVICE_URL", "http://auth.internal:8002"),
            ]),
        )
        .unwrap();

        assert_eq!(config.routes[0].target, "http://core.internal:8001");
        assert_eq!(config.routes[1].target, "http://auth.internal:8002");
    }

    #[test]
    fn route_target_var_normalizes_name() {
        assert_eq!(route_target_var("core"), "CORE_SERVICE_URL");
        assert_eq!(route_target_var("user-profile"), "USER_PROFILE_SERVICE_URL");
    }

    #[test]
    fn env_override_is_validated() {
        let err = load_gateway(None, env_from(&[("AUTH_SERVICE_URL", "auth-service")]))
            .unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors[0].field, "routes[1].target"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reads_file_then_applies_env() {
        let path = write_temp(
            "gateway",
            r#"
                [service]
                name = "edge"

                [listener]
                port = 9000

                [[routes]]
                name = "core"
                prefix = "/core"
                target = "http://10.0.0.1:3001"
            "#,
        );

        let config = load_gateway(Some(&path), env_from(&[("PORT", "9100")])).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.service.name, "edge");
        assert_eq!(config.listener.port, 9100);
        assert_eq!(config.routes.len(), 1);
        assert_eq!(config.routes[0].prefix, "/core");
    }

    #[test]
    fn origin_file_with_gateway_only_keys_is_parse_error() {
        let path = write_temp(
            "origin",
            r#"
                [observability]
                log_level = "debug"
                metrics_address = "127.0.0.1:9100"
            "#,
        );

        let err = load_origin(Some(&path), env_from(&[])).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn log_level_env_overrides_both_services() {
        let config = load_origin(None, env_from(&[("LOG_LEVEL", "trace")])).unwrap();
        assert_eq!(config.observability.log_level, "trace");

        let config = load_gateway(None, env_from(&[("LOG_LEVEL", "warn")])).unwrap();
        assert_eq!(config.observability.log_level, "warn");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_config::<OriginConfig>(Some(Path::new("/definitely/not/here.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let path = write_temp("broken", "[listener\nport = ");
        let err = read_config::<GatewayConfig>(Some(&path)).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
