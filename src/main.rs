//! Gateway binary.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use service_gateway::config::{self, GatewayConfig};
use service_gateway::lifecycle::{bind_listener, signals::forward_signals, Shutdown};
use service_gateway::observability::{logging, metrics};
use service_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "service-gateway", version)]
#[command(about = "Forwards requests to upstream services by path prefix", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listening port (overrides PORT and the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Bind host (overrides HOST and the config file)
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match config::load_gateway(cli.config.as_deref(), |key| std::env::var(key).ok())
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("service-gateway: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    if let Some(host) = cli.host {
        config.listener.host = host;
    }

    if let Err(e) = logging::init(&config.observability.logging()) {
        eprintln!("service-gateway: {e}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Gateway failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        service = %config.service.name,
        bind_address = %config.listener.bind_address(),
        routes = config.routes.len(),
        upstream_timeout_secs = ?config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if let Some(addr) = &config.observability.metrics_address {
        metrics::init_metrics(addr.parse::<SocketAddr>()?)?;
    }

    let server = HttpServer::new(config)?;
    let listener = bind_listener(&server.config().listener).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    forward_signals(shutdown);

    server.run(listener, server_shutdown).await?;
    Ok(())
}
