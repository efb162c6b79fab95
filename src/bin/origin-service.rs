use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use service_gateway::config::{self, OriginConfig};
use service_gateway::lifecycle::{bind_listener, signals::forward_signals, Shutdown};
use service_gateway::observability::logging;
use service_gateway::OriginServer;

#[derive(Parser)]
#[command(name = "origin-service", version)]
#[command(about = "Backend service answering /health and /api/test", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "ORIGIN_CONFIG")]
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

    let mut config = match config::load_origin(cli.config.as_deref(), |key| std::env::var(key).ok())
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("origin-service: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    if let Some(host) = cli.host {
        config.listener.host = host;
    }

    if let Err(e) = logging::init(&config.observability) {
        eprintln!("origin-service: {e}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Origin service failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: OriginConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        service = %config.service.name,
        bind_address = %config.listener.bind_address(),
        "Configuration loaded"
    );

    let listener = bind_listener(&config.listener).await?;
    let server = OriginServer::new(config);

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    forward_signals(shutdown);

    server.run(listener, server_shutdown).await?;
    Ok(())
}
