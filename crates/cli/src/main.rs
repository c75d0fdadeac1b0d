use clap::Parser;
use ferrous_relay_domain::CliOverrides;
use ferrous_relay_infrastructure::dns::UpstreamForwarder;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod server;

#[derive(Parser)]
#[command(name = "ferrous-relay")]
#[command(version)]
#[command(about = "Ferrous Relay - DNS-over-TCP forwarding front end")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Listen port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Upstream resolver (ip:port), reached over TCP
    #[arg(short = 'u', long)]
    upstream: Option<String>,

    /// Per-read timeout in seconds (0 uses the 8 s default)
    #[arg(long)]
    read_timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        port: cli.port,
        bind_address: cli.bind,
        read_timeout_secs: cli.read_timeout,
        upstream: cli.upstream,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config.logging);

    info!("Starting Ferrous Relay v{}", env!("CARGO_PKG_VERSION"));

    let upstream = config
        .upstream
        .socket_addr()
        .ok_or_else(|| anyhow::anyhow!("invalid upstream address: {}", config.upstream.address))?;
    info!(upstream = %upstream, timeout = ?config.upstream.timeout(), "Forwarding to upstream");
    let dispatcher = Arc::new(UpstreamForwarder::new(upstream, config.upstream.timeout()));

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            signal_token.cancel();
        }
    });

    if let Err(e) = server::start_dns_server(&config, dispatcher, shutdown).await {
        error!(error = %e, "DNS server error");
        return Err(e);
    }

    info!("Server shutdown complete");
    Ok(())
}
