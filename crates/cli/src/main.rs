use clap::Parser;
use ferrous_doh_domain::CliOverrides;
use ferrous_doh_infrastructure::doh::{ServerHttp, ServerHttpOptions};
use std::sync::Arc;
use tracing::info;

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "ferrous-doh")]
#[command(version = "0.1.0")]
#[command(about = "Ferrous DoH - DNS over HTTPS (RFC 8484) server")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Listen address, e.g. http://0.0.0.0:8053
    #[arg(short = 'a', long)]
    address: Option<String>,

    /// Do not print the zone banner on startup
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        address: cli.address,
        quiet: cli.quiet,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting Ferrous DoH Server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        address = %config.server.address,
        zones = config.zones.len(),
        "Configuration loaded"
    );

    let sites = di::build_sites(&config)?;
    let server = Arc::new(ServerHttp::new(
        config.server.address.clone(),
        sites,
        ServerHttpOptions {
            quiet: config.server.quiet,
            ..Default::default()
        },
    )?);

    server::run_doh_server(server).await?;

    info!("Server shutdown complete");
    Ok(())
}
