use clap::Parser;
use controller::config::Config;
use controller::engine::ControlPlane;
use controller::fleet::{Fleet, LocalFleet};
use controller::perimeter::AllowList;
use controller::players::PlayerDirectory;
use controller::runtime;
use log::info;
use std::path::PathBuf;
use tokio::time::Duration;

/// Runs the cloud control plane until Ctrl+C.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Command line arguments
    #[derive(Parser, Debug)]
    #[clap(author, version, about)]
    struct Args {
        /// TOML config file (falls back to $CLOUD_CONFIG)
        #[clap(short, long)]
        config: Option<PathBuf>,
        /// Address to bind the control socket to
        #[clap(short = 'H', long)]
        host: Option<String>,
        /// UDP port to listen on
        #[clap(short, long)]
        port: Option<u16>,
        /// Scheduler tick in milliseconds
        #[clap(short, long)]
        tick_ms: Option<u64>,
    }

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(tick_ms) = args.tick_ms {
        config.tick_ms = tick_ms;
    }

    let fleet = LocalFleet::new(config.templates.clone())?;
    info!(
        "Loaded {} templates, {} servers running",
        fleet.templates().count(),
        fleet.list_servers().len()
    );
    let perimeter = AllowList::new(&config.host, config.trusted_hosts.clone());

    let mut engine = ControlPlane::bind(
        &config.bind_addr(),
        perimeter,
        fleet,
        PlayerDirectory::new(),
    )?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down gracefully...");
    };

    runtime::run(&mut engine, Duration::from_millis(config.tick_ms), shutdown).await;
    Ok(())
}
