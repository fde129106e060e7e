//! WooCommerce MCP bridge.
//!
//! This is the main entry point: it resolves configuration from the
//! environment (failing fast before any socket is bound), wires the
//! WooCommerce tool registry into the MCP server, and serves the
//! protocol endpoint.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use woomcp_server::{create_router, McpServerState};
use woomcp_woo::{registry, Config, WooClient};

const DEFAULT_ADDRESS: &str = "0.0.0.0:8000";

#[derive(Parser)]
#[command(name = "woomcp")]
#[command(author, version, about = "WooCommerce MCP bridge", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Subcommand (defaults to serve)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server
    Serve {
        /// Address to bind to
        #[arg(short, long, default_value = DEFAULT_ADDRESS)]
        address: SocketAddr,
    },
    /// Show the resolved configuration (secrets redacted)
    Config,
    /// Print version information
    Version,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config() -> anyhow::Result<Config> {
    Config::from_env().map_err(|e| {
        error!(error = %e, "Configuration error");
        anyhow::Error::new(e)
    })
}

async fn serve(address: SocketAddr) -> anyhow::Result<()> {
    let config = load_config()?;
    config.log_summary();

    let client = Arc::new(WooClient::new(&config)?);
    let tools = registry(client);

    let mut state = McpServerState::new(
        "WooCommerce MCP Server",
        env!("CARGO_PKG_VERSION"),
        tools,
    );
    if let Some(api_key) = config.api_key.clone() {
        state = state.with_api_key(api_key);
    }

    let listener = tokio::net::TcpListener::bind(address).await?;
    info!(address = %address, "Starting WooCommerce MCP server");
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Serve { address }) => serve(address).await,
        None => serve(DEFAULT_ADDRESS.parse()?).await,
        Some(Commands::Config) => {
            let config = load_config()?;
            println!("{}", config.redacted());
            Ok(())
        }
        Some(Commands::Version) => {
            println!("woomcp {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
