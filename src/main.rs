//! Switchboard server.
//!
//! ```text
//! switchboard [--config FILE] serve    start the HTTP server
//! switchboard [--config FILE] routes   print the route table as JSON
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use switchboard::config::{load_config, ServerConfig};
use switchboard::lifecycle::{startup, Shutdown};
use switchboard::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "switchboard")]
#[command(about = "Method + path router with tiered middleware", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Key required by routes under the `api` group.
    #[arg(long, env = "SWITCHBOARD_API_KEY", default_value = "change-me")]
    api_key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Print the registered routes
    Routes,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    let router = switchboard::app::build_router(&cli.api_key)?;

    match cli.command {
        Commands::Routes => {
            println!("{}", serde_json::to_string_pretty(&router.routes())?);
        }
        Commands::Serve => {
            init_logging(&config.observability)?;
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                bind_address = %config.listener.bind_address,
                request_timeout_secs = config.timeouts.request_secs,
                "Configuration loaded"
            );

            let shutdown = Shutdown::new();
            startup::serve(config, Arc::new(router), &shutdown).await?;
            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}
