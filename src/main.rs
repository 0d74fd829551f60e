//! Contact index - Main entry point
//!
//! Runs the JSON-lines command server over stdin/stdout against an in-memory
//! contact index.

use anyhow::Result;
use contact_index::server::{self, CommandHandler};
use contact_index::{Config, ContactServiceImpl};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Configuration first, so its log level can seed the filter
    let config = Config::from_env();
    let level = config
        .as_ref()
        .map(|cfg| cfg.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());

    // Initialize logging (stderr only to keep stdout for responses)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        "Starting contact index with merge strategy {}, name slack {}, validation {}",
        config.merge_strategy,
        config.name_slack,
        if config.validate_on_insert { "on" } else { "off" }
    );

    let service = ContactServiceImpl::new(&config);
    let mut handler = CommandHandler::new(service, config.validate_on_insert);

    // Run until stdin closes
    server::run_server(&mut handler).await?;

    let contacts = handler.service().index().len();
    info!("Contact index shutdown complete ({} contacts)", contacts);
    Ok(())
}
