use std::sync::Arc;

use anyhow::Result;
use listing_viewer::{config, config::Config, console, logger::setup_logger};
use log::error;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    setup_logger()?;

    let config: Arc<Config> = Arc::new(config::read_config());

    if let Err(err) = console::run(config).await {
        error!("Error: {:?}", err)
    }

    Ok(())
}
