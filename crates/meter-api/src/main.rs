//! Metering API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p meter-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env` if present).

use meter_common::{init_tracing, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Run the server
    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = AppConfig::from_env()?;

    // Initialize tracing
    init_tracing(config.app.env);

    info!(
        env = ?config.app.env,
        address = %config.api.address(),
        storage = ?config.storage,
        "Configuration loaded"
    );

    meter_api::run(config).await?;

    Ok(())
}
