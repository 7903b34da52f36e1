use std::path::PathBuf;

use anyhow::Result;
use tempsystem::{TempSystemConfig, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = TempSystemConfig::load_from_path(config_path)?;

    let telemetry = telemetry::init(&config.logging)?;
    tracing::info!(
        version = tempsystem::VERSION,
        port = config.server.port,
        "Starting web server"
    );

    let result = web::run(&config).await;
    if let Err(e) = &result {
        tracing::error!("Server exited with error: {e:#}");
    }

    telemetry.shutdown();
    result
}
