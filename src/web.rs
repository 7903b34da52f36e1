use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use reqwest::Client;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::TempSystemConfig;
use crate::location_resolver::DirectoryClient;
use crate::pipeline::RequestPipeline;
use crate::weather::WeatherApiClient;

const USER_AGENT: &str = concat!("tempsystem/", env!("CARGO_PKG_VERSION"));

/// Wire the upstream clients and the pipeline into the router
pub fn app(config: &TempSystemConfig) -> Result<Router> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to create HTTP client")?;

    let locations = DirectoryClient::new(client.clone(), &config.directory.base_url);
    let api_key = config
        .weather
        .api_key
        .clone()
        .context("Missing weather API key")?;
    let weather = WeatherApiClient::new(client, &config.weather.base_url, api_key)?;

    let pipeline = RequestPipeline::new(
        Arc::new(locations),
        Arc::new(weather),
        config.request_deadline(),
    );

    Ok(api::router(Arc::new(pipeline)).layer(TraceLayer::new_for_http()))
}

pub async fn run(config: &TempSystemConfig) -> Result<()> {
    let app = app(config)?;

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")?;

    tracing::info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
