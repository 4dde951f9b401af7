//! Cortex Service Binary

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geomyth_cortex::{AppState, CortexConfig, CortexMetrics};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting Geomyth cortex v{}", geomyth_common::VERSION);

    let config = CortexConfig::load()?;
    info!("Loaded configuration: {:?}", config);

    let state = AppState {
        config: Arc::new(config.clone()),
        metrics: Arc::new(CortexMetrics::new()),
    };
    let app = geomyth_cortex::router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Cortex listening on {}", addr);

    let shutdown = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received shutdown signal");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Shutting down cortex service");
    Ok(())
}
