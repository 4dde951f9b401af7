//! Registry Service Binary

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geomyth_registry::{
    AppState, InMemoryStore, MajorityAggregator, RegistryConfig, RegistryMetrics,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting Geomyth registry v{}", geomyth_common::VERSION);

    // Load configuration
    let config = RegistryConfig::load()?;
    info!("Loaded configuration: {:?}", config);
    if config.database_url.is_some() {
        info!("DATABASE_URL set; the in-memory store ignores it in this build");
    }

    let state = AppState {
        store: Arc::new(InMemoryStore::new()),
        aggregator: Arc::new(MajorityAggregator::new(config.consensus.clone())),
        metrics: Arc::new(RegistryMetrics::new()),
        config: Arc::new(config.clone()),
    };

    let app = geomyth_registry::router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Registry listening on {}", addr);

    let shutdown = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received shutdown signal");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Shutting down registry service");
    Ok(())
}
