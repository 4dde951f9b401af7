//! Gateway Service Binary

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geomyth_gateway::{AppState, GatewayConfig, MethodRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting Geomyth gateway v{}", geomyth_common::VERSION);

    let config = GatewayConfig::load()?;
    info!("Loaded configuration: {:?}", config);
    if config.caption_endpoint.is_none() {
        info!("No caption endpoint configured; /vision/describe will report errors");
    }

    let state = AppState {
        methods: Arc::new(MethodRegistry::new()),
        config: Arc::new(config.clone()),
        client: reqwest::Client::new(),
    };
    let app = geomyth_gateway::router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Gateway listening on {}", addr);

    let shutdown = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received shutdown signal");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Shutting down gateway service");
    Ok(())
}
