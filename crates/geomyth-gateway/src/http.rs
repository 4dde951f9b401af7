//! HTTP surface of the gateway

use std::sync::Arc;

use axum::{
    extract::State,
    http::Method,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use geomyth_common::{BoundingBox, VERSION};

use crate::config::GatewayConfig;
use crate::describe;
use crate::dispatch;
use crate::envelope::Envelope;
use crate::methods::MethodRegistry;

/// Shared application state, one per process
#[derive(Clone)]
pub struct AppState {
    pub methods: Arc<MethodRegistry>,
    pub config: Arc<GatewayConfig>,
    pub client: reqwest::Client,
}

/// Build the gateway router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/a2a/manifest", get(manifest))
        .route("/a2a/handshake", post(handshake))
        .route("/a2a/execute", post(execute))
        .route("/vision/describe", post(vision_describe))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct HandshakeRequest {
    pub method: String,
    pub requested_version: Option<String>,
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "geomyth-gateway",
        "version": VERSION,
    }))
}

async fn manifest(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.methods.manifest())
}

async fn handshake(
    State(state): State<AppState>,
    Json(req): Json<HandshakeRequest>,
) -> Json<serde_json::Value> {
    match state.methods.get(&req.method) {
        None => Json(json!({
            "ok": false,
            "error": "unknown_method",
            "method": req.method,
        })),
        Some(spec) => {
            // any requested version is accepted verbatim
            let negotiated = req
                .requested_version
                .unwrap_or_else(|| spec.version.to_string());
            Json(json!({
                "ok": true,
                "method": req.method,
                "version": negotiated,
            }))
        }
    }
}

async fn execute(
    State(state): State<AppState>,
    Json(envelope): Json<Envelope>,
) -> Json<serde_json::Value> {
    info!(
        method = %envelope.method,
        source = %envelope.source,
        "dispatching envelope"
    );
    Json(dispatch::execute(&state.methods, &envelope))
}

async fn vision_describe(
    State(state): State<AppState>,
    Json(bbox): Json<BoundingBox>,
) -> Json<serde_json::Value> {
    Json(describe::describe(&state.client, &state.config, &bbox).await)
}
