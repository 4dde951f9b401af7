//! HTTP surface of the cortex service

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use geomyth_common::{GeomythError, VERSION};

use crate::catalog::{self, Dataset};
use crate::config::CortexConfig;
use crate::metrics::CortexMetrics;
use crate::providers::{
    self, ConstellationOverlayRequest, ConstellationOverlayResponse, ImageryRequest,
    ImageryResponse, TopographyRequest, TopographyResponse,
};

/// Shared application state, one per process
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<CortexConfig>,
    pub metrics: Arc<CortexMetrics>,
}

/// Build the cortex router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/imagery", post(imagery))
        .route("/topography", post(topography))
        .route("/constellation-overlay", post(constellation_overlay))
        .route("/datasets", get(datasets))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Error wrapper mapping validation failures onto 422
pub struct ApiError(GeomythError);

impl<E: Into<GeomythError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            GeomythError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GeomythError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct DatasetsQuery {
    pub dataset_type: Option<String>,
    pub region: Option<String>,
    pub limit: Option<usize>,
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Geomyth visual cortex",
        "docs": "/datasets",
        "health": "/health",
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "geomyth-cortex",
        "version": VERSION,
        "vision_enabled": true,
        "timestamp": Utc::now(),
    }))
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [("content-type", "text/plain; version=0.0.4")],
        state.metrics.export(),
    )
}

async fn imagery(
    State(state): State<AppState>,
    Json(req): Json<ImageryRequest>,
) -> Result<Json<ImageryResponse>, ApiError> {
    state
        .metrics
        .requests_total
        .with_label_values(&["/imagery"])
        .inc();

    req.bbox.validate().map_err(GeomythError::from)?;
    let response = providers::imagery(&state.config, &req);
    info!(
        imagery_id = %response.imagery_id,
        resolution = %response.resolution,
        "imagery request"
    );
    Ok(Json(response))
}

async fn topography(
    State(state): State<AppState>,
    Json(req): Json<TopographyRequest>,
) -> Result<Json<TopographyResponse>, ApiError> {
    state
        .metrics
        .requests_total
        .with_label_values(&["/topography"])
        .inc();

    req.bbox.validate().map_err(GeomythError::from)?;
    let response = providers::topography(&state.config, &req);
    info!(
        terrain_id = %response.terrain_id,
        bathymetry = req.include_bathymetry,
        "topography request"
    );
    Ok(Json(response))
}

async fn constellation_overlay(
    State(state): State<AppState>,
    Json(req): Json<ConstellationOverlayRequest>,
) -> Json<ConstellationOverlayResponse> {
    state
        .metrics
        .requests_total
        .with_label_values(&["/constellation-overlay"])
        .inc();

    let response = providers::constellation_overlay(&req);
    info!(
        constellation = %response.constellation,
        alignment_score = response.alignment_score,
        "constellation overlay"
    );
    Json(response)
}

async fn datasets(
    State(state): State<AppState>,
    Query(query): Query<DatasetsQuery>,
) -> Json<Vec<Dataset>> {
    state
        .metrics
        .requests_total
        .with_label_values(&["/datasets"])
        .inc();

    let limit = query.limit.unwrap_or(20);
    Json(catalog::filter(
        query.dataset_type.as_deref(),
        query.region.as_deref(),
        limit,
    ))
}
