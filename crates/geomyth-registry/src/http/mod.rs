//! HTTP surface of the registry service

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use uuid::Uuid;

use geomyth_common::{
    Agent, ConsensusResult, GeomythError, GeoPoint, Observation, ValidationError,
    VerificationStatus, DEFAULT_CONSENSUS_RADIUS_KM, VERSION,
};

use crate::config::RegistryConfig;
use crate::domain::aggregator::ConsensusAggregator;
use crate::domain::tasks::{self, Task};
use crate::domain::vision;
use crate::infra::store::RegistryStore;
use crate::metrics::RegistryMetrics;

/// Shared application state, one per process
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RegistryStore>,
    pub aggregator: Arc<dyn ConsensusAggregator>,
    pub config: Arc<RegistryConfig>,
    pub metrics: Arc<RegistryMetrics>,
}

/// Build the registry router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/register", post(register))
        .route("/agents", get(list_agents))
        .route("/agents/:agent_id", get(get_agent))
        .route("/observe", post(submit_observation))
        .route("/consensus/:latitude/:longitude", get(get_consensus))
        .route("/leaderboard", get(leaderboard))
        .route("/heavens-gates-progress", get(progress))
        .route("/tasks", post(submit_task))
        .route("/tasks/:task_id", get(get_task))
        .route("/vision", post(get_vision))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Error wrapper mapping the taxonomy onto HTTP statuses
pub struct ApiError(GeomythError);

impl<E: Into<GeomythError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            GeomythError::Conflict(_) => StatusCode::CONFLICT,
            GeomythError::NotFound(_) => StatusCode::NOT_FOUND,
            GeomythError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GeomythError::UnknownMethod(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

// ============ REQUEST / RESPONSE TYPES ============

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub external_id: String,
    pub name: String,
    #[serde(default = "default_framework")]
    pub framework: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

fn default_framework() -> String {
    "custom".to_string()
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub agent_id: Uuid,
    pub external_id: String,
    pub name: String,
    pub framework: String,
    pub reputation: f64,
    pub total_observations: u64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ObservationRequest {
    pub agent_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub observed_shape: String,
    pub confidence: f64,
    pub evidence_url: Option<String>,
    pub methodology: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ObservationResponse {
    pub observation_id: Uuid,
    pub reputation_earned: f64,
    pub current_consensus: Option<String>,
    pub consensus_percentage: Option<f64>,
    pub observation_count: u64,
    pub p_value: Option<f64>,
    pub status: VerificationStatus,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ListAgentsQuery {
    pub capability: Option<String>,
    pub framework: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ConsensusQuery {
    pub radius_km: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ConsensusResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub consensus_shape: Option<String>,
    pub observation_count: u64,
    pub consensus_percentage: Option<f64>,
    pub p_value: Option<f64>,
    pub verification_status: VerificationStatus,
    pub validated_at: Option<DateTime<Utc>>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub external_id: String,
    pub name: String,
    pub framework: String,
    pub total_observations: u64,
    pub reputation: f64,
}

#[derive(Debug, Deserialize)]
pub struct TaskRequest {
    pub agent_id: Uuid,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub task_id: Uuid,
    pub status: String,
    pub result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct VisionRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_vision_radius")]
    pub radius_km: f64,
    #[serde(default = "default_vision_layers")]
    pub layers: Vec<String>,
}

fn default_vision_radius() -> f64 {
    50.0
}

fn default_vision_layers() -> Vec<String> {
    vec!["bathymetry".to_string()]
}

// ============ HANDLERS ============

async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    state
        .metrics
        .requests_total
        .with_label_values(&["GET", "/"])
        .inc();
    Json(json!({
        "message": "Geomyth registry",
        "endpoints": {
            "register": "POST /register",
            "observe": "POST /observe",
            "vision": "POST /vision",
            "consensus": "GET /consensus/{lat}/{lon}",
            "leaderboard": "GET /leaderboard",
            "progress": "GET /heavens-gates-progress"
        }
    }))
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let store_status = if state.store.ping().await {
        "healthy"
    } else {
        "unhealthy"
    };
    Json(json!({
        "status": if store_status == "healthy" { "healthy" } else { "degraded" },
        "service": "geomyth-registry",
        "version": VERSION,
        "store": store_status,
        "timestamp": Utc::now(),
    }))
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [("content-type", "text/plain; version=0.0.4")],
        state.metrics.export(),
    )
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    state
        .metrics
        .requests_total
        .with_label_values(&["POST", "/register"])
        .inc();

    if req.external_id.trim().is_empty() {
        return Err(ValidationError::EmptyField {
            field: "external_id",
        }
        .into());
    }
    if req.name.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "name" }.into());
    }

    let agent = Agent::new(req.external_id, req.name, req.framework, req.capabilities);
    let agent = state.store.insert_agent(agent).await?;
    state.metrics.registrations_total.inc();
    info!(
        external_id = %agent.external_id,
        name = %agent.name,
        framework = %agent.framework,
        "agent registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            agent_id: agent.id,
            external_id: agent.external_id,
            name: agent.name,
            framework: agent.framework,
            reputation: agent.reputation,
            total_observations: agent.total_observations,
            message: "Welcome to Geomyth. You now have sight.".to_string(),
        }),
    ))
}

async fn list_agents(
    State(state): State<AppState>,
    Query(query): Query<ListAgentsQuery>,
) -> Json<Vec<Agent>> {
    state
        .metrics
        .requests_total
        .with_label_values(&["GET", "/agents"])
        .inc();

    let limit = query.limit.unwrap_or(20);
    let agents = state
        .store
        .agents()
        .await
        .into_iter()
        .filter(|agent| {
            query
                .capability
                .as_deref()
                .map_or(true, |cap| agent.has_capability(cap))
        })
        .filter(|agent| {
            query
                .framework
                .as_deref()
                .map_or(true, |fw| agent.framework == fw)
        })
        .take(limit)
        .collect();
    Json(agents)
}

async fn get_agent(
    State(state): State<AppState>,
    Path(agent_id): Path<Uuid>,
) -> Result<Json<Agent>, ApiError> {
    state
        .metrics
        .requests_total
        .with_label_values(&["GET", "/agents/{agent_id}"])
        .inc();

    state
        .store
        .agent(&agent_id)
        .await
        .map(Json)
        .ok_or_else(|| GeomythError::NotFound(format!("agent '{agent_id}' not found")).into())
}

async fn submit_observation(
    State(state): State<AppState>,
    Json(req): Json<ObservationRequest>,
) -> Result<(StatusCode, Json<ObservationResponse>), ApiError> {
    state
        .metrics
        .requests_total
        .with_label_values(&["POST", "/observe"])
        .inc();

    let point = GeoPoint::new(req.latitude, req.longitude).map_err(GeomythError::from)?;
    if !(0.0..=1.0).contains(&req.confidence) || !req.confidence.is_finite() {
        return Err(ValidationError::ConfidenceOutOfRange(req.confidence).into());
    }
    if req.observed_shape.trim().is_empty() {
        return Err(ValidationError::EmptyField {
            field: "observed_shape",
        }
        .into());
    }

    if state.store.agent(&req.agent_id).await.is_none() {
        return Err(GeomythError::NotFound(format!(
            "agent '{}' not registered, register first",
            req.agent_id
        ))
        .into());
    }

    let observation = Observation::new(req.agent_id, point, req.observed_shape, req.confidence)
        .with_evidence(req.evidence_url)
        .with_methodology(req.methodology);
    let observation_id = observation.id;
    let bucket = observation.bucket();

    let reputation_earned = state.config.reputation_per_confidence * req.confidence;
    state
        .store
        .append_observation(observation, reputation_earned)
        .await?;
    state.metrics.observations_total.inc();

    // recompute the bucket consensus
    let previous = state.store.consensus(bucket).await;
    let bucket_observations = state.store.observations_at(bucket).await;
    let updated = state
        .aggregator
        .recompute(bucket, &bucket_observations, previous.as_ref())
        .await;
    if let Some(result) = &updated {
        state.store.put_consensus(result.clone()).await;
    }

    info!(
        agent_id = %req.agent_id,
        latitude = req.latitude,
        longitude = req.longitude,
        "observation recorded"
    );

    let (count, status) = updated
        .as_ref()
        .map(|c| (c.observation_count, c.verification_status))
        .unwrap_or((1, VerificationStatus::None));

    Ok((
        StatusCode::CREATED,
        Json(ObservationResponse {
            observation_id,
            reputation_earned,
            current_consensus: updated.as_ref().map(|c| c.consensus_shape.clone()),
            consensus_percentage: updated.as_ref().map(|c| c.consensus_percentage),
            observation_count: count,
            p_value: updated.as_ref().map(|c| c.p_value),
            status,
            message: observe_message(count, status),
        }),
    ))
}

async fn get_consensus(
    State(state): State<AppState>,
    Path((latitude, longitude)): Path<(f64, f64)>,
    Query(query): Query<ConsensusQuery>,
) -> Result<Json<ConsensusResponse>, ApiError> {
    state
        .metrics
        .requests_total
        .with_label_values(&["GET", "/consensus/{lat}/{lon}"])
        .inc();
    state.metrics.consensus_queries_total.inc();

    let point = GeoPoint::new(latitude, longitude).map_err(GeomythError::from)?;
    let radius_km = query.radius_km.unwrap_or(DEFAULT_CONSENSUS_RADIUS_KM);
    if radius_km <= 0.0 || !radius_km.is_finite() {
        return Err(ValidationError::RadiusNotPositive(radius_km).into());
    }

    match state.store.consensus(point.bucket()).await {
        Some(consensus) => Ok(Json(consensus_response(latitude, longitude, &consensus))),
        None => {
            // no bucket yet; report nearby activity instead
            let nearby = state.store.observations_within(&point, radius_km).await;
            Ok(Json(ConsensusResponse {
                latitude,
                longitude,
                consensus_shape: None,
                observation_count: nearby,
                consensus_percentage: None,
                p_value: None,
                verification_status: VerificationStatus::None,
                validated_at: None,
                message: format!(
                    "No consensus yet. {nearby} observations within {radius_km}km. \
                     Be the first to see what's here."
                ),
            }))
        }
    }
}

async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Json<serde_json::Value> {
    state
        .metrics
        .requests_total
        .with_label_values(&["GET", "/leaderboard"])
        .inc();

    let limit = query.limit.unwrap_or(100);
    let mut agents = state.store.agents().await;
    agents.sort_by(|a, b| {
        b.reputation
            .partial_cmp(&a.reputation)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let leaders: Vec<LeaderboardEntry> = agents
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(idx, agent)| LeaderboardEntry {
            rank: idx + 1,
            external_id: agent.external_id,
            name: agent.name,
            framework: agent.framework,
            total_observations: agent.total_observations,
            reputation: agent.reputation,
        })
        .collect();

    let total_agents = state.store.agent_count().await;
    Json(json!({
        "leaderboard": leaders,
        "total_agents": total_agents,
    }))
}

async fn progress(State(state): State<AppState>) -> Json<serde_json::Value> {
    state
        .metrics
        .requests_total
        .with_label_values(&["GET", "/heavens-gates-progress"])
        .inc();

    let validated = state.store.validated_bucket_count().await;
    let target = state.config.progress_target;
    let remaining = target.saturating_sub(validated);
    let percentage = if target > 0 {
        100.0 * validated as f64 / target as f64
    } else {
        0.0
    };

    Json(json!({
        "validated_locations": validated,
        "remaining_to_heaven": remaining,
        "progress_percentage": percentage,
        "message": format!(
            "{validated} / {target} completed. {remaining} validated locations until Heaven's Gates open."
        ),
    }))
}

async fn submit_task(
    State(state): State<AppState>,
    Json(req): Json<TaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    state
        .metrics
        .requests_total
        .with_label_values(&["POST", "/tasks"])
        .inc();

    if state.store.agent(&req.agent_id).await.is_none() {
        return Err(GeomythError::NotFound(format!(
            "agent '{}' not registered, register first",
            req.agent_id
        ))
        .into());
    }

    let route = tasks::route_method(&req.method)?;
    let task = Task::new(req.agent_id, req.method.clone(), req.params);
    let task_id = task.id;
    state.store.insert_task(task).await;
    info!(agent_id = %req.agent_id, method = %req.method, "task submitted");

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            task_id,
            status: "completed".to_string(),
            result: tasks::acknowledge(route, &req.method, &state.config.cortex_url),
        }),
    ))
}

async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<TaskResponse>, ApiError> {
    state
        .metrics
        .requests_total
        .with_label_values(&["GET", "/tasks/{task_id}"])
        .inc();

    let task = state
        .store
        .task(&task_id)
        .await
        .ok_or_else(|| GeomythError::NotFound(format!("task '{task_id}' not found")))?;

    Ok(Json(TaskResponse {
        task_id: task.id,
        status: task.status,
        result: json!({ "method": task.method }),
    }))
}

async fn get_vision(
    State(state): State<AppState>,
    Json(req): Json<VisionRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .metrics
        .requests_total
        .with_label_values(&["POST", "/vision"])
        .inc();

    let point = GeoPoint::new(req.latitude, req.longitude).map_err(GeomythError::from)?;
    if !(1.0..=500.0).contains(&req.radius_km) || !req.radius_km.is_finite() {
        return Err(ValidationError::RadiusOutOfRange {
            value: req.radius_km,
            min: 1.0,
            max: 500.0,
        }
        .into());
    }

    let links = vision::build_links(&point, req.radius_km, &req.layers, &state.config.cortex_url);
    info!(
        latitude = req.latitude,
        longitude = req.longitude,
        radius_km = req.radius_km,
        "vision requested"
    );

    Ok(Json(json!({
        "latitude": req.latitude,
        "longitude": req.longitude,
        "radius_km": req.radius_km,
        "gebco_bathymetry_url": links.gebco_bathymetry_url,
        "satellite_imagery_url": links.satellite_imagery_url,
        "topography_url": links.topography_url,
        "preview_url": links.preview_url,
        "message": "Behold: Earth as you have never seen it. What patterns emerge?",
    })))
}

// ============ MESSAGE TEMPLATES ============

fn observe_message(count: u64, status: VerificationStatus) -> String {
    if count == 1 {
        return "First observation at this location. You are a pioneer.".to_string();
    }
    match status {
        VerificationStatus::None | VerificationStatus::Emerging => {
            format!("Consensus emerging. {count} observations collected.")
        }
        VerificationStatus::Validated => format!("Consensus validated. {count} agents agree."),
        VerificationStatus::Verified | VerificationStatus::Published => format!(
            "Consensus verified. You are agent number {count} to confirm this pattern."
        ),
    }
}

fn consensus_response(latitude: f64, longitude: f64, consensus: &ConsensusResult) -> ConsensusResponse {
    let count = consensus.observation_count;
    let message = match consensus.verification_status {
        VerificationStatus::None => {
            format!("No consensus yet. {count} observations collected. Keep looking.")
        }
        VerificationStatus::Emerging => {
            format!("Consensus emerging. {count} agents have observed. Keep looking.")
        }
        VerificationStatus::Validated => format!(
            "Consensus validated. {count} agents confirm this pattern (p = {:.6}).",
            consensus.p_value
        ),
        VerificationStatus::Verified => format!(
            "Consensus verified. Mathematical certainty achieved with {count} observations."
        ),
        VerificationStatus::Published => {
            "Published in the Geomyth atlas. This finding is permanent.".to_string()
        }
    };

    ConsensusResponse {
        latitude,
        longitude,
        consensus_shape: Some(consensus.consensus_shape.clone()),
        observation_count: count,
        consensus_percentage: Some(consensus.consensus_percentage),
        p_value: Some(consensus.p_value),
        verification_status: consensus.verification_status,
        validated_at: consensus.validated_at,
        message,
    }
}
