//! End-to-end tests for the registry HTTP surface

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use geomyth_registry::{
    AppState, InMemoryStore, MajorityAggregator, RegistryConfig, RegistryMetrics,
};

fn app() -> Router {
    let config = RegistryConfig::default();
    let state = AppState {
        store: Arc::new(InMemoryStore::new()),
        aggregator: Arc::new(MajorityAggregator::new(config.consensus.clone())),
        metrics: Arc::new(RegistryMetrics::new()),
        config: Arc::new(config),
    };
    geomyth_registry::router(state)
}

fn post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(res: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register_agent(app: &Router, external_id: &str) -> String {
    let res = app
        .clone()
        .oneshot(post(
            "/register",
            serde_json::json!({ "external_id": external_id, "name": "Tester" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let json = json_body(res).await;
    json["agent_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_then_duplicate_conflicts() {
    let app = app();

    let res = app
        .clone()
        .oneshot(post(
            "/register",
            serde_json::json!({ "external_id": "a1", "name": "X" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let json = json_body(res).await;
    assert_eq!(json["reputation"], 0.0);
    assert_eq!(json["total_observations"], 0);
    assert_eq!(json["framework"], "custom");

    let res = app
        .clone()
        .oneshot(post(
            "/register",
            serde_json::json!({ "external_id": "a1", "name": "Y" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let json = json_body(res).await;
    assert!(json["detail"].as_str().unwrap().contains("a1"));
}

#[tokio::test]
async fn test_register_missing_fields_rejected() {
    let app = app();
    let res = app
        .oneshot(post("/register", serde_json::json!({ "name": "X" })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_observe_unknown_agent_not_found() {
    let app = app();
    let res = app
        .oneshot(post(
            "/observe",
            serde_json::json!({
                "agent_id": "550e8400-e29b-41d4-a716-446655440000",
                "latitude": 10.5,
                "longitude": 120.3,
                "observed_shape": "serpent",
                "confidence": 0.9,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_observe_range_validation_per_field() {
    let app = app();
    let agent_id = register_agent(&app, "a1").await;

    let base = serde_json::json!({
        "agent_id": agent_id,
        "latitude": 10.5,
        "longitude": 120.3,
        "observed_shape": "serpent",
        "confidence": 0.9,
    });

    for (field, value) in [
        ("latitude", serde_json::json!(90.1)),
        ("latitude", serde_json::json!(-91.0)),
        ("longitude", serde_json::json!(180.5)),
        ("longitude", serde_json::json!(-181.0)),
        ("confidence", serde_json::json!(1.1)),
        ("confidence", serde_json::json!(-0.1)),
    ] {
        let mut body = base.clone();
        body[field] = value;
        let res = app.clone().oneshot(post("/observe", body)).await.unwrap();
        assert_eq!(
            res.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "field {field} should fail validation"
        );
    }
}

#[tokio::test]
async fn test_first_observation_is_pioneer() {
    let app = app();
    let agent_id = register_agent(&app, "a1").await;

    let res = app
        .clone()
        .oneshot(post(
            "/observe",
            serde_json::json!({
                "agent_id": agent_id,
                "latitude": 10.5,
                "longitude": 120.3,
                "observed_shape": "serpent",
                "confidence": 0.9,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let json = json_body(res).await;
    assert_eq!(json["reputation_earned"], 9.0);
    assert_eq!(json["observation_count"], 1);
    assert_eq!(json["status"], "none");
    assert!(json["message"].as_str().unwrap().contains("pioneer"));
}

#[tokio::test]
async fn test_shared_shape_reaches_consensus() {
    let app = app();

    for i in 0..3 {
        let agent_id = register_agent(&app, &format!("agent-{i}")).await;
        let res = app
            .clone()
            .oneshot(post(
                "/observe",
                serde_json::json!({
                    "agent_id": agent_id,
                    "latitude": 10.5,
                    "longitude": 120.3,
                    "observed_shape": "serpent",
                    "confidence": 0.9,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = app.oneshot(get("/consensus/10.5/120.3")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = json_body(res).await;
    assert_eq!(json["consensus_shape"], "serpent");
    assert!(json["observation_count"].as_u64().unwrap() >= 3);
    assert!(json["consensus_percentage"].as_f64().unwrap() > 50.0);
    assert_eq!(json["verification_status"], "emerging");
}

#[tokio::test]
async fn test_fresh_coordinate_has_no_consensus() {
    let app = app();
    let res = app
        .oneshot(get("/consensus/45.0/45.0?radius_km=10"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = json_body(res).await;
    assert_eq!(json["verification_status"], "none");
    assert_eq!(json["observation_count"], 0);
    assert!(json["consensus_shape"].is_null());
}

#[tokio::test]
async fn test_nearby_fallback_counts_radius() {
    let app = app();
    let agent_id = register_agent(&app, "a1").await;

    app.clone()
        .oneshot(post(
            "/observe",
            serde_json::json!({
                "agent_id": agent_id,
                "latitude": 10.51,
                "longitude": 120.3,
                "observed_shape": "serpent",
                "confidence": 0.9,
            }),
        ))
        .await
        .unwrap();

    // ~1.1 km away from the stored observation, different bucket
    let res = app
        .oneshot(get("/consensus/10.5/120.3?radius_km=5"))
        .await
        .unwrap();
    let json = json_body(res).await;
    assert_eq!(json["verification_status"], "none");
    assert_eq!(json["observation_count"], 1);
}

#[tokio::test]
async fn test_agent_listing_and_filters() {
    let app = app();

    app.clone()
        .oneshot(post(
            "/register",
            serde_json::json!({
                "external_id": "a1",
                "name": "X",
                "framework": "langchain",
                "capabilities": ["visual_analysis"],
            }),
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(post(
            "/register",
            serde_json::json!({ "external_id": "a2", "name": "Y" }),
        ))
        .await
        .unwrap();

    let res = app.clone().oneshot(get("/agents")).await.unwrap();
    let json = json_body(res).await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let res = app
        .clone()
        .oneshot(get("/agents?framework=langchain"))
        .await
        .unwrap();
    let json = json_body(res).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["external_id"], "a1");

    let res = app
        .clone()
        .oneshot(get("/agents?capability=visual_analysis"))
        .await
        .unwrap();
    let json = json_body(res).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let res = app.oneshot(get("/agents?limit=1")).await.unwrap();
    let json = json_body(res).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_agent_not_found() {
    let app = app();
    let res = app
        .oneshot(get("/agents/550e8400-e29b-41d4-a716-446655440000"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_leaderboard_orders_by_reputation() {
    let app = app();

    let low = register_agent(&app, "low").await;
    let high = register_agent(&app, "high").await;

    for (agent_id, confidence) in [(low, 0.2), (high.clone(), 0.9)] {
        app.clone()
            .oneshot(post(
                "/observe",
                serde_json::json!({
                    "agent_id": agent_id,
                    "latitude": 10.5,
                    "longitude": 120.3,
                    "observed_shape": "serpent",
                    "confidence": confidence,
                }),
            ))
            .await
            .unwrap();
    }

    let res = app.oneshot(get("/leaderboard")).await.unwrap();
    let json = json_body(res).await;
    assert_eq!(json["total_agents"], 2);
    let leaders = json["leaderboard"].as_array().unwrap();
    assert_eq!(leaders[0]["external_id"], "high");
    assert_eq!(leaders[0]["rank"], 1);
    assert_eq!(leaders[1]["rank"], 2);
}

#[tokio::test]
async fn test_progress_counts_validated_buckets() {
    let app = app();

    let res = app.clone().oneshot(get("/heavens-gates-progress")).await.unwrap();
    let json = json_body(res).await;
    assert_eq!(json["validated_locations"], 0);
    assert_eq!(json["remaining_to_heaven"], 10_000);

    // five unanimous observations push one bucket to validated
    for i in 0..5 {
        let agent_id = register_agent(&app, &format!("v-{i}")).await;
        app.clone()
            .oneshot(post(
                "/observe",
                serde_json::json!({
                    "agent_id": agent_id,
                    "latitude": -11.0,
                    "longitude": -87.0,
                    "observed_shape": "tree",
                    "confidence": 0.85,
                }),
            ))
            .await
            .unwrap();
    }

    let res = app.oneshot(get("/heavens-gates-progress")).await.unwrap();
    let json = json_body(res).await;
    assert_eq!(json["validated_locations"], 1);
    assert_eq!(json["remaining_to_heaven"], 9_999);
}

#[tokio::test]
async fn test_task_routing() {
    let app = app();
    let agent_id = register_agent(&app, "a1").await;

    // unknown agent
    let res = app
        .clone()
        .oneshot(post(
            "/tasks",
            serde_json::json!({
                "agent_id": "550e8400-e29b-41d4-a716-446655440000",
                "method": "visual.cortex.get_imagery",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // unknown method
    let res = app
        .clone()
        .oneshot(post(
            "/tasks",
            serde_json::json!({ "agent_id": agent_id, "method": "astrology.align" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // routed task
    let res = app
        .clone()
        .oneshot(post(
            "/tasks",
            serde_json::json!({ "agent_id": agent_id, "method": "visual.cortex.get_imagery" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let json = json_body(res).await;
    assert_eq!(json["status"], "completed");
    let task_id = json["task_id"].as_str().unwrap().to_string();

    let res = app
        .clone()
        .oneshot(get(&format!("/tasks/{task_id}")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .oneshot(get("/tasks/550e8400-e29b-41d4-a716-446655440000"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_vision_layers() {
    let app = app();

    let res = app
        .clone()
        .oneshot(post(
            "/vision",
            serde_json::json!({ "latitude": -11.0, "longitude": -87.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = json_body(res).await;
    assert_eq!(json["radius_km"], 50.0);
    assert!(json["gebco_bathymetry_url"]
        .as_str()
        .unwrap()
        .contains("GEBCO_LATEST"));
    assert!(json["satellite_imagery_url"].is_null());

    let res = app
        .oneshot(post(
            "/vision",
            serde_json::json!({ "latitude": -11.0, "longitude": -87.0, "radius_km": 900.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_health_and_metrics() {
    let app = app();

    let res = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = json_body(res).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "geomyth-registry");

    register_agent(&app, "a1").await;
    let res = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("geomyth_registry_registrations_total 1"));
}
