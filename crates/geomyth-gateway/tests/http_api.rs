//! End-to-end tests for the gateway HTTP surface

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use geomyth_gateway::{AppState, GatewayConfig, MethodRegistry};

fn app() -> Router {
    let state = AppState {
        methods: Arc::new(MethodRegistry::new()),
        config: Arc::new(GatewayConfig::default()),
        client: reqwest::Client::new(),
    };
    geomyth_gateway::router(state)
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

fn envelope(method: &str, parameters: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "id": "env-1",
        "timestamp": "2024-06-01T00:00:00Z",
        "source": "agent-1",
        "target": "gateway",
        "method": method,
        "parameters": parameters,
    })
}

#[tokio::test]
async fn test_manifest_lists_capabilities() {
    let app = app();
    let res = app.oneshot(get("/a2a/manifest")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = json_body(res).await;
    let caps = json["agent"]["capabilities"].as_array().unwrap();
    assert_eq!(caps.len(), 6);
    assert!(caps.contains(&serde_json::json!("myth.parse")));
    assert_eq!(json["methods"]["geo.link"]["version"], "v0");
}

#[tokio::test]
async fn test_handshake_known_method() {
    let app = app();
    let res = app
        .oneshot(post(
            "/a2a/handshake",
            serde_json::json!({ "method": "myth.parse" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = json_body(res).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["version"], "v0");
}

#[tokio::test]
async fn test_handshake_echoes_requested_version() {
    let app = app();
    let res = app
        .oneshot(post(
            "/a2a/handshake",
            serde_json::json!({ "method": "myth.parse", "requested_version": "v7" }),
        ))
        .await
        .unwrap();
    let json = json_body(res).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["version"], "v7");
}

#[tokio::test]
async fn test_handshake_unknown_method() {
    let app = app();
    let res = app
        .oneshot(post(
            "/a2a/handshake",
            serde_json::json!({ "method": "bogus" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = json_body(res).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "unknown_method");
}

#[tokio::test]
async fn test_execute_myth_parse() {
    let app = app();
    let res = app
        .oneshot(post(
            "/a2a/execute",
            envelope(
                "myth.parse",
                serde_json::json!({ "doc": "Pele hurled fire into the sea" }),
            ),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = json_body(res).await;
    assert_eq!(json["ok"], true);
    let motifs = json["result"]["motifs"].as_array().unwrap();
    assert_eq!(motifs.len(), 2);
    let entities = json["result"]["entities"].as_array().unwrap();
    assert_eq!(entities[0]["text"], "Pele");
}

#[tokio::test]
async fn test_execute_stub_and_unknown() {
    let app = app();

    let res = app
        .clone()
        .oneshot(post(
            "/a2a/execute",
            envelope("time.align", serde_json::json!({ "phrases": [] })),
        ))
        .await
        .unwrap();
    let json = json_body(res).await;
    assert_eq!(json["ok"], true);
    assert!(json["result"]["message"].as_str().unwrap().contains("time.align"));

    let res = app
        .oneshot(post(
            "/a2a/execute",
            envelope("bogus.method", serde_json::json!({})),
        ))
        .await
        .unwrap();
    let json = json_body(res).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "unknown_method");
}

#[tokio::test]
async fn test_describe_without_configuration_reports_error() {
    let app = app();
    let res = app
        .oneshot(post(
            "/vision/describe",
            serde_json::json!({ "north": -5.0, "south": -7.0, "east": 106.0, "west": 104.0 }),
        ))
        .await
        .unwrap();
    // failures surface as a descriptive payload, not a server fault
    assert_eq!(res.status(), StatusCode::OK);
    let json = json_body(res).await;
    assert!(json["error"].as_str().unwrap().contains("API key"));
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let res = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = json_body(res).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "geomyth-gateway");
}
