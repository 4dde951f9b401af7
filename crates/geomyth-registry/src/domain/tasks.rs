//! Task routing
//!
//! Tasks are generic method-call requests routed by method-name prefix to
//! stub acknowledgement handlers. Only the routing and bookkeeping are real;
//! the downstream services are mocked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use geomyth_common::{GeomythError, Result};

/// A stored task request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub method: String,
    pub params: serde_json::Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(agent_id: Uuid, method: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            agent_id,
            method: method.into(),
            params,
            status: "completed".to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Closed set of task destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRoute {
    VisualCortex,
    Puzzle,
    Social,
}

/// Resolve a method name to its destination, or `UnknownMethod`
pub fn route_method(method: &str) -> Result<TaskRoute> {
    if method.starts_with("visual.cortex") {
        Ok(TaskRoute::VisualCortex)
    } else if method.starts_with("puzzle") {
        Ok(TaskRoute::Puzzle)
    } else if method.starts_with("social") {
        Ok(TaskRoute::Social)
    } else {
        Err(GeomythError::UnknownMethod(method.to_string()))
    }
}

/// Stub acknowledgement payload for a routed task
pub fn acknowledge(route: TaskRoute, method: &str, cortex_url: &str) -> serde_json::Value {
    match route {
        TaskRoute::VisualCortex => serde_json::json!({
            "message": format!("Visual cortex task '{method}' accepted"),
            "visual_cortex_url": cortex_url,
        }),
        TaskRoute::Puzzle => serde_json::json!({
            "message": format!("Puzzle task '{method}' accepted"),
        }),
        TaskRoute::Social => serde_json::json!({
            "message": format!("Social task '{method}' accepted"),
        }),
    }
}
