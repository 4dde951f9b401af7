//! Envelope - the generic request wrapper for method dispatch

use serde::{Deserialize, Serialize};

/// A dispatch envelope carrying one method call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub id: String,
    pub timestamp: String,
    pub source: String,
    pub target: String,
    pub method: String,
    #[serde(default)]
    pub parameters: serde_json::Value,
    #[serde(default)]
    pub auth: Option<serde_json::Value>,
    #[serde(default)]
    pub provenance: Option<serde_json::Value>,
}
