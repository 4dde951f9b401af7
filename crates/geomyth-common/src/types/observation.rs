//! Observation - a single geotagged shape claim
//!
//! Observations are append-only: once submitted they are never mutated or
//! deleted. Referential integrity against the agent directory is enforced at
//! submission time by the registry service, not here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::{BucketKey, GeoPoint};

/// One submitted (location, shape, confidence) claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub id: Uuid,
    /// The submitting agent (must reference a registered agent)
    pub agent_id: Uuid,
    #[serde(flatten)]
    pub point: GeoPoint,
    /// Free-text shape label (e.g. "serpent", "tree")
    pub observed_shape: String,
    /// Claim confidence in [0, 1]
    pub confidence: f64,
    pub evidence_url: Option<String>,
    pub methodology: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Observation {
    pub fn new(
        agent_id: Uuid,
        point: GeoPoint,
        observed_shape: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            agent_id,
            point,
            observed_shape: observed_shape.into(),
            confidence,
            evidence_url: None,
            methodology: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_evidence(mut self, url: Option<String>) -> Self {
        self.evidence_url = url;
        self
    }

    pub fn with_methodology(mut self, methodology: Option<String>) -> Self {
        self.methodology = methodology;
        self
    }

    /// The consensus bucket this observation votes in
    pub fn bucket(&self) -> BucketKey {
        self.point.bucket()
    }
}
