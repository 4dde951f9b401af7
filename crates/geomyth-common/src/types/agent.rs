//! Agent - a registered external client identity
//!
//! Agents are created once at registration with reputation 0 and accumulate
//! reputation and an observation count as they submit observations. Identity
//! fields are immutable after registration; reputation is monotonically
//! non-decreasing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered agent record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Generated opaque identifier
    pub id: Uuid,
    /// Client-supplied unique identifier
    pub external_id: String,
    /// Human-readable name
    pub name: String,
    /// Client framework (e.g. LangChain, AutoGen, custom)
    pub framework: String,
    /// Declared capabilities, used only for listing filters
    pub capabilities: Vec<String>,
    /// Accumulated reputation, never decreases
    pub reputation: f64,
    /// Number of observations submitted
    pub total_observations: u64,
    pub registered_at: DateTime<Utc>,
}

impl Agent {
    /// Create a fresh record with zero reputation and no observations
    pub fn new(
        external_id: impl Into<String>,
        name: impl Into<String>,
        framework: impl Into<String>,
        capabilities: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            external_id: external_id.into(),
            name: name.into(),
            framework: framework.into(),
            capabilities,
            reputation: 0.0,
            total_observations: 0,
            registered_at: Utc::now(),
        }
    }

    /// Record one submitted observation and the reputation it earned
    pub fn record_observation(&mut self, reputation_earned: f64) {
        self.total_observations += 1;
        // reputation is monotone; negative awards are dropped
        self.reputation += reputation_earned.max(0.0);
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }
}
