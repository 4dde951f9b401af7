//! Registry service configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};

use geomyth_common::{DEFAULT_PROGRESS_TARGET, DEFAULT_REPUTATION_PER_CONFIDENCE};

/// Registry service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Service host
    pub host: String,
    /// Service port
    pub port: u16,
    /// Connection string for a database-backed store; the in-memory store
    /// ignores it but the setting is threaded through for parity with
    /// deployments that supply one
    pub database_url: Option<String>,
    /// Base URL of the cortex service, used when composing vision layer URLs
    pub cortex_url: String,
    /// Reputation earned per unit of confidence
    pub reputation_per_confidence: f64,
    /// Validated-location target for the progress endpoint
    pub progress_target: u64,
    /// Consensus escalation thresholds
    pub consensus: ConsensusPolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            database_url: None,
            cortex_url: "http://cortex:8001".to_string(),
            reputation_per_confidence: DEFAULT_REPUTATION_PER_CONFIDENCE,
            progress_target: DEFAULT_PROGRESS_TARGET,
            consensus: ConsensusPolicy::default(),
        }
    }
}

impl RegistryConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        let mut cfg = Self::default();

        // Platform PORT variable takes priority
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(p) = port.parse::<u16>() {
                cfg.port = p;
            }
        }

        if let Ok(host) = std::env::var("GEOMYTH_REGISTRY_HOST") {
            cfg.host = host;
        }
        if let Ok(port) = std::env::var("GEOMYTH_REGISTRY_PORT") {
            if let Ok(p) = port.parse::<u16>() {
                cfg.port = p;
            }
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            cfg.database_url = Some(url);
        }
        if let Ok(url) = std::env::var("GEOMYTH_CORTEX_URL") {
            cfg.cortex_url = url;
        }
        if let Ok(val) = std::env::var("GEOMYTH_REPUTATION_PER_CONFIDENCE") {
            if let Ok(v) = val.parse() {
                cfg.reputation_per_confidence = v;
            }
        }
        if let Ok(val) = std::env::var("GEOMYTH_PROGRESS_TARGET") {
            if let Ok(v) = val.parse() {
                cfg.progress_target = v;
            }
        }

        // Consensus thresholds
        if let Ok(val) = std::env::var("GEOMYTH_CONSENSUS_EMERGING_MIN_OBSERVATIONS") {
            if let Ok(v) = val.parse() {
                cfg.consensus.emerging_min_observations = v;
            }
        }
        if let Ok(val) = std::env::var("GEOMYTH_CONSENSUS_VALIDATED_MIN_OBSERVATIONS") {
            if let Ok(v) = val.parse() {
                cfg.consensus.validated_min_observations = v;
            }
        }
        if let Ok(val) = std::env::var("GEOMYTH_CONSENSUS_VALIDATED_MIN_PERCENTAGE") {
            if let Ok(v) = val.parse() {
                cfg.consensus.validated_min_percentage = v;
            }
        }
        if let Ok(val) = std::env::var("GEOMYTH_CONSENSUS_VALIDATED_MAX_P_VALUE") {
            if let Ok(v) = val.parse() {
                cfg.consensus.validated_max_p_value = v;
            }
        }

        Ok(cfg)
    }
}

/// Escalation thresholds for the consensus status progression
///
/// These are unexplained domain constants in the upstream system, so they
/// live in configuration rather than code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusPolicy {
    pub emerging_min_observations: u64,
    pub validated_min_observations: u64,
    pub validated_min_percentage: f64,
    pub validated_max_p_value: f64,
    pub verified_min_observations: u64,
    pub verified_min_percentage: f64,
    pub verified_max_p_value: f64,
    pub published_min_observations: u64,
    pub published_min_percentage: f64,
    pub published_max_p_value: f64,
}

impl Default for ConsensusPolicy {
    fn default() -> Self {
        Self {
            emerging_min_observations: 2,
            validated_min_observations: 5,
            validated_min_percentage: 66.0,
            validated_max_p_value: 0.05,
            verified_min_observations: 10,
            verified_min_percentage: 75.0,
            verified_max_p_value: 0.01,
            published_min_observations: 25,
            published_min_percentage: 85.0,
            published_max_p_value: 0.001,
        }
    }
}
