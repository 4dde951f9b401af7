//! Cortex service configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Cortex service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CortexConfig {
    /// Service host
    pub host: String,
    /// Service port
    pub port: u16,
    /// Base for generated data object URLs
    pub data_base_url: String,
    /// Base for generated preview/thumbnail URLs
    pub cdn_base_url: String,
}

impl Default for CortexConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            data_base_url: "s3://geomyth-visual-data".to_string(),
            cdn_base_url: "https://cdn.geomyth.org".to_string(),
        }
    }
}

impl CortexConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut cfg = Self::default();

        if let Ok(port) = std::env::var("PORT") {
            if let Ok(p) = port.parse::<u16>() {
                cfg.port = p;
            }
        }
        if let Ok(host) = std::env::var("GEOMYTH_CORTEX_HOST") {
            cfg.host = host;
        }
        if let Ok(port) = std::env::var("GEOMYTH_CORTEX_PORT") {
            if let Ok(p) = port.parse::<u16>() {
                cfg.port = p;
            }
        }
        if let Ok(url) = std::env::var("GEOMYTH_CORTEX_DATA_BASE_URL") {
            cfg.data_base_url = url;
        }
        if let Ok(url) = std::env::var("GEOMYTH_CORTEX_CDN_BASE_URL") {
            cfg.cdn_base_url = url;
        }

        Ok(cfg)
    }
}
