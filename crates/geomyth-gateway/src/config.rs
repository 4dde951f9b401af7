//! Gateway service configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Gateway service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Service host
    pub host: String,
    /// Service port
    pub port: u16,
    /// Static map provider base URL for /vision/describe
    pub map_provider_base: String,
    /// API key for the static map provider
    pub map_api_key: Option<String>,
    /// External captioning endpoint for /vision/describe
    pub caption_endpoint: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8002,
            map_provider_base: "https://api.maptiler.com/maps/streets-v2/static".to_string(),
            map_api_key: None,
            caption_endpoint: None,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut cfg = Self::default();

        if let Ok(port) = std::env::var("PORT") {
            if let Ok(p) = port.parse::<u16>() {
                cfg.port = p;
            }
        }
        if let Ok(host) = std::env::var("GEOMYTH_GATEWAY_HOST") {
            cfg.host = host;
        }
        if let Ok(port) = std::env::var("GEOMYTH_GATEWAY_PORT") {
            if let Ok(p) = port.parse::<u16>() {
                cfg.port = p;
            }
        }
        if let Ok(base) = std::env::var("GEOMYTH_MAP_PROVIDER_BASE") {
            cfg.map_provider_base = base;
        }
        if let Ok(key) = std::env::var("GEOMYTH_MAP_API_KEY") {
            cfg.map_api_key = Some(key);
        }
        if let Ok(url) = std::env::var("GEOMYTH_CAPTION_URL") {
            cfg.caption_endpoint = Some(url);
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = GatewayConfig::default();
        assert_eq!(cfg.port, 8002);
        assert!(cfg.map_api_key.is_none());
        assert!(cfg.caption_endpoint.is_none());
    }
}
