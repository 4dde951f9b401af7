//! Prometheus metrics for the cortex service

use anyhow::Result;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Prometheus metrics, registered once at startup
pub struct CortexMetrics {
    pub requests_total: IntCounterVec,
    registry: Registry,
}

impl CortexMetrics {
    pub fn new() -> Self {
        let metrics = Self {
            requests_total: IntCounterVec::new(
                Opts::new("geomyth_cortex_requests_total", "Total requests"),
                &["endpoint"],
            )
            .unwrap(),
            registry: Registry::new(),
        };
        metrics
            .register_all()
            .expect("metrics registration cannot collide on a fresh registry");
        metrics
    }

    fn register_all(&self) -> Result<()> {
        self.registry
            .register(Box::new(self.requests_total.clone()))?;
        Ok(())
    }

    /// Render the Prometheus text exposition format
    pub fn export(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if encoder.encode(&self.registry.gather(), &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

impl Default for CortexMetrics {
    fn default() -> Self {
        Self::new()
    }
}
