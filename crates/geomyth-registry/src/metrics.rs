//! Prometheus metrics for the registry service

use anyhow::Result;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Prometheus metrics, registered once at startup
pub struct RegistryMetrics {
    pub requests_total: IntCounterVec,
    pub registrations_total: IntCounter,
    pub observations_total: IntCounter,
    pub consensus_queries_total: IntCounter,
    registry: Registry,
}

impl RegistryMetrics {
    pub fn new() -> Self {
        let metrics = Self {
            requests_total: IntCounterVec::new(
                Opts::new("geomyth_registry_requests_total", "Total requests"),
                &["method", "endpoint"],
            )
            .unwrap(),
            registrations_total: IntCounter::new(
                "geomyth_registry_registrations_total",
                "Total successful agent registrations",
            )
            .unwrap(),
            observations_total: IntCounter::new(
                "geomyth_registry_observations_total",
                "Total accepted observations",
            )
            .unwrap(),
            consensus_queries_total: IntCounter::new(
                "geomyth_registry_consensus_queries_total",
                "Total consensus queries",
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
        self.registry
            .register(Box::new(self.registrations_total.clone()))?;
        self.registry
            .register(Box::new(self.observations_total.clone()))?;
        self.registry
            .register(Box::new(self.consensus_queries_total.clone()))?;
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

impl Default for RegistryMetrics {
    fn default() -> Self {
        Self::new()
    }
}
