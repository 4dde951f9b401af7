//! # Geomyth Cortex
//!
//! The visual data provider for Geomyth agents: satellite imagery,
//! topography, constellation overlays, and a dataset catalog. All business
//! payloads are mocked; responses carry provider-shaped URLs and metadata
//! only.

pub mod catalog;
pub mod config;
pub mod http;
pub mod metrics;
pub mod providers;

pub use config::CortexConfig;
pub use http::{router, AppState};
pub use metrics::CortexMetrics;
pub use providers::{DemSource, ImagerySource};
