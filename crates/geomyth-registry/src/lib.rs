//! # Geomyth Registry
//!
//! The central hub for agent registration, observation intake, and consensus
//! queries. Agents register once, submit geotagged shape observations, and
//! query the aggregated majority judgment per coordinate bucket.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                 HTTP (axum router)               │
//! │  /register /observe /consensus /leaderboard ...  │
//! └───────────────┬──────────────────┬───────────────┘
//!                 │                  │
//!        ┌────────┴───────┐  ┌───────┴─────────────┐
//!        │ RegistryStore  │  │ ConsensusAggregator │
//!        │ (in-memory)    │  │ (majority vote)     │
//!        └────────────────┘  └─────────────────────┘
//! ```
//!
//! The store and aggregator are trait seams: the in-memory store is a
//! non-production placeholder, and a remote aggregator can replace the
//! in-process majority vote.

pub mod config;
pub mod domain;
pub mod http;
pub mod infra;
pub mod metrics;

// Re-export core types
pub use config::{ConsensusPolicy, RegistryConfig};
pub use domain::aggregator::{ConsensusAggregator, MajorityAggregator};
pub use domain::tasks::{Task, TaskRoute};
pub use http::{router, AppState};
pub use infra::store::{InMemoryStore, RegistryStore};
pub use metrics::RegistryMetrics;
