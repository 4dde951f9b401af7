//! # Geomyth Common
//!
//! Shared types, errors, and geo primitives for the Geomyth services.
//!
//! ## Core Types
//!
//! - [`Agent`]: a registered external client identity with reputation
//! - [`Observation`]: a single (location, shape, confidence) claim
//! - [`ConsensusResult`]: aggregated majority judgment for a coordinate bucket
//! - [`VerificationStatus`]: escalating consensus strength label
//!
//! ## Geo
//!
//! - [`GeoPoint`]: validated latitude/longitude pair
//! - [`BucketKey`]: 4-decimal rounded coordinate bucket (~11 m)
//! - [`BoundingBox`]: validated north/south/east/west region

pub mod error;
pub mod geo;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{GeomythError, Result, ValidationError};
pub use geo::{BoundingBox, BucketKey, GeoPoint};
pub use types::{
    agent::Agent,
    consensus::{ConsensusResult, VerificationStatus},
    observation::Observation,
};

/// Geomyth version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Kilometers per degree of latitude (flat-Earth approximation)
pub const KM_PER_DEGREE: f64 = 111.0;

/// Default reputation earned per unit of confidence
pub const DEFAULT_REPUTATION_PER_CONFIDENCE: f64 = 10.0;

/// Default read-time radius for the no-consensus fallback count (km)
pub const DEFAULT_CONSENSUS_RADIUS_KM: f64 = 5.0;

/// Validated-location target for the progress endpoint
pub const DEFAULT_PROGRESS_TARGET: u64 = 10_000;
