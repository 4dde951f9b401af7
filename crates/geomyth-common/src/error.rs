//! Error types for the Geomyth services
//!
//! Provides a unified error type covering the request-facing taxonomy
//! (conflict, not-found, validation, unknown method) plus internal variants.

use thiserror::Error;

/// Result type alias using GeomythError
pub type Result<T> = std::result::Result<T, GeomythError>;

/// Unified error type for Geomyth operations
#[derive(Debug, Error)]
pub enum GeomythError {
    // Duplicate registration
    #[error("Conflict: {0}")]
    Conflict(String),

    // Unknown agent/task/resource
    #[error("Not found: {0}")]
    NotFound(String),

    // Field/range violations
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // Gateway/task dispatch on an unregistered method
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Request field validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("confidence {0} outside [0, 1]")]
    ConfidenceOutOfRange(f64),

    #[error("radius_km {0} must be positive")]
    RadiusNotPositive(f64),

    #[error("radius_km {value} outside [{min}, {max}]")]
    RadiusOutOfRange { value: f64, min: f64, max: f64 },

    #[error("south latitude {south} must be less than north latitude {north}")]
    InvertedBoundingBox { north: f64, south: f64 },

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
}

// Implement From for common external error types
impl From<serde_json::Error> for GeomythError {
    fn from(err: serde_json::Error) -> Self {
        GeomythError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for GeomythError {
    fn from(err: std::io::Error) -> Self {
        GeomythError::Internal(err.to_string())
    }
}

impl From<anyhow::Error> for GeomythError {
    fn from(err: anyhow::Error) -> Self {
        GeomythError::Internal(err.to_string())
    }
}
