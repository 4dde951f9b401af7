//! Consensus - aggregated majority judgment for a coordinate bucket
//!
//! A `ConsensusResult` is derived state, recomputed by the aggregator after
//! every submission to its bucket. The verification status escalates
//! monotonically; a bucket never moves back down even if later submissions
//! dilute the majority.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::BucketKey;

/// Escalating consensus strength label
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    #[default]
    None,
    Emerging,
    Validated,
    Verified,
    Published,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::None => "none",
            VerificationStatus::Emerging => "emerging",
            VerificationStatus::Validated => "validated",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Published => "published",
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated consensus for one 4-decimal coordinate bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusResult {
    #[serde(skip)]
    pub bucket: Option<BucketKey>,
    /// Modal observed shape at this bucket
    pub consensus_shape: String,
    pub observation_count: u64,
    /// 100 x modal count / total count
    pub consensus_percentage: f64,
    /// One-sided binomial tail probability of the modal count under a
    /// uniform null over the observed shapes
    pub p_value: f64,
    pub verification_status: VerificationStatus,
    /// Stamped when the bucket first reaches `validated`
    pub validated_at: Option<DateTime<Utc>>,
}
