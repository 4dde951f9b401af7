//! Consensus aggregation
//!
//! Recomputes, per coordinate bucket, the majority-voted shape label, the
//! agreement percentage, the significance of the majority, and the
//! verification status. The trait seam allows a remote aggregator to stand
//! in for the in-process one.
//!
//! Significance is an exact one-sided binomial tail: the probability of the
//! modal shape reaching its observed count by chance if every submission
//! picked uniformly among the shapes seen at the bucket. A unanimous bucket
//! is tested against a two-category null (p0 = 0.5) so a single shape does
//! not trivially satisfy its own null.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;

use geomyth_common::{BucketKey, ConsensusResult, Observation, VerificationStatus};

use crate::config::ConsensusPolicy;

/// Recomputes bucket consensus after a submission
#[async_trait]
pub trait ConsensusAggregator: Send + Sync {
    /// Aggregate `observations` (all from `bucket`), carrying forward
    /// monotonic state from `previous`. Returns `None` for an empty bucket.
    async fn recompute(
        &self,
        bucket: BucketKey,
        observations: &[Observation],
        previous: Option<&ConsensusResult>,
    ) -> Option<ConsensusResult>;
}

/// In-process majority-vote aggregator
pub struct MajorityAggregator {
    policy: ConsensusPolicy,
}

impl MajorityAggregator {
    pub fn new(policy: ConsensusPolicy) -> Self {
        Self { policy }
    }

    fn candidate_status(&self, count: u64, percentage: f64, p_value: f64) -> VerificationStatus {
        let pol = &self.policy;
        if count >= pol.published_min_observations
            && percentage >= pol.published_min_percentage
            && p_value <= pol.published_max_p_value
        {
            VerificationStatus::Published
        } else if count >= pol.verified_min_observations
            && percentage >= pol.verified_min_percentage
            && p_value <= pol.verified_max_p_value
        {
            VerificationStatus::Verified
        } else if count >= pol.validated_min_observations
            && percentage >= pol.validated_min_percentage
            && p_value <= pol.validated_max_p_value
        {
            VerificationStatus::Validated
        } else if count >= pol.emerging_min_observations {
            VerificationStatus::Emerging
        } else {
            VerificationStatus::None
        }
    }
}

#[async_trait]
impl ConsensusAggregator for MajorityAggregator {
    async fn recompute(
        &self,
        bucket: BucketKey,
        observations: &[Observation],
        previous: Option<&ConsensusResult>,
    ) -> Option<ConsensusResult> {
        if observations.is_empty() {
            return None;
        }

        // Tally per shape, remembering first-seen order for tie-breaking
        let mut counts: HashMap<&str, (u64, usize)> = HashMap::new();
        for (idx, obs) in observations.iter().enumerate() {
            let entry = counts
                .entry(obs.observed_shape.as_str())
                .or_insert((0, idx));
            entry.0 += 1;
        }

        let total = observations.len() as u64;
        let distinct = counts.len() as u64;
        let (modal_shape, (modal_count, _)) = counts
            .iter()
            .map(|(shape, &tally)| (*shape, tally))
            .min_by(|a, b| {
                // highest count wins; earliest first-seen index breaks ties
                b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1))
            })?;

        let percentage = 100.0 * modal_count as f64 / total as f64;
        let null_p = 1.0 / distinct.max(2) as f64;
        let p_value = binomial_tail(total, modal_count, null_p);

        let candidate = self.candidate_status(total, percentage, p_value);
        let floor = previous
            .map(|prev| prev.verification_status)
            .unwrap_or(VerificationStatus::None);
        let status = candidate.max(floor);

        let validated_at = match previous.and_then(|prev| prev.validated_at) {
            Some(ts) => Some(ts),
            None if status >= VerificationStatus::Validated => Some(Utc::now()),
            None => None,
        };

        Some(ConsensusResult {
            bucket: Some(bucket),
            consensus_shape: modal_shape.to_string(),
            observation_count: total,
            consensus_percentage: percentage,
            p_value,
            verification_status: status,
            validated_at,
        })
    }
}

/// P(X >= k) for X ~ Binomial(n, p), exact summation in log space
fn binomial_tail(n: u64, k: u64, p: f64) -> f64 {
    if k == 0 {
        return 1.0;
    }
    let ln_p = p.ln();
    let ln_q = (1.0 - p).ln();
    let mut sum = 0.0;
    for i in k..=n {
        let ln_term = ln_binom(n, i) + i as f64 * ln_p + (n - i) as f64 * ln_q;
        sum += ln_term.exp();
    }
    sum.min(1.0)
}

/// ln C(n, k)
fn ln_binom(n: u64, k: u64) -> f64 {
    let k = k.min(n - k);
    let mut acc = 0.0;
    for i in 1..=k {
        acc += ((n - k + i) as f64).ln() - (i as f64).ln();
    }
    acc
}
