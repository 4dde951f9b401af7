//! Registry storage
//!
//! One store object per process, injected into handlers. The in-memory
//! implementation is a non-production placeholder with no durability; a
//! database-backed implementation can slot in behind the same trait using
//! the configured connection string.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use uuid::Uuid;

use geomyth_common::{
    Agent, BucketKey, ConsensusResult, GeomythError, GeoPoint, Observation, Result,
    VerificationStatus,
};

use crate::domain::tasks::Task;

/// Trait for registry storage backends
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// Insert a new agent; `Conflict` if the external id is taken
    async fn insert_agent(&self, agent: Agent) -> Result<Agent>;

    /// Get an agent by generated id
    async fn agent(&self, id: &Uuid) -> Option<Agent>;

    /// All agents in insertion order
    async fn agents(&self) -> Vec<Agent>;

    /// Total number of registered agents
    async fn agent_count(&self) -> u64;

    /// Append an observation and credit the submitting agent; returns the
    /// updated agent record or `NotFound`
    async fn append_observation(
        &self,
        observation: Observation,
        reputation_earned: f64,
    ) -> Result<Agent>;

    /// All observations in one bucket, in submission order
    async fn observations_at(&self, bucket: BucketKey) -> Vec<Observation>;

    /// Count observations within `radius_km` of a point
    async fn observations_within(&self, point: &GeoPoint, radius_km: f64) -> u64;

    /// Stored consensus for a bucket
    async fn consensus(&self, bucket: BucketKey) -> Option<ConsensusResult>;

    /// Replace the stored consensus for a bucket
    async fn put_consensus(&self, result: ConsensusResult);

    /// Number of buckets at `validated` or above
    async fn validated_bucket_count(&self) -> u64;

    /// Store a task
    async fn insert_task(&self, task: Task);

    /// Get a task by id
    async fn task(&self, id: &Uuid) -> Option<Task>;

    /// Liveness probe
    async fn ping(&self) -> bool;
}

/// In-memory storage implementation
pub struct InMemoryStore {
    agents: DashMap<Uuid, Agent>,
    by_external_id: DashMap<String, Uuid>,
    /// Registration order for listing
    agent_order: RwLock<Vec<Uuid>>,
    /// Append-only observation log, bucketed
    by_bucket: DashMap<BucketKey, Vec<Observation>>,
    consensus: DashMap<BucketKey, ConsensusResult>,
    tasks: DashMap<Uuid, Task>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            agents: DashMap::new(),
            by_external_id: DashMap::new(),
            agent_order: RwLock::new(Vec::new()),
            by_bucket: DashMap::new(),
            consensus: DashMap::new(),
            tasks: DashMap::new(),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryStore for InMemoryStore {
    async fn insert_agent(&self, agent: Agent) -> Result<Agent> {
        use dashmap::mapref::entry::Entry;

        match self.by_external_id.entry(agent.external_id.clone()) {
            Entry::Occupied(_) => Err(GeomythError::Conflict(format!(
                "agent '{}' is already registered",
                agent.external_id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(agent.id);
                self.agents.insert(agent.id, agent.clone());
                self.agent_order.write().push(agent.id);
                Ok(agent)
            }
        }
    }

    async fn agent(&self, id: &Uuid) -> Option<Agent> {
        self.agents.get(id).map(|a| a.clone())
    }

    async fn agents(&self) -> Vec<Agent> {
        let order = self.agent_order.read();
        order
            .iter()
            .filter_map(|id| self.agents.get(id).map(|a| a.clone()))
            .collect()
    }

    async fn agent_count(&self) -> u64 {
        self.agents.len() as u64
    }

    async fn append_observation(
        &self,
        observation: Observation,
        reputation_earned: f64,
    ) -> Result<Agent> {
        let mut agent = self
            .agents
            .get_mut(&observation.agent_id)
            .ok_or_else(|| {
                GeomythError::NotFound(format!(
                    "agent '{}' not registered",
                    observation.agent_id
                ))
            })?;
        agent.record_observation(reputation_earned);
        let updated = agent.clone();
        drop(agent);

        self.by_bucket
            .entry(observation.bucket())
            .or_default()
            .push(observation);

        Ok(updated)
    }

    async fn observations_at(&self, bucket: BucketKey) -> Vec<Observation> {
        self.by_bucket
            .get(&bucket)
            .map(|observations| observations.clone())
            .unwrap_or_default()
    }

    async fn observations_within(&self, point: &GeoPoint, radius_km: f64) -> u64 {
        self.by_bucket
            .iter()
            .flat_map(|entry| entry.value().clone())
            .filter(|obs| point.distance_km(&obs.point) <= radius_km)
            .count() as u64
    }

    async fn consensus(&self, bucket: BucketKey) -> Option<ConsensusResult> {
        self.consensus.get(&bucket).map(|c| c.clone())
    }

    async fn put_consensus(&self, result: ConsensusResult) {
        if let Some(bucket) = result.bucket {
            self.consensus.insert(bucket, result);
        }
    }

    async fn validated_bucket_count(&self) -> u64 {
        self.consensus
            .iter()
            .filter(|entry| entry.verification_status >= VerificationStatus::Validated)
            .count() as u64
    }

    async fn insert_task(&self, task: Task) {
        self.tasks.insert(task.id, task);
    }

    async fn task(&self, id: &Uuid) -> Option<Task> {
        self.tasks.get(id).map(|t| t.clone())
    }

    async fn ping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(external_id: &str) -> Agent {
        Agent::new(external_id, "Tester", "custom", vec![])
    }

    fn observation(agent_id: Uuid, lat: f64, lon: f64, shape: &str) -> Observation {
        Observation::new(agent_id, GeoPoint::new(lat, lon).unwrap(), shape, 0.9)
    }

    #[tokio::test]
    async fn test_duplicate_external_id_conflicts() {
        let store = InMemoryStore::new();
        store.insert_agent(agent("a1")).await.unwrap();

        let err = store.insert_agent(agent("a1")).await.unwrap_err();
        assert!(matches!(err, GeomythError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_agents_keep_insertion_order() {
        let store = InMemoryStore::new();
        for name in ["a1", "a2", "a3"] {
            store.insert_agent(agent(name)).await.unwrap();
        }
        let listed = store.agents().await;
        let ids: Vec<_> = listed.iter().map(|a| a.external_id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "a3"]);
    }

    #[tokio::test]
    async fn test_append_updates_agent_counters() {
        let store = InMemoryStore::new();
        let registered = store.insert_agent(agent("a1")).await.unwrap();

        let updated = store
            .append_observation(observation(registered.id, 10.5, 120.3, "serpent"), 9.0)
            .await
            .unwrap();
        assert_eq!(updated.total_observations, 1);
        assert!((updated.reputation - 9.0).abs() < 1e-9);

        let bucket = BucketKey::from_degrees(10.5, 120.3);
        assert_eq!(store.observations_at(bucket).await.len(), 1);
    }

    #[tokio::test]
    async fn test_append_for_unknown_agent_fails() {
        let store = InMemoryStore::new();
        let err = store
            .append_observation(observation(Uuid::new_v4(), 10.5, 120.3, "serpent"), 9.0)
            .await
            .unwrap_err();
        assert!(matches!(err, GeomythError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_radius_count() {
        let store = InMemoryStore::new();
        let registered = store.insert_agent(agent("a1")).await.unwrap();

        // ~0 km and ~15.7 km from the probe point
        store
            .append_observation(observation(registered.id, 10.5, 120.3, "serpent"), 9.0)
            .await
            .unwrap();
        store
            .append_observation(observation(registered.id, 10.6, 120.4, "serpent"), 9.0)
            .await
            .unwrap();

        let probe = GeoPoint::new(10.5, 120.3).unwrap();
        assert_eq!(store.observations_within(&probe, 5.0).await, 1);
        assert_eq!(store.observations_within(&probe, 20.0).await, 2);
    }

    #[tokio::test]
    async fn test_validated_bucket_count() {
        let store = InMemoryStore::new();
        let mk = |lat: f64, status| ConsensusResult {
            bucket: Some(BucketKey::from_degrees(lat, 0.0)),
            consensus_shape: "serpent".to_string(),
            observation_count: 5,
            consensus_percentage: 100.0,
            p_value: 0.01,
            verification_status: status,
            validated_at: None,
        };
        store.put_consensus(mk(1.0, VerificationStatus::Emerging)).await;
        store.put_consensus(mk(2.0, VerificationStatus::Validated)).await;
        store.put_consensus(mk(3.0, VerificationStatus::Verified)).await;

        assert_eq!(store.validated_bucket_count().await, 2);
    }
}
