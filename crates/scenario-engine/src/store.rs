//! In-memory exploration store
//!
//! - Baseline analyses registered by id
//! - Sessions keyed by exploration id
//! - Single-writer lease per exploration (non-blocking acquire)
//! - Readers copy the last published round; they never wait on a driver

use crate::driver::{BeamSearchDriver, RoundReport};
use crate::error::EngineError;
use crate::session::{ExplorationSession, ExplorationSnapshot};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use scenario_model::{
    BaselineAnalysis, Exploration, ExplorationConfig, ExplorationId, ExplorationStatus, Goal,
    WinningPath,
};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug)]
struct StoredExploration {
    published: RwLock<ExplorationSession>,
    lease: Arc<Mutex<()>>,
}

/// Store of baselines and explorations
#[derive(Debug, Default)]
pub struct ExplorationStore {
    baselines: DashMap<String, BaselineAnalysis>,
    explorations: DashMap<ExplorationId, Arc<StoredExploration>>,
}

impl ExplorationStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a baseline analysis
    pub fn register_baseline(&self, baseline: BaselineAnalysis) {
        self.baselines.insert(baseline.id.clone(), baseline);
    }

    /// Look up a baseline analysis
    #[must_use]
    pub fn baseline(&self, id: &str) -> Option<BaselineAnalysis> {
        self.baselines.get(id).map(|b| b.value().clone())
    }

    /// Seed a new exploration from a registered baseline
    ///
    /// # Errors
    /// `BaselineNotFound`, or any validation error from
    /// [`ExplorationSession::start`].
    pub fn create_exploration(
        &self,
        experiment_id: &str,
        baseline_analysis_id: &str,
        goal: Goal,
        config: ExplorationConfig,
    ) -> Result<ExplorationId, EngineError> {
        let baseline = self
            .baseline(baseline_analysis_id)
            .ok_or_else(|| EngineError::BaselineNotFound(baseline_analysis_id.to_string()))?;
        let session = ExplorationSession::start(experiment_id, &baseline, goal, config)?;
        self.insert_session(session)
    }

    /// Adopt an existing session, e.g. one restored from a snapshot
    ///
    /// # Errors
    /// `DuplicateExploration` if the id is already held; the stored entry
    /// and its lease are left untouched.
    pub fn insert_session(
        &self,
        session: ExplorationSession,
    ) -> Result<ExplorationId, EngineError> {
        let id = session.exploration().id;
        match self.explorations.entry(id) {
            Entry::Occupied(_) => Err(EngineError::DuplicateExploration(id)),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(StoredExploration {
                    published: RwLock::new(session),
                    lease: Arc::new(Mutex::new(())),
                }));
                Ok(id)
            }
        }
    }

    fn entry(&self, id: ExplorationId) -> Result<Arc<StoredExploration>, EngineError> {
        self.explorations
            .get(&id)
            .map(|e| Arc::clone(e.value()))
            .ok_or(EngineError::ExplorationNotFound(id))
    }

    /// Take the single-writer lease without waiting
    ///
    /// # Errors
    /// `LeaseHeld` while another lease on the same exploration is alive.
    pub fn acquire_lease(&self, id: ExplorationId) -> Result<ExplorationLease, EngineError> {
        let entry = self.entry(id)?;
        let guard = Arc::clone(&entry.lease)
            .try_lock_owned()
            .map_err(|_| EngineError::LeaseHeld(id))?;
        let working = entry.published.read().clone();
        tracing::debug!(exploration_id = %id, "Lease acquired");
        Ok(ExplorationLease {
            entry,
            working,
            _guard: guard,
        })
    }

    /// Snapshot of the last published state
    pub fn snapshot(&self, id: ExplorationId) -> Result<ExplorationSnapshot, EngineError> {
        Ok(self.entry(id)?.published.read().snapshot())
    }

    /// Exploration record of the last published state
    pub fn exploration(&self, id: ExplorationId) -> Result<Exploration, EngineError> {
        Ok(self.entry(id)?.published.read().exploration().clone())
    }

    /// Winning path of a `goal_achieved` exploration
    ///
    /// # Errors
    /// `ExplorationNotFound`, or `Path(NoWinner)` for any other status.
    pub fn winning_path(&self, id: ExplorationId) -> Result<WinningPath, EngineError> {
        Ok(self.entry(id)?.published.read().winning_path()?)
    }

    /// Explorations of an experiment, oldest first (ties by id)
    #[must_use]
    pub fn list_for_experiment(&self, experiment_id: &str) -> Vec<Exploration> {
        let mut found: Vec<Exploration> = self
            .explorations
            .iter()
            .filter_map(|e| {
                let session = e.value().published.read();
                (session.exploration().experiment_id == experiment_id)
                    .then(|| session.exploration().clone())
            })
            .collect();
        found.sort_by(|a, b| {
            a.started_at
                .cmp(&b.started_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        found
    }

    /// Number of explorations held
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.explorations.len()
    }

    /// Whether the store holds no explorations
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.explorations.is_empty()
    }
}

/// Exclusive right to drive one exploration.
///
/// Works on a private copy and publishes it after every round. Dropping
/// the lease releases it.
#[derive(Debug)]
pub struct ExplorationLease {
    entry: Arc<StoredExploration>,
    working: ExplorationSession,
    _guard: OwnedMutexGuard<()>,
}

impl ExplorationLease {
    /// Working copy of the session
    #[inline]
    #[must_use]
    pub fn session(&self) -> &ExplorationSession {
        &self.working
    }

    /// Run one round and publish the result
    pub async fn step(&mut self, driver: &BeamSearchDriver) -> Result<RoundReport, EngineError> {
        let report = driver.step(&mut self.working).await?;
        self.publish();
        Ok(report)
    }

    /// Run rounds to a terminal status, publishing after each
    pub async fn run(&mut self, driver: &BeamSearchDriver) -> Result<ExplorationStatus, EngineError> {
        while !self.working.is_terminal() {
            self.step(driver).await?;
        }
        Ok(self.working.exploration().status())
    }

    fn publish(&self) {
        *self.entry.published.write() = self.working.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_model::{OutcomeRates, Scorecard};

    fn store_with_baseline() -> ExplorationStore {
        let store = ExplorationStore::new();
        store.register_baseline(BaselineAnalysis::new(
            "analysis-1",
            Scorecard::new(0.6, 0.5, 0.4, 0.7),
            OutcomeRates::new(0.42, 0.38, 0.20),
        ));
        store
    }

    fn goal() -> Goal {
        Goal::success_rate_at_least(0.8).unwrap()
    }

    #[test]
    fn create_requires_known_baseline() {
        let store = store_with_baseline();
        let err = store
            .create_exploration("exp", "missing", goal(), ExplorationConfig::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::BaselineNotFound(id) if id == "missing"));
        assert!(store.is_empty());
    }

    #[test]
    fn lease_is_exclusive_until_dropped() {
        let store = store_with_baseline();
        let id = store
            .create_exploration("exp", "analysis-1", goal(), ExplorationConfig::default())
            .unwrap();

        let lease = store.acquire_lease(id).unwrap();
        assert!(matches!(
            store.acquire_lease(id),
            Err(EngineError::LeaseHeld(held)) if held == id
        ));
        drop(lease);
        assert!(store.acquire_lease(id).is_ok());
    }

    #[test]
    fn snapshot_readable_while_leased() {
        let store = store_with_baseline();
        let id = store
            .create_exploration("exp", "analysis-1", goal(), ExplorationConfig::default())
            .unwrap();
        let _lease = store.acquire_lease(id).unwrap();

        let snapshot = store.snapshot(id).unwrap();
        assert_eq!(snapshot.nodes.len(), 1);
        assert_eq!(snapshot.exploration.status(), ExplorationStatus::Running);
    }

    #[test]
    fn insert_refuses_known_id() {
        let store = store_with_baseline();
        let id = store
            .create_exploration("exp", "analysis-1", goal(), ExplorationConfig::default())
            .unwrap();
        let copy = ExplorationSession::from_snapshot(store.snapshot(id).unwrap()).unwrap();

        assert!(matches!(
            store.insert_session(copy),
            Err(EngineError::DuplicateExploration(dup)) if dup == id
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_exploration() {
        let store = ExplorationStore::new();
        let id = ExplorationId::new();
        assert!(matches!(
            store.snapshot(id),
            Err(EngineError::ExplorationNotFound(missing)) if missing == id
        ));
    }

    #[test]
    fn list_filters_by_experiment_in_start_order() {
        let store = store_with_baseline();
        let first = store
            .create_exploration("exp-a", "analysis-1", goal(), ExplorationConfig::default())
            .unwrap();
        store
            .create_exploration("exp-b", "analysis-1", goal(), ExplorationConfig::default())
            .unwrap();
        let second = store
            .create_exploration("exp-a", "analysis-1", goal(), ExplorationConfig::default())
            .unwrap();

        let listed: Vec<ExplorationId> = store
            .list_for_experiment("exp-a")
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(listed.len(), 2);
        assert!(listed.contains(&first));
        assert!(listed.contains(&second));
    }
}
