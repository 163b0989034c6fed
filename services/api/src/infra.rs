use metrics_exporter_prometheus::PrometheusHandle;
use safeyatri::flow::Companion;
use safeyatri::http::{CompanionRepository, RepositoryError};
use safeyatri::session::SessionId;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

struct StoredCompanion {
    companion: Arc<Companion>,
    last_seen: Instant,
}

/// Live companion instances, dropped once idle for longer than `idle`.
#[derive(Clone)]
pub(crate) struct InMemoryCompanionRepository {
    companions: Arc<Mutex<HashMap<SessionId, StoredCompanion>>>,
    idle: Duration,
}

impl InMemoryCompanionRepository {
    pub(crate) fn new(idle: Duration) -> Self {
        Self {
            companions: Arc::default(),
            idle,
        }
    }

    fn evict_idle(&self, companions: &mut HashMap<SessionId, StoredCompanion>, now: Instant) {
        let before = companions.len();
        companions.retain(|_, stored| now.duration_since(stored.last_seen) < self.idle);
        let evicted = before - companions.len();
        if evicted > 0 {
            debug!(evicted, "idle companion sessions dropped");
        }
    }
}

impl Default for InMemoryCompanionRepository {
    fn default() -> Self {
        Self::new(Duration::from_secs(30 * 60))
    }
}

impl CompanionRepository for InMemoryCompanionRepository {
    fn insert(&self, id: SessionId, companion: Arc<Companion>) -> Result<(), RepositoryError> {
        let now = Instant::now();
        let mut guard = self.companions.lock().expect("repository mutex poisoned");
        self.evict_idle(&mut guard, now);
        if guard.contains_key(&id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(
            id,
            StoredCompanion {
                companion,
                last_seen: now,
            },
        );
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<Arc<Companion>>, RepositoryError> {
        let now = Instant::now();
        let mut guard = self.companions.lock().expect("repository mutex poisoned");
        self.evict_idle(&mut guard, now);
        Ok(guard.get_mut(id).map(|stored| {
            stored.last_seen = now;
            stored.companion.clone()
        }))
    }

    fn remove(&self, id: &SessionId) -> Result<bool, RepositoryError> {
        let mut guard = self.companions.lock().expect("repository mutex poisoned");
        Ok(guard.remove(id).is_some())
    }
}
