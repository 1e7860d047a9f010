//! In-memory recent-incident store.
//!
//! Alert history proper belongs to an external database; the channel only
//! needs a bounded recent view to serve the hydration pull and to resolve
//! incident ids for the admin broadcast command.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::alerts::Incident;
use crate::domain::foundation::AlertId;
use crate::ports::{
    DashboardStats, IncidentReadError, IncidentReader, IncidentWriter, StatsReader,
};

/// How many incidents the recent view retains.
const RECENT_CAPACITY: usize = 50;

/// How many alerts the stats endpoint reports.
const STATS_ALERT_COUNT: usize = 5;

#[derive(Debug, Default)]
struct StoreInner {
    /// Newest first.
    recent: VecDeque<Incident>,
    total_scans: u64,
    threats_detected: u64,
}

/// Bounded in-memory incident view.
pub struct InMemoryIncidentStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryIncidentStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
        }
    }

}

impl Default for InMemoryIncidentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IncidentWriter for InMemoryIncidentStore {
    async fn record(&self, incident: Incident) {
        let mut inner = self.inner.write().await;
        inner.total_scans += 1;
        if incident.level.is_elevated() {
            inner.threats_detected += 1;
        }
        inner.recent.push_front(incident);
        inner.recent.truncate(RECENT_CAPACITY);
    }
}

#[async_trait]
impl StatsReader for InMemoryIncidentStore {
    /// Aggregate counters plus the most recent alerts, in the shape the
    /// dashboard hydration pull expects.
    ///
    /// Training progress and security score are fixed placeholders; those
    /// aggregates belong to subsystems outside this crate.
    async fn stats(&self) -> DashboardStats {
        let inner = self.inner.read().await;
        DashboardStats {
            total_scans: inner.total_scans,
            threats_detected: inner.threats_detected,
            training_progress: 65,
            security_score: 85,
            alerts: inner
                .recent
                .iter()
                .take(STATS_ALERT_COUNT)
                .map(Incident::to_alert)
                .collect(),
        }
    }
}

#[async_trait]
impl IncidentReader for InMemoryIncidentStore {
    async fn find(&self, id: &AlertId) -> Result<Option<Incident>, IncidentReadError> {
        let inner = self.inner.read().await;
        Ok(inner.recent.iter().find(|i| &i.id == id).cloned())
    }
}
