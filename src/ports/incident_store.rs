//! Incident store ports.
//!
//! Alert history proper lives in an external database; this crate only needs
//! a recent-incident view: the admin broadcast command looks up the incident
//! it is about to warn the team over, and the dashboard hydration pull is
//! served from the same view.

use async_trait::async_trait;

use crate::domain::alerts::Incident;
use crate::domain::foundation::AlertId;

use super::state_hydrator::DashboardStats;

/// Errors raised by incident lookups.
#[derive(Debug, thiserror::Error)]
pub enum IncidentReadError {
    #[error("incident store unavailable: {0}")]
    Backend(String),
}

/// Read access to recently recorded incidents.
#[async_trait]
pub trait IncidentReader: Send + Sync {
    /// Finds an incident by id. `Ok(None)` when the id is unknown.
    async fn find(&self, id: &AlertId) -> Result<Option<Incident>, IncidentReadError>;
}

/// Write access for the producer path.
#[async_trait]
pub trait IncidentWriter: Send + Sync {
    /// Records a freshly detected incident into the recent view.
    async fn record(&self, incident: Incident);
}

/// Aggregate view served to the dashboard hydration pull.
#[async_trait]
pub trait StatsReader: Send + Sync {
    async fn stats(&self) -> DashboardStats;
}
