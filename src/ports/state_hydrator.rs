//! StateHydrator port - one-shot pull of current dashboard aggregates.
//!
//! Covers the gap between page load and channel establishment. This is the
//! only gap-filling mechanism: the push path never replays a backlog, and no
//! causal reconciliation is attempted between the pulled snapshot and the
//! first pushed events.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::alerts::PhishingAlert;

/// Aggregate dashboard counters plus the recent alerts, as served by the
/// stats endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_scans: u64,
    pub threats_detected: u64,
    pub training_progress: u8,
    pub security_score: u8,
    pub alerts: Vec<PhishingAlert>,
}

/// Errors raised by the hydration pull.
#[derive(Debug, thiserror::Error)]
pub enum HydrationError {
    #[error("stats request failed: {0}")]
    Request(String),

    #[error("stats response malformed: {0}")]
    Malformed(String),
}

/// Port for the initial state pull.
#[async_trait]
pub trait StateHydrator: Send + Sync {
    async fn fetch(&self) -> Result<DashboardStats, HydrationError>;
}
