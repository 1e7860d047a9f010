//! Client-local dashboard state and the snapshot handed to the
//! presentation sink.
//!
//! The sink never sees transport errors or raw frames, only whole
//! snapshots: counters, the bounded alert feed, and the live banner.

use serde::Serialize;

use crate::domain::alerts::{ActiveBroadcast, AlertFeed, BroadcastWarning, PhishingAlert};
use crate::domain::foundation::Timestamp;
use crate::ports::DashboardStats;

/// Lifecycle of the connection agent as observed from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Idle,
    Connecting,
    Open,
    Reconnecting,
    /// Terminal; only explicit teardown gets here.
    Closed,
}

impl AgentStatus {
    /// Whether the push channel is currently delivering.
    pub fn is_open(&self) -> bool {
        matches!(self, AgentStatus::Open)
    }
}

/// Immutable view of the dashboard state at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub total_scans: u64,
    pub threats_detected: u64,
    pub training_progress: u8,
    pub security_score: u8,
    /// Newest first, at most ten entries.
    pub alerts: Vec<PhishingAlert>,
    pub active_broadcast: Option<ActiveBroadcast>,
}

/// Mutable state owned exclusively by the connection agent.
#[derive(Debug, Default)]
pub struct DashboardState {
    total_scans: u64,
    threats_detected: u64,
    training_progress: u8,
    security_score: u8,
    feed: AlertFeed,
    active_broadcast: Option<ActiveBroadcast>,
}

impl DashboardState {
    /// Seeds counters and feed from the one-shot hydration pull.
    pub fn hydrate(&mut self, stats: DashboardStats) {
        self.total_scans = stats.total_scans;
        self.threats_detected = stats.threats_detected;
        self.training_progress = stats.training_progress;
        self.security_score = stats.security_score;
        self.feed = AlertFeed::from_snapshot(stats.alerts);
    }

    /// Applies a pushed alert: bump the threat counter, prepend to the feed.
    pub fn apply_alert(&mut self, alert: PhishingAlert) {
        self.threats_detected += 1;
        self.feed.push(alert);
    }

    /// Replaces the live banner; any previous one is discarded.
    pub fn apply_warning(&mut self, warning: &BroadcastWarning) {
        self.active_broadcast = Some(ActiveBroadcast::from_warning(warning, Timestamp::now()));
    }

    /// Clears the banner when its expiry fires.
    pub fn clear_broadcast(&mut self) {
        self.active_broadcast = None;
    }

    pub fn has_active_broadcast(&self) -> bool {
        self.active_broadcast.is_some()
    }

    pub fn render(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            total_scans: self.total_scans,
            threats_detected: self.threats_detected,
            training_progress: self.training_progress,
            security_score: self.security_score,
            alerts: self.feed.to_vec(),
            active_broadcast: self.active_broadcast.clone(),
        }
    }
}
