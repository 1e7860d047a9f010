//! Wire event model for the alert channel.
//!
//! Every frame pushed over the channel is one [`AlertEvent`], a tagged union
//! discriminated by the `type` field. Consumers must treat tags they do not
//! recognize as no-ops, never as errors, so newer producers can add kinds
//! without breaking older dashboards.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::{AlertId, Timestamp};

/// Banner lifetime applied when a broadcast carries no explicit ttl.
pub const DEFAULT_BROADCAST_TTL_SECS: u64 = 10;

/// Threat severity attached to a detected incident.
///
/// Serialized capitalized (`"High"`), matching the dashboard contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// High and Critical incidents count toward the threat total.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }
}

/// A detected-threat notification pushed to every open session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhishingAlert {
    pub id: AlertId,
    pub title: String,
    pub level: Severity,
    pub time: Timestamp,
    pub detail: String,
}

/// An admin-initiated, time-limited banner for all connected sessions.
///
/// `ttl_seconds` is optional on the wire; absent means
/// [`DEFAULT_BROADCAST_TTL_SECS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastWarning {
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_seconds: Option<u64>,
}

impl BroadcastWarning {
    /// Effective banner lifetime.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds.unwrap_or(DEFAULT_BROADCAST_TTL_SECS))
    }
}

/// The tagged union carried on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlertEvent {
    PhishingAlert(PhishingAlert),
    BroadcastWarning(BroadcastWarning),
    /// Catch-all for event kinds introduced after this client was built.
    #[serde(other)]
    Unknown,
}

impl AlertEvent {
    /// Wire discriminator, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            AlertEvent::PhishingAlert(_) => "phishing_alert",
            AlertEvent::BroadcastWarning(_) => "broadcast_warning",
            AlertEvent::Unknown => "unknown",
        }
    }
}
