//! Producer-side incident record.
//!
//! The detection pipeline hands the channel one of these per finding. The
//! record carries more than the wire event does (`sender`, `confidence`);
//! the extra fields stay on the producer side.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AlertId, Timestamp};

use super::event::{PhishingAlert, Severity};

/// How many sender characters survive into the alert title.
const TITLE_SENDER_CHARS: usize = 20;

/// One detected phishing incident as reported by the detection pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: AlertId,
    pub sender: String,
    pub subject: String,
    pub level: Severity,
    /// Detector confidence, clamped to `[0, 1]`.
    pub confidence: f64,
    pub detected_at: Timestamp,
}

impl Incident {
    pub fn new(
        id: AlertId,
        sender: impl Into<String>,
        subject: impl Into<String>,
        level: Severity,
        confidence: f64,
        detected_at: Timestamp,
    ) -> Self {
        Self {
            id,
            sender: sender.into(),
            subject: subject.into(),
            level,
            confidence: confidence.clamp(0.0, 1.0),
            detected_at,
        }
    }

    /// Display title shown in the dashboard feed.
    pub fn alert_title(&self) -> String {
        let prefix: String = self.sender.chars().take(TITLE_SENDER_CHARS).collect();
        format!("Phishing Attempt: {}...", prefix)
    }

    /// Projects this incident into the wire event pushed to sessions.
    pub fn to_alert(&self) -> PhishingAlert {
        PhishingAlert {
            id: self.id.clone(),
            title: self.alert_title(),
            level: self.level,
            time: self.detected_at,
            detail: self.subject.clone(),
        }
    }
}
