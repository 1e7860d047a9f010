//! Client-local alert feed, bounded to the most recent entries.

use std::collections::VecDeque;

use super::event::PhishingAlert;

/// Maximum number of alerts kept for display.
pub const FEED_CAPACITY: usize = 10;

/// Ordered view of the most recent alerts, newest first.
///
/// Purely a display structure: insertion beyond capacity silently evicts
/// the oldest entry, and the front is always the latest insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertFeed {
    entries: VecDeque<PhishingAlert>,
}

impl AlertFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the feed from a pulled snapshot, newest first on input.
    pub fn from_snapshot(alerts: impl IntoIterator<Item = PhishingAlert>) -> Self {
        let mut entries: VecDeque<PhishingAlert> = alerts.into_iter().collect();
        entries.truncate(FEED_CAPACITY);
        Self { entries }
    }

    /// Prepends a freshly received alert, evicting past capacity.
    pub fn push(&mut self, alert: PhishingAlert) {
        self.entries.push_front(alert);
        self.entries.truncate(FEED_CAPACITY);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recently inserted alert, if any.
    pub fn latest(&self) -> Option<&PhishingAlert> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhishingAlert> {
        self.entries.iter()
    }

    /// Owned copy, newest first, for snapshot publication.
    pub fn to_vec(&self) -> Vec<PhishingAlert> {
        self.entries.iter().cloned().collect()
    }
}
