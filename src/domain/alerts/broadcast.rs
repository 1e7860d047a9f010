//! Currently displayed team-wide broadcast banner.

use serde::Serialize;

use crate::domain::foundation::Timestamp;

use super::event::BroadcastWarning;

/// The one banner a client may show at a time.
///
/// A newly received [`BroadcastWarning`] replaces any live instance and
/// restarts its expiry; the expiry timer itself is owned by the connection
/// agent, which clears the banner when it fires.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveBroadcast {
    pub title: String,
    pub message: String,
    pub shown_at: Timestamp,
}

impl ActiveBroadcast {
    pub fn from_warning(warning: &BroadcastWarning, shown_at: Timestamp) -> Self {
        Self {
            title: warning.title.clone(),
            message: warning.message.clone(),
            shown_at,
        }
    }
}
