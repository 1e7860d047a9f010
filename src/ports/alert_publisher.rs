//! AlertPublisher port - the producer-facing publish interface.
//!
//! The detection pipeline (and the admin broadcast command) hand events to
//! this seam; the distribution adapter behind it fans them out to every open
//! session. Per-session delivery failures are contained inside the adapter
//! and never surface here.

use async_trait::async_trait;

use crate::domain::alerts::AlertEvent;

/// Errors that can occur while accepting an event for distribution.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The event could not be rendered into a wire frame.
    #[error("event serialization failed: {0}")]
    Serialization(String),
}

/// Port for pushing one event to all currently open sessions.
///
/// Implementations must preserve emission order: if `publish(e1)` completes
/// before `publish(e2)` starts, every session that receives both sees `e1`
/// first.
#[async_trait]
pub trait AlertPublisher: Send + Sync {
    async fn publish(&self, event: AlertEvent) -> Result<(), PublishError>;
}
