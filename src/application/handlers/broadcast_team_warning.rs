//! Admin command: broadcast a team-wide warning about a prior incident.
//!
//! On success exactly one `BroadcastWarning` is published; on any failure
//! nothing is published at all, and the caller gets the error synchronously.
//! The command is deliberately not idempotent: issuing it twice for the same
//! incident publishes two warnings, each of which replaces the live banner
//! and restarts its expiry on every client.

use std::sync::Arc;

use crate::domain::alerts::{AlertEvent, BroadcastWarning, Incident, DEFAULT_BROADCAST_TTL_SECS};
use crate::domain::foundation::AlertId;
use crate::ports::{AlertPublisher, IncidentReadError, IncidentReader, PublishError};

/// Request to warn the whole team about one incident.
#[derive(Debug, Clone)]
pub struct BroadcastTeamWarningCommand {
    pub incident_id: AlertId,
}

/// Errors surfaced to the admin caller.
#[derive(Debug, thiserror::Error)]
pub enum BroadcastCommandError {
    #[error("incident not found: {0}")]
    IncidentNotFound(AlertId),

    #[error(transparent)]
    Lookup(#[from] IncidentReadError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Handler for the broadcast-to-team command.
pub struct BroadcastTeamWarningHandler {
    incidents: Arc<dyn IncidentReader>,
    publisher: Arc<dyn AlertPublisher>,
}

impl BroadcastTeamWarningHandler {
    pub fn new(incidents: Arc<dyn IncidentReader>, publisher: Arc<dyn AlertPublisher>) -> Self {
        Self {
            incidents,
            publisher,
        }
    }

    pub async fn handle(
        &self,
        command: BroadcastTeamWarningCommand,
    ) -> Result<(), BroadcastCommandError> {
        let incident = self
            .incidents
            .find(&command.incident_id)
            .await?
            .ok_or_else(|| BroadcastCommandError::IncidentNotFound(command.incident_id.clone()))?;

        let warning = derive_warning(&incident);
        tracing::info!(incident_id = %incident.id, "team warning broadcast");
        self.publisher
            .publish(AlertEvent::BroadcastWarning(warning))
            .await?;
        Ok(())
    }
}

/// Builds the banner content from the referenced incident.
fn derive_warning(incident: &Incident) -> BroadcastWarning {
    BroadcastWarning {
        title: "Team Alert".to_string(),
        message: format!(
            "Do not open mail from {}: \"{}\"",
            incident.sender, incident.subject
        ),
        ttl_seconds: Some(DEFAULT_BROADCAST_TTL_SECS),
    }
}
