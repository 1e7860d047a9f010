//! Producer-side ingestion: record an incident and push it to all sessions.
//!
//! The detection pipeline calls this once per finding. The flow mirrors the
//! scan path of the wider product: persist, then broadcast.

use std::sync::Arc;

use crate::domain::alerts::{AlertEvent, Incident};
use crate::ports::{AlertPublisher, IncidentWriter, PublishError};

/// Errors surfaced to the producer.
#[derive(Debug, thiserror::Error)]
pub enum PublishAlertError {
    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Handler for incoming detection results.
pub struct PublishAlertHandler {
    store: Arc<dyn IncidentWriter>,
    publisher: Arc<dyn AlertPublisher>,
}

impl PublishAlertHandler {
    pub fn new(store: Arc<dyn IncidentWriter>, publisher: Arc<dyn AlertPublisher>) -> Self {
        Self { store, publisher }
    }

    /// Records the incident and fans out the derived alert event.
    pub async fn handle(&self, incident: Incident) -> Result<(), PublishAlertError> {
        let alert = incident.to_alert();
        self.store.record(incident).await;

        tracing::info!(alert_id = %alert.id, level = ?alert.level, "alert published");
        self.publisher
            .publish(AlertEvent::PhishingAlert(alert))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::incidents::InMemoryIncidentStore;
    use crate::adapters::websocket::{AlertHub, SessionRegistry};
    use crate::domain::alerts::Severity;
    use crate::domain::foundation::{AlertId, Role, Timestamp};
    use crate::ports::IncidentReader;

    fn incident() -> Incident {
        Incident::new(
            AlertId::from("inc-1"),
            "billing@phish.example",
            "Outstanding invoice",
            Severity::High,
            0.95,
            Timestamp::now(),
        )
    }

    #[tokio::test]
    async fn handle_records_and_broadcasts() {
        let registry = Arc::new(SessionRegistry::with_default_capacity());
        let hub = AlertHub::new(registry.clone());
        let store = Arc::new(InMemoryIncidentStore::new());
        let handler = PublishAlertHandler::new(store.clone(), hub);

        let (id, mut rx) = registry.register(Role::User).await;
        registry.mark_open(id).await;

        handler.handle(incident()).await.unwrap();

        // Recorded for later lookup.
        let found = store.find(&AlertId::from("inc-1")).await.unwrap();
        assert!(found.is_some());

        // Broadcast with the projected shape.
        let parsed: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(parsed["type"], "phishing_alert");
        assert_eq!(parsed["detail"], "Outstanding invoice");
    }
}
