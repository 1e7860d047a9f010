//! Central fan-out hub for the alert channel.
//!
//! One writer, many readers: events enter through [`AlertPublisher`], get a
//! monotonic sequence number, are serialized once, and are pushed into every
//! open session's frame buffer. Delivery per session is fire-and-forget; a
//! session whose buffer is closed or full counts as a failed delivery and is
//! unregistered on the spot, without delaying or affecting any other
//! session. The push path never retries and never replays a backlog; gap
//! filling is the connection agent's pull-based job.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use crate::domain::alerts::AlertEvent;
use crate::ports::{AlertPublisher, PublishError};

use super::registry::SessionRegistry;

/// Single-producer fan-out over the session registry.
pub struct AlertHub {
    registry: Arc<SessionRegistry>,

    /// Emission sequence, for the internal ordered log.
    sequence: AtomicU64,

    /// Serializes fan-out so concurrent publishers cannot interleave frames
    /// differently across sessions.
    fanout_lock: Mutex<()>,
}

impl AlertHub {
    pub fn new(registry: Arc<SessionRegistry>) -> Arc<Self> {
        Arc::new(Self {
            registry,
            sequence: AtomicU64::new(0),
            fanout_lock: Mutex::new(()),
        })
    }

    /// Registry this hub fans out over.
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    async fn fan_out(&self, kind: &'static str, frame: String) {
        let _guard = self.fanout_lock.lock().await;
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);

        let snapshot = self.registry.snapshot().await;
        if snapshot.is_empty() {
            tracing::trace!(seq, kind, "no open sessions, dropping event");
            return;
        }

        let mut delivered = 0usize;
        let mut failed = Vec::new();

        for session in &snapshot {
            match session.sender.try_send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    // A stalled reader is indistinguishable from a dead one
                    // at this boundary.
                    failed.push(session.session_id);
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    failed.push(session.session_id);
                }
            }
        }

        for session_id in &failed {
            tracing::warn!(%session_id, seq, kind, "delivery failed, unregistering session");
            self.registry.unregister(*session_id).await;
        }

        tracing::debug!(seq, kind, delivered, failed = failed.len(), "event fanned out");
    }
}

#[async_trait]
impl AlertPublisher for AlertHub {
    async fn publish(&self, event: AlertEvent) -> Result<(), PublishError> {
        let frame = serde_json::to_string(&event)
            .map_err(|e| PublishError::Serialization(e.to_string()))?;
        self.fan_out(event.kind(), frame).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alerts::{BroadcastWarning, PhishingAlert, Severity};
    use crate::domain::foundation::{AlertId, Role, Timestamp};

    fn alert_event(n: u64) -> AlertEvent {
        AlertEvent::PhishingAlert(PhishingAlert {
            id: AlertId::from(n),
            title: format!("alert {}", n),
            level: Severity::High,
            time: Timestamp::now(),
            detail: "detail".to_string(),
        })
    }

    async fn open_session(
        registry: &SessionRegistry,
    ) -> (crate::domain::foundation::SessionId, mpsc::Receiver<String>) {
        let (id, rx) = registry.register(Role::User).await;
        registry.mark_open(id).await;
        (id, rx)
    }

    #[tokio::test]
    async fn every_open_session_receives_identical_payload() {
        let registry = Arc::new(SessionRegistry::with_default_capacity());
        let hub = AlertHub::new(registry.clone());

        let (_a, mut rx_a) = open_session(&registry).await;
        let (_b, mut rx_b) = open_session(&registry).await;

        hub.publish(alert_event(1)).await.unwrap();

        let frame_a = rx_a.recv().await.unwrap();
        let frame_b = rx_b.recv().await.unwrap();
        assert_eq!(frame_a, frame_b);

        let parsed: serde_json::Value = serde_json::from_str(&frame_a).unwrap();
        assert_eq!(parsed["type"], "phishing_alert");
        assert_eq!(parsed["id"], 1);
    }

    #[tokio::test]
    async fn delivery_preserves_emission_order() {
        let registry = Arc::new(SessionRegistry::with_default_capacity());
        let hub = AlertHub::new(registry.clone());
        let (_id, mut rx) = open_session(&registry).await;

        for n in 0..20 {
            hub.publish(alert_event(n)).await.unwrap();
        }

        for n in 0..20 {
            let frame = rx.recv().await.unwrap();
            let parsed: serde_json::Value = serde_json::from_str(&frame).unwrap();
            assert_eq!(parsed["id"], n);
        }
    }

    #[tokio::test]
    async fn failed_delivery_is_isolated_and_unregisters_the_session() {
        let registry = Arc::new(SessionRegistry::with_default_capacity());
        let hub = AlertHub::new(registry.clone());

        let (failing, rx_failing) = open_session(&registry).await;
        let (healthy, mut rx_healthy) = open_session(&registry).await;

        // Simulate a dead socket: the handler side of the buffer is gone.
        drop(rx_failing);

        hub.publish(alert_event(7)).await.unwrap();

        // The healthy session still got the event.
        let frame = rx_healthy.recv().await.unwrap();
        assert!(frame.contains("phishing_alert"));

        // The failing one was evicted, the healthy one kept.
        assert_eq!(registry.state_of(failing).await, None);
        assert!(registry.state_of(healthy).await.is_some());
    }

    #[tokio::test]
    async fn full_buffer_counts_as_failed_delivery() {
        let registry = Arc::new(SessionRegistry::new(1));
        let hub = AlertHub::new(registry.clone());

        let (stalled, _rx_kept_but_not_drained) = {
            let (id, rx) = registry.register(Role::User).await;
            registry.mark_open(id).await;
            (id, rx)
        };

        hub.publish(alert_event(1)).await.unwrap(); // fills the buffer
        hub.publish(alert_event(2)).await.unwrap(); // overflows it

        assert_eq!(registry.state_of(stalled).await, None);
    }

    #[tokio::test]
    async fn sessions_not_open_at_publish_time_get_nothing() {
        let registry = Arc::new(SessionRegistry::with_default_capacity());
        let hub = AlertHub::new(registry.clone());

        let (_connecting, mut rx) = registry.register(Role::User).await;

        hub.publish(alert_event(1)).await.unwrap();

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn publish_with_no_sessions_is_a_noop() {
        let registry = Arc::new(SessionRegistry::with_default_capacity());
        let hub = AlertHub::new(registry);

        hub.publish(alert_event(1)).await.unwrap();
        hub.publish(AlertEvent::BroadcastWarning(BroadcastWarning {
            title: "Team Alert".to_string(),
            message: "m".to_string(),
            ttl_seconds: None,
        }))
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn broadcast_warning_reaches_all_open_sessions() {
        let registry = Arc::new(SessionRegistry::with_default_capacity());
        let hub = AlertHub::new(registry.clone());

        let (_a, mut rx_a) = open_session(&registry).await;
        let (_b, mut rx_b) = open_session(&registry).await;

        hub.publish(AlertEvent::BroadcastWarning(BroadcastWarning {
            title: "Team Alert".to_string(),
            message: "Do not click the invoice link".to_string(),
            ttl_seconds: Some(10),
        }))
        .await
        .unwrap();

        for rx in [&mut rx_a, &mut rx_b] {
            let parsed: serde_json::Value =
                serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
            assert_eq!(parsed["type"], "broadcast_warning");
            assert_eq!(parsed["title"], "Team Alert");
        }
    }
}
