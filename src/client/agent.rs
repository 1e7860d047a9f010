//! Connection agent: owns one client's channel lifecycle.
//!
//! An explicit state machine replaces the "global socket with reconnect
//! side effects in a UI hook" shape this subsystem tends to grow:
//!
//! ```text
//! Idle ──► Connecting ──success──► Open
//!              │  ▲                  │ unexpected close / error
//!        fail  │  │ backoff (flat)   ▼
//!              └──┴──────────── Reconnecting
//!
//! Open / Reconnecting ──teardown──► Closed (terminal)
//! ```
//!
//! Four independent waits interleave inside the task: handshake completion,
//! the next inbound frame, backoff expiry, and the banner expiry timer.
//! Teardown cancels whichever of them is pending and suppresses the
//! reconnect that an error-triggered close would otherwise schedule. The
//! operator-facing posture is fast recovery over herd avoidance, hence a
//! flat backoff with no growth and no retry cutoff.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep, sleep_until, Instant};

use crate::domain::alerts::AlertEvent;
use crate::ports::{ChannelTransport, EventStream, StateHydrator};

use super::snapshot::{AgentStatus, DashboardSnapshot, DashboardState};

/// Tuning for the connection agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Flat delay between a lost connection and the next attempt.
    pub reconnect_delay: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            reconnect_delay: Duration::from_secs(3),
        }
    }
}

/// The connection agent, ready to be spawned.
pub struct AlertStreamAgent {
    transport: Arc<dyn ChannelTransport>,
    hydrator: Option<Arc<dyn StateHydrator>>,
    config: AgentConfig,
}

impl AlertStreamAgent {
    pub fn new(
        transport: Arc<dyn ChannelTransport>,
        hydrator: Option<Arc<dyn StateHydrator>>,
        config: AgentConfig,
    ) -> Self {
        Self {
            transport,
            hydrator,
            config,
        }
    }

    /// Starts the agent task and returns the handle the presentation layer
    /// holds on to.
    pub fn spawn(self) -> AgentHandle {
        let (status_tx, status_rx) = watch::channel(AgentStatus::Idle);
        let (snapshot_tx, snapshot_rx) = watch::channel(DashboardSnapshot::default());
        let (teardown_tx, teardown_rx) = oneshot::channel();

        let join = tokio::spawn(run(
            self.transport,
            self.hydrator,
            self.config,
            status_tx,
            snapshot_tx,
            teardown_rx,
        ));

        AgentHandle {
            teardown_tx: Some(teardown_tx),
            status_rx,
            snapshot_rx,
            join,
        }
    }
}

/// Handle to a running agent.
///
/// Dropping the handle tears the agent down the same way an explicit
/// [`AgentHandle::teardown`] does; an unmounted dashboard must never leave a
/// reconnect loop behind.
pub struct AgentHandle {
    teardown_tx: Option<oneshot::Sender<()>>,
    status_rx: watch::Receiver<AgentStatus>,
    snapshot_rx: watch::Receiver<DashboardSnapshot>,
    join: JoinHandle<()>,
}

impl AgentHandle {
    /// Current lifecycle state.
    pub fn status(&self) -> AgentStatus {
        *self.status_rx.borrow()
    }

    /// Watch receiver for lifecycle transitions.
    pub fn watch_status(&self) -> watch::Receiver<AgentStatus> {
        self.status_rx.clone()
    }

    /// Current dashboard snapshot.
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Watch receiver for snapshot updates.
    pub fn watch_snapshot(&self) -> watch::Receiver<DashboardSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Explicit teardown: the only way into `Closed`.
    ///
    /// Cancels any pending backoff or banner timer and waits for the agent
    /// task to finish.
    pub async fn teardown(mut self) {
        if let Some(tx) = self.teardown_tx.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.join).await;
    }
}

async fn run(
    transport: Arc<dyn ChannelTransport>,
    hydrator: Option<Arc<dyn StateHydrator>>,
    config: AgentConfig,
    status_tx: watch::Sender<AgentStatus>,
    snapshot_tx: watch::Sender<DashboardSnapshot>,
    mut teardown_rx: oneshot::Receiver<()>,
) {
    let mut state = DashboardState::default();
    let mut banner_deadline: Option<Instant> = None;

    // One-shot hydration before the push channel. Failure is tolerated;
    // the dashboard just starts empty.
    if let Some(hydrator) = hydrator {
        tokio::select! {
            _ = &mut teardown_rx => {
                status_tx.send_replace(AgentStatus::Closed);
                return;
            }
            result = hydrator.fetch() => match result {
                Ok(stats) => {
                    state.hydrate(stats);
                    snapshot_tx.send_replace(state.render());
                }
                Err(e) => {
                    tracing::warn!("hydration failed, starting empty: {}", e);
                }
            }
        }
    }

    'lifecycle: loop {
        // ---- Connecting ----
        status_tx.send_replace(AgentStatus::Connecting);
        let mut stream = tokio::select! {
            _ = &mut teardown_rx => break 'lifecycle,
            _ = expiry(banner_deadline), if banner_deadline.is_some() => {
                state.clear_broadcast();
                banner_deadline = None;
                snapshot_tx.send_replace(state.render());
                continue 'lifecycle;
            }
            result = transport.connect() => match result {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::debug!("handshake failed: {}", e);
                    match reconnect_wait(
                        &config,
                        &status_tx,
                        &snapshot_tx,
                        &mut state,
                        &mut banner_deadline,
                        &mut teardown_rx,
                    )
                    .await
                    {
                        WaitOutcome::Retry => continue 'lifecycle,
                        WaitOutcome::Teardown => break 'lifecycle,
                    }
                }
            }
        };

        // ---- Open ----
        status_tx.send_replace(AgentStatus::Open);
        loop {
            tokio::select! {
                _ = &mut teardown_rx => break 'lifecycle,
                _ = expiry(banner_deadline), if banner_deadline.is_some() => {
                    state.clear_broadcast();
                    banner_deadline = None;
                    snapshot_tx.send_replace(state.render());
                }
                frame = stream.next_frame() => match frame {
                    Some(Ok(text)) => {
                        if apply_frame(&mut state, &mut banner_deadline, &text) {
                            snapshot_tx.send_replace(state.render());
                        }
                    }
                    Some(Err(e)) => {
                        tracing::debug!("connection error: {}", e);
                        break;
                    }
                    None => {
                        tracing::debug!("connection closed by peer");
                        break;
                    }
                }
            }
        }

        // ---- Reconnecting (unexpected close) ----
        match reconnect_wait(
            &config,
            &status_tx,
            &snapshot_tx,
            &mut state,
            &mut banner_deadline,
            &mut teardown_rx,
        )
        .await
        {
            WaitOutcome::Retry => continue 'lifecycle,
            WaitOutcome::Teardown => break 'lifecycle,
        }
    }

    status_tx.send_replace(AgentStatus::Closed);
}

enum WaitOutcome {
    Retry,
    Teardown,
}

/// Sits out the flat backoff delay, still servicing banner expiry.
async fn reconnect_wait(
    config: &AgentConfig,
    status_tx: &watch::Sender<AgentStatus>,
    snapshot_tx: &watch::Sender<DashboardSnapshot>,
    state: &mut DashboardState,
    banner_deadline: &mut Option<Instant>,
    teardown_rx: &mut oneshot::Receiver<()>,
) -> WaitOutcome {
    status_tx.send_replace(AgentStatus::Reconnecting);
    let delay = sleep(config.reconnect_delay);
    tokio::pin!(delay);

    loop {
        tokio::select! {
            _ = &mut *teardown_rx => return WaitOutcome::Teardown,
            _ = &mut delay => return WaitOutcome::Retry,
            _ = expiry(*banner_deadline), if banner_deadline.is_some() => {
                state.clear_broadcast();
                *banner_deadline = None;
                snapshot_tx.send_replace(state.render());
            }
        }
    }
}

/// Sleeps until the banner deadline. Only polled when a deadline is armed.
async fn expiry(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// Applies one inbound frame to the local state.
///
/// Returns whether the snapshot changed. Malformed payloads are logged and
/// dropped; they never affect the connection. Unknown event kinds are
/// silent no-ops for forward compatibility.
fn apply_frame(
    state: &mut DashboardState,
    banner_deadline: &mut Option<Instant>,
    text: &str,
) -> bool {
    let event: AlertEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("dropping malformed event payload: {}", e);
            return false;
        }
    };

    match event {
        AlertEvent::PhishingAlert(alert) => {
            state.apply_alert(alert);
            true
        }
        AlertEvent::BroadcastWarning(warning) => {
            state.apply_warning(&warning);
            *banner_deadline = Some(Instant::now() + warning.ttl());
            true
        }
        AlertEvent::Unknown => {
            tracing::trace!("ignoring unknown event kind");
            false
        }
    }
}
