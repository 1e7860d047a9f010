//! End-to-end tests of the alert channel over real sockets.
//!
//! Each test starts the full axum application on an ephemeral port and
//! drives it the way production clients do: raw WebSocket connections for
//! the fan-out properties, reqwest for the REST surface, and the actual
//! connection agent for the client-side path.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{Stream, StreamExt};
use tokio::time::{sleep, timeout};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use secureguard_alerts::adapters::http::{app_router, cors_layer, HttpState};
use secureguard_alerts::adapters::incidents::InMemoryIncidentStore;
use secureguard_alerts::adapters::websocket::{AlertHub, ChannelState, SessionRegistry};
use secureguard_alerts::application::handlers::{
    BroadcastTeamWarningHandler, PublishAlertHandler,
};
use secureguard_alerts::client::{agent_for_api_base, AgentConfig, AgentStatus};
use secureguard_alerts::domain::alerts::{Incident, Severity};
use secureguard_alerts::domain::foundation::{AlertId, Timestamp};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestServer {
    addr: SocketAddr,
    registry: Arc<SessionRegistry>,
    publish: PublishAlertHandler,
}

impl TestServer {
    async fn start() -> Self {
        let registry = Arc::new(SessionRegistry::with_default_capacity());
        let hub = AlertHub::new(registry.clone());
        let store = Arc::new(InMemoryIncidentStore::new());
        let broadcast = Arc::new(BroadcastTeamWarningHandler::new(store.clone(), hub.clone()));
        let publish = PublishAlertHandler::new(store.clone(), hub);

        let app = app_router(
            ChannelState::new(registry.clone()),
            HttpState {
                stats: store,
                broadcast,
            },
            cors_layer(&[]),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server run");
        });

        Self {
            addr,
            registry,
            publish,
        }
    }

    fn api_base(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn ws_url(&self) -> String {
        format!("ws://{}/ws/alerts", self.addr)
    }

    /// Waits until the registry reports `count` open sessions.
    async fn await_open_sessions(&self, count: usize) {
        let registry = self.registry.clone();
        timeout(Duration::from_secs(5), async move {
            while registry.open_count().await != count {
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("sessions did not open in time");
    }
}

fn incident(id: &str, sender: &str, subject: &str) -> Incident {
    Incident::new(
        AlertId::from(id),
        sender,
        subject,
        Severity::High,
        0.95,
        Timestamp::now(),
    )
}

async fn next_json(
    socket: &mut (impl Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
              + Unpin),
) -> serde_json::Value {
    let frame = timeout(Duration::from_secs(5), async {
        loop {
            match socket.next().await {
                Some(Ok(Message::Text(text))) => return text,
                Some(Ok(_)) => continue,
                other => panic!("stream ended unexpectedly: {:?}", other),
            }
        }
    })
    .await
    .expect("no frame within timeout");
    serde_json::from_str(&frame).expect("frame is valid JSON")
}

// =============================================================================
// Fan-out
// =============================================================================

#[tokio::test]
async fn two_open_sessions_receive_identical_payloads_in_order() {
    let server = TestServer::start().await;

    let (mut socket_a, _) = connect_async(server.ws_url()).await.expect("connect a");
    let (mut socket_b, _) = connect_async(server.ws_url()).await.expect("connect b");
    server.await_open_sessions(2).await;

    for n in 0..3 {
        server
            .publish
            .handle(incident(
                &format!("inc-{}", n),
                "billing@phish.example",
                &format!("subject {}", n),
            ))
            .await
            .expect("publish");
    }

    for n in 0..3 {
        let frame_a = next_json(&mut socket_a).await;
        let frame_b = next_json(&mut socket_b).await;
        assert_eq!(frame_a, frame_b);
        assert_eq!(frame_a["type"], "phishing_alert");
        assert_eq!(frame_a["id"], format!("inc-{}", n));
        assert_eq!(frame_a["detail"], format!("subject {}", n));
    }
}

#[tokio::test]
async fn disconnected_session_is_unregistered_and_others_still_receive() {
    let server = TestServer::start().await;

    let (socket_a, _) = connect_async(server.ws_url()).await.expect("connect a");
    let (mut socket_b, _) = connect_async(server.ws_url()).await.expect("connect b");
    server.await_open_sessions(2).await;

    drop(socket_a);
    server.await_open_sessions(1).await;

    server
        .publish
        .handle(incident("inc-1", "billing@phish.example", "s"))
        .await
        .expect("publish");

    let frame = next_json(&mut socket_b).await;
    assert_eq!(frame["type"], "phishing_alert");
}

// =============================================================================
// REST surface
// =============================================================================

#[tokio::test]
async fn stats_endpoint_reports_published_incidents() {
    let server = TestServer::start().await;

    server
        .publish
        .handle(incident("inc-1", "a@phish.example", "first"))
        .await
        .expect("publish");
    server
        .publish
        .handle(incident("inc-2", "b@phish.example", "second"))
        .await
        .expect("publish");

    let stats: serde_json::Value = reqwest::get(format!(
        "{}/api/v1/dashboard/stats",
        server.api_base()
    ))
    .await
    .expect("request")
    .json()
    .await
    .expect("json body");

    assert_eq!(stats["total_scans"], 2);
    assert_eq!(stats["threats_detected"], 2);
    assert_eq!(stats["alerts"][0]["id"], "inc-2");
    assert_eq!(stats["alerts"][1]["id"], "inc-1");
}

#[tokio::test]
async fn admin_broadcast_reaches_every_open_session() {
    let server = TestServer::start().await;

    server
        .publish
        .handle(incident("inc-1", "billing@phish.example", "Invoice"))
        .await
        .expect("publish");

    let (mut socket_a, _) = connect_async(server.ws_url()).await.expect("connect a");
    let (mut socket_b, _) = connect_async(server.ws_url()).await.expect("connect b");
    server.await_open_sessions(2).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/admin/broadcast", server.api_base()))
        .header("x-user-role", "admin")
        .json(&serde_json::json!({ "incident_id": "inc-1" }))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 200);

    // The incident predates both connections, so the banner is the first
    // frame either session sees.
    for socket in [&mut socket_a, &mut socket_b] {
        let frame = next_json(socket).await;
        assert_eq!(frame["type"], "broadcast_warning");
        assert_eq!(frame["title"], "Team Alert");
        assert!(frame["message"]
            .as_str()
            .unwrap()
            .contains("billing@phish.example"));
    }
}

#[tokio::test]
async fn broadcast_without_admin_role_is_forbidden() {
    let server = TestServer::start().await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/admin/broadcast", server.api_base()))
        .json(&serde_json::json!({ "incident_id": "inc-1" }))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn broadcast_for_unknown_incident_is_not_found() {
    let server = TestServer::start().await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/admin/broadcast", server.api_base()))
        .header("x-user-role", "admin")
        .json(&serde_json::json!({ "incident_id": "ghost" }))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.expect("error body");
    assert_eq!(body["code"], "NOT_FOUND");
}

// =============================================================================
// Connection agent against the real server
// =============================================================================

#[tokio::test]
async fn agent_hydrates_then_applies_pushed_events() {
    let server = TestServer::start().await;

    // Two incidents exist before the client loads the page.
    server
        .publish
        .handle(incident("inc-1", "a@phish.example", "first"))
        .await
        .expect("publish");
    server
        .publish
        .handle(incident("inc-2", "b@phish.example", "second"))
        .await
        .expect("publish");

    let agent = agent_for_api_base(&server.api_base(), AgentConfig::default())
        .expect("build agent");
    let handle = agent.spawn();
    server.await_open_sessions(1).await;

    // Hydration picked up the pre-existing state.
    let mut snapshots = handle.watch_snapshot();
    timeout(Duration::from_secs(5), async {
        loop {
            if snapshots.borrow_and_update().threats_detected == 2 {
                break;
            }
            snapshots.changed().await.expect("agent alive");
        }
    })
    .await
    .expect("hydration did not arrive");

    // A live push lands on top of the hydrated counters.
    server
        .publish
        .handle(incident("inc-3", "c@phish.example", "third"))
        .await
        .expect("publish");

    let snapshot = timeout(Duration::from_secs(5), async {
        loop {
            {
                let current = snapshots.borrow_and_update();
                if current.threats_detected == 3 {
                    break current.clone();
                }
            }
            snapshots.changed().await.expect("agent alive");
        }
    })
    .await
    .expect("pushed event did not arrive");

    assert_eq!(snapshot.alerts[0].detail, "third");
    assert!(handle.status().is_open());

    handle.teardown().await;
    server.await_open_sessions(0).await;
}

#[tokio::test]
async fn torn_down_agent_stays_closed() {
    let server = TestServer::start().await;

    let agent = agent_for_api_base(&server.api_base(), AgentConfig::default())
        .expect("build agent");
    let handle = agent.spawn();
    server.await_open_sessions(1).await;

    let status = handle.watch_status();
    handle.teardown().await;
    assert_eq!(*status.borrow(), AgentStatus::Closed);

    // No reconnect attempt follows an explicit teardown.
    sleep(Duration::from_millis(200)).await;
    assert_eq!(server.registry.total_count().await, 0);
}
