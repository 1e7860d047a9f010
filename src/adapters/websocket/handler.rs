//! WebSocket upgrade handler for the alert channel.
//!
//! Connection lifecycle:
//! 1. Register the session (`Connecting`)
//! 2. Upgrade to WebSocket and mark it `Open`
//! 3. Pump hub frames from the session buffer onto the socket
//! 4. Read inbound frames for liveness only
//! 5. Unregister on any exit path

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::HeaderMap,
    response::Response,
};
use futures::{SinkExt, StreamExt};

use crate::domain::foundation::Role;

use super::registry::SessionRegistry;

/// Header the external auth layer uses to convey the caller's role.
///
/// Token verification happens upstream; by the time a request is here the
/// value is trusted.
pub const ROLE_HEADER: &str = "x-user-role";

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct ChannelState {
    pub registry: Arc<SessionRegistry>,
}

impl ChannelState {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }
}

/// Extracts the caller role established by the auth collaborator.
pub fn role_from_headers(headers: &HeaderMap) -> Role {
    headers
        .get(ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}

/// Handles WebSocket upgrade requests for the alert stream.
///
/// Route: `GET /ws/alerts`
pub async fn alerts_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<ChannelState>,
    headers: HeaderMap,
) -> Response {
    let role = role_from_headers(&headers);
    ws.on_upgrade(move |socket| handle_socket(socket, role, state))
}

/// Runs for the lifetime of one established connection.
async fn handle_socket(socket: WebSocket, role: Role, state: ChannelState) {
    let (session_id, mut frames) = state.registry.register(role).await;
    state.registry.mark_open(session_id).await;

    let (mut sender, mut receiver) = socket.split();

    // Forward hub frames to the client until the buffer or socket closes.
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = frames.recv().await {
            if let Err(e) = sender.send(Message::Text(frame)).await {
                tracing::debug!(%session_id, "send error, closing connection: {}", e);
                break;
            }
        }
    });

    // Inbound frames only refresh liveness; clients have nothing to say on
    // this channel beyond keep-alives.
    let registry = state.registry.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(_)) | Ok(Message::Binary(_)) => {
                    registry.touch(session_id).await;
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // Protocol-level frames are handled by axum.
                }
                Ok(Message::Close(_)) => {
                    registry.mark_closing(session_id).await;
                    break;
                }
                Err(e) => {
                    tracing::debug!(%session_id, "receive error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.registry.unregister(session_id).await;
    tracing::debug!(%session_id, "connection closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn role_defaults_to_user_without_header() {
        let headers = HeaderMap::new();
        assert_eq!(role_from_headers(&headers), Role::User);
    }

    #[test]
    fn role_header_is_honored() {
        let mut headers = HeaderMap::new();
        headers.insert(ROLE_HEADER, HeaderValue::from_static("admin"));
        assert_eq!(role_from_headers(&headers), Role::Admin);
    }

    #[test]
    fn unparseable_role_falls_back_to_user() {
        let mut headers = HeaderMap::new();
        headers.insert(ROLE_HEADER, HeaderValue::from_static("superuser"));
        assert_eq!(role_from_headers(&headers), Role::User);
    }
}
