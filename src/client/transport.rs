//! WebSocket transport for the connection agent.
//!
//! Speaks the `/ws/alerts` endpoint over tokio-tungstenite. The scheme
//! follows the REST base: `http` bases connect over `ws`, `https` over
//! `wss`. No subprotocol is negotiated; payloads are UTF-8 JSON text
//! frames.

use async_trait::async_trait;
use futures::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use crate::ports::{ChannelTransport, EventStream, TransportError};

/// Well-known path of the push channel.
pub const ALERTS_WS_PATH: &str = "/ws/alerts";

/// Derives the push channel url from the REST API base.
pub fn ws_url_from_api_base(api_base: &str) -> Result<String, TransportError> {
    let url = Url::parse(api_base)
        .map_err(|e| TransportError::Handshake(format!("invalid api base '{}': {}", api_base, e)))?;

    let scheme = match url.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => {
            return Err(TransportError::Handshake(format!(
                "unsupported api base scheme '{}'",
                other
            )))
        }
    };

    let host = url
        .host_str()
        .ok_or_else(|| TransportError::Handshake("api base has no host".to_string()))?;

    let authority = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    Ok(format!("{}://{}{}", scheme, authority, ALERTS_WS_PATH))
}

/// Production transport over tokio-tungstenite.
pub struct WebSocketTransport {
    url: String,
}

impl WebSocketTransport {
    /// Connects to an explicit WebSocket url.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Derives the channel url from the configured REST base.
    pub fn for_api_base(api_base: &str) -> Result<Self, TransportError> {
        Ok(Self::new(ws_url_from_api_base(api_base)?))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChannelTransport for WebSocketTransport {
    async fn connect(&self) -> Result<Box<dyn EventStream>, TransportError> {
        let (stream, _response) = connect_async(self.url.as_str())
            .await
            .map_err(|e| TransportError::Handshake(e.to_string()))?;
        tracing::debug!(url = %self.url, "alert channel connected");
        Ok(Box::new(WebSocketEventStream { inner: stream }))
    }
}

struct WebSocketEventStream {
    inner: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
}

#[async_trait]
impl EventStream for WebSocketEventStream {
    async fn next_frame(&mut self) -> Option<Result<String, TransportError>> {
        loop {
            match self.inner.next().await {
                Some(Ok(Message::Text(text))) => return Some(Ok(text)),
                Some(Ok(Message::Binary(_))) => {
                    // The channel is text-only; tolerate and skip.
                    tracing::warn!("ignoring unexpected binary frame");
                }
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {
                    // Keep-alive frames are handled by tungstenite itself.
                }
                Some(Ok(Message::Frame(_))) => {
                    // Raw frames never surface from a read loop.
                }
                Some(Ok(Message::Close(_))) => return None,
                Some(Err(e)) => return Some(Err(TransportError::Connection(e.to_string()))),
                None => return None,
            }
        }
    }
}
