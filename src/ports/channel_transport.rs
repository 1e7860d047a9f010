//! ChannelTransport port - how the connection agent reaches the push channel.
//!
//! The agent's state machine is written against this seam so tests can
//! script handshake failures and inbound frames without a network. The
//! production implementation speaks WebSocket via tokio-tungstenite.

use async_trait::async_trait;

/// Errors surfaced by the transport.
///
/// All of these are recoverable from the agent's point of view: any of them
/// sends it to its reconnect path, never to a terminal failure.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection establishment failed.
    #[error("handshake failed: {0}")]
    Handshake(String),

    /// An established stream broke.
    #[error("connection lost: {0}")]
    Connection(String),
}

/// An established inbound event stream.
#[async_trait]
pub trait EventStream: Send {
    /// Next UTF-8 text frame.
    ///
    /// `None` means the peer closed the stream cleanly; `Some(Err(_))` means
    /// it broke. Either way the stream is finished afterwards.
    async fn next_frame(&mut self) -> Option<Result<String, TransportError>>;
}

/// Port for establishing the push channel.
#[async_trait]
pub trait ChannelTransport: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn EventStream>, TransportError>;
}
