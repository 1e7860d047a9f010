//! WebSocket adapters: the push side of the alert channel.
//!
//! # Architecture
//!
//! ```text
//! Detection pipeline / admin command
//!                │ publish(AlertEvent)
//!                ▼
//! ┌──────────────────────────────┐
//! │           AlertHub           │  serialize once, sequence, fan out
//! └──────────────────────────────┘
//!                │ try_send per session (failure isolated)
//!                ▼
//! ┌──────────────────────────────┐
//! │        SessionRegistry       │  Connecting / Open / Closing sessions
//! └──────────────────────────────┘
//!                │ bounded frame buffers
//!                ▼
//!      per-connection handlers ──► N dashboard sockets
//! ```
//!
//! A failed delivery to one session unregisters that session and nothing
//! else; the hub never retries on the push path.

pub mod handler;
pub mod hub;
pub mod registry;

pub use handler::{alerts_ws_handler, role_from_headers, ChannelState, ROLE_HEADER};
pub use hub::AlertHub;
pub use registry::{ConnectionState, SessionHandle, SessionRegistry};
