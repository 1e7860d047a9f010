//! Client side of the alert channel.
//!
//! One [`AlertStreamAgent`] per dashboard session owns the whole connection
//! lifecycle: the hydration pull, the WebSocket, reconnects with flat
//! backoff, the alert feed, and the broadcast banner with its expiry. The
//! presentation layer gets a typed snapshot stream and a teardown
//! capability, and nothing else; transport errors never leave this module.

pub mod agent;
pub mod hydration;
pub mod snapshot;
pub mod transport;

pub use agent::{AgentConfig, AgentHandle, AlertStreamAgent};
pub use hydration::{RestStateHydrator, STATS_PATH};
pub use snapshot::{AgentStatus, DashboardSnapshot};
pub use transport::{ws_url_from_api_base, WebSocketTransport, ALERTS_WS_PATH};

use std::sync::Arc;

use crate::ports::{HydrationError, TransportError};

/// Errors building a live agent from an API base url.
#[derive(Debug, thiserror::Error)]
pub enum AgentBuildError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Hydration(#[from] HydrationError),
}

/// Builds a production agent from the REST base url.
///
/// Derives the WebSocket endpoint (`http` -> `ws`, `https` -> `wss`) and
/// wires the hydration client against the same base.
pub fn agent_for_api_base(
    api_base: &str,
    config: AgentConfig,
) -> Result<AlertStreamAgent, AgentBuildError> {
    let transport = Arc::new(WebSocketTransport::for_api_base(api_base)?);
    let hydrator = Arc::new(RestStateHydrator::new(api_base)?);
    Ok(AlertStreamAgent::new(transport, Some(hydrator), config))
}
