//! Alert channel configuration: fan-out tuning and client-side settings.

use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;

/// Fan-out tuning for the push side.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    /// Per-session frame buffer capacity. A session that falls this many
    /// frames behind is treated as dead and unregistered.
    #[serde(default = "default_session_buffer")]
    pub session_buffer: usize,
}

impl ChannelConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.session_buffer == 0 {
            return Err(ValidationError::ZeroSessionBuffer);
        }
        Ok(())
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            session_buffer: default_session_buffer(),
        }
    }
}

/// Settings for the client connection agent.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// REST API base the agent hydrates from; the WebSocket endpoint is
    /// derived from it (`http` -> `ws`, `https` -> `wss`).
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Flat delay between reconnect attempts, in seconds.
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
}

impl ClientConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(ValidationError::InvalidApiBase);
        }
        if self.reconnect_delay_secs == 0 {
            return Err(ValidationError::ZeroReconnectDelay);
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
        }
    }
}

fn default_session_buffer() -> usize {
    64
}

fn default_api_base() -> String {
    "http://localhost:8000".to_string()
}

fn default_reconnect_delay_secs() -> u64 {
    3
}
