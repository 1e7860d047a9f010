//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for one client connection to the alert channel.
///
/// Generated per connection attempt, not per user: the same operator
/// reconnecting gets a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random SessionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a SessionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Identifier of a detected incident / alert.
///
/// The wire contract allows either a JSON string or integer here, so this
/// is not a UUID newtype like [`SessionId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlertId {
    Number(u64),
    Text(String),
}

impl AlertId {
    /// Creates a random string-backed AlertId.
    pub fn random() -> Self {
        Self::Text(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertId::Number(n) => write!(f, "{}", n),
            AlertId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for AlertId {
    fn from(n: u64) -> Self {
        AlertId::Number(n)
    }
}

impl From<&str> for AlertId {
    fn from(s: &str) -> Self {
        AlertId::Text(s.to_string())
    }
}

impl From<String> for AlertId {
    fn from(s: String) -> Self {
        AlertId::Text(s)
    }
}
