//! HTTP DTOs for the alert channel endpoints.
//!
//! The stats payload reuses [`DashboardStats`] directly; it is already
//! shaped for serialization.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::AlertId;

pub use crate::ports::DashboardStats;

/// Body of the admin broadcast command.
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastRequest {
    pub incident_id: AlertId,
}

/// Acknowledgement returned when a broadcast was published.
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastResponse {
    pub status: &'static str,
}

impl BroadcastResponse {
    pub fn sent() -> Self {
        Self { status: "sent" }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            code: "FORBIDDEN".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}
