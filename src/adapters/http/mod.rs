//! HTTP adapters - the REST surface of the alert channel.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{BroadcastRequest, BroadcastResponse, ErrorResponse};
pub use handlers::{admin_broadcast, get_dashboard_stats, ApiError, HttpState};
pub use routes::{app_router, cors_layer};
