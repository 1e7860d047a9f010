//! HTTP handlers for the alert channel REST surface.
//!
//! Two endpoints: the dashboard hydration pull and the admin broadcast
//! command. The broadcast command requires the admin role, conveyed by the
//! external auth layer in the same header the WebSocket upgrade uses.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::{
    BroadcastCommandError, BroadcastTeamWarningCommand, BroadcastTeamWarningHandler,
};
use crate::adapters::websocket::role_from_headers;
use crate::ports::StatsReader;

use super::dto::{BroadcastRequest, BroadcastResponse, DashboardStats, ErrorResponse};

// ============================================
// Error Type
// ============================================

/// REST API error that implements IntoResponse.
pub enum ApiError {
    Forbidden(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorResponse::forbidden(msg)),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::not_found(msg)),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal(msg))
            }
        };
        (status, Json(error)).into_response()
    }
}

impl From<BroadcastCommandError> for ApiError {
    fn from(error: BroadcastCommandError) -> Self {
        match error {
            BroadcastCommandError::IncidentNotFound(id) => {
                ApiError::NotFound(format!("Incident {} not found", id))
            }
            BroadcastCommandError::Lookup(e) => ApiError::Internal(e.to_string()),
            BroadcastCommandError::Publish(e) => ApiError::Internal(e.to_string()),
        }
    }
}

// ============================================
// Application State
// ============================================

/// Shared state for the REST handlers.
#[derive(Clone)]
pub struct HttpState {
    pub stats: Arc<dyn StatsReader>,
    pub broadcast: Arc<BroadcastTeamWarningHandler>,
}

// ============================================
// Handlers
// ============================================

/// `GET /api/v1/dashboard/stats`
///
/// One-shot aggregate pull used by dashboards to seed their state before
/// (and independently of) the push channel.
pub async fn get_dashboard_stats(State(state): State<HttpState>) -> Json<DashboardStats> {
    Json(state.stats.stats().await)
}

/// `POST /api/v1/admin/broadcast`
///
/// Publishes a team-wide warning derived from a prior incident. Requires
/// the admin role; fails without publishing anything when the incident is
/// unknown.
pub async fn admin_broadcast(
    State(state): State<HttpState>,
    headers: HeaderMap,
    Json(request): Json<BroadcastRequest>,
) -> Result<Json<BroadcastResponse>, ApiError> {
    let role = role_from_headers(&headers);
    if !role.is_admin() {
        return Err(ApiError::Forbidden(
            "Broadcast requires the admin role".to_string(),
        ));
    }

    state
        .broadcast
        .handle(BroadcastTeamWarningCommand {
            incident_id: request.incident_id,
        })
        .await?;

    Ok(Json(BroadcastResponse::sent()))
}
