//! Router assembly for the alert channel service.

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::adapters::websocket::{alerts_ws_handler, ChannelState};

use super::handlers::{admin_broadcast, get_dashboard_stats, HttpState};

/// Builds the CORS layer from configured origins.
///
/// An empty list keeps the permissive development posture; production
/// deployments list their dashboard origins explicitly.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Creates the full application router: push channel plus REST surface.
pub fn app_router(channel_state: ChannelState, http_state: HttpState, cors: CorsLayer) -> Router {
    let channel = Router::new()
        .route("/ws/alerts", get(alerts_ws_handler))
        .with_state(channel_state);

    let api = Router::new()
        .route("/api/v1/dashboard/stats", get(get_dashboard_stats))
        .route("/api/v1/admin/broadcast", post(admin_broadcast))
        .with_state(http_state);

    channel
        .merge(api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
