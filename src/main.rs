//! SecureGuard alert channel service.
//!
//! Wires the session registry, the fan-out hub, and the REST surface into
//! one axum server. The detection pipeline publishes through the
//! [`AlertPublisher`] port; dashboards connect to `/ws/alerts` and hydrate
//! from `/api/v1/dashboard/stats`.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use secureguard_alerts::adapters::http::{app_router, cors_layer, HttpState};
use secureguard_alerts::adapters::incidents::InMemoryIncidentStore;
use secureguard_alerts::adapters::websocket::{AlertHub, ChannelState, SessionRegistry};
use secureguard_alerts::application::handlers::BroadcastTeamWarningHandler;
use secureguard_alerts::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.server);

    let registry = Arc::new(SessionRegistry::new(config.channel.session_buffer));
    let hub = AlertHub::new(registry.clone());
    let store = Arc::new(InMemoryIncidentStore::new());
    let broadcast = Arc::new(BroadcastTeamWarningHandler::new(store.clone(), hub.clone()));

    let app = app_router(
        ChannelState::new(registry),
        HttpState {
            stats: store,
            broadcast,
        },
        cors_layer(&config.server.cors_origins_list()),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "alert channel service listening");

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(config: &ServerConfig) {
    let filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
