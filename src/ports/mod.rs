//! Ports - interfaces between the application core and its adapters.

mod alert_publisher;
mod channel_transport;
mod incident_store;
mod state_hydrator;

pub use alert_publisher::{AlertPublisher, PublishError};
pub use channel_transport::{ChannelTransport, EventStream, TransportError};
pub use incident_store::{IncidentReadError, IncidentReader, IncidentWriter, StatsReader};
pub use state_hydrator::{DashboardStats, HydrationError, StateHydrator};
