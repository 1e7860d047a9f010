//! Alert domain: the event model shared by producer and consumers, plus the
//! client-local display structures.

mod broadcast;
mod event;
mod feed;
mod incident;

pub use broadcast::ActiveBroadcast;
pub use event::{
    AlertEvent, BroadcastWarning, PhishingAlert, Severity, DEFAULT_BROADCAST_TTL_SECS,
};
pub use feed::{AlertFeed, FEED_CAPACITY};
pub use incident::Incident;
