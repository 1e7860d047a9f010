//! Application handlers.
//!
//! Command handlers that orchestrate the alert channel: producer-side
//! ingestion and the admin broadcast command.

mod broadcast_team_warning;
mod publish_alert;

pub use broadcast_team_warning::{
    BroadcastCommandError, BroadcastTeamWarningCommand, BroadcastTeamWarningHandler,
};
pub use publish_alert::{PublishAlertError, PublishAlertHandler};
