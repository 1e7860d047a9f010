//! Foundation value objects shared across the domain.

mod ids;
mod role;
mod timestamp;

pub use ids::{AlertId, SessionId};
pub use role::Role;
pub use timestamp::Timestamp;
