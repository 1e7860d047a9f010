//! Application layer: command handlers over the domain and ports.

pub mod handlers;
