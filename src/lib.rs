//! SecureGuard Alerts - real-time security-alert broadcast channel
//!
//! This crate implements the live alert path of the SecureGuard dashboard:
//! a single-producer WebSocket fan-out from the detection backend to every
//! connected session, the admin broadcast-to-team warning command, and the
//! per-client connection agent with reconnect, feed bookkeeping, and banner
//! expiry.

pub mod adapters;
pub mod application;
pub mod client;
pub mod config;
pub mod domain;
pub mod ports;
