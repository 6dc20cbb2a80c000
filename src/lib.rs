//! NetSentinel: endpoint status change monitor
//!
//! A library for probing a list of endpoints, detecting HTTP status changes
//! between runs and reporting them through chat and mail channels.

pub mod checker;
pub mod config;
pub mod notify;
pub mod probe;
pub mod state;
pub mod targets;
pub mod time;
pub mod transport;
