//! room-server
//!
//! Multi-session async TCP server hosting one room.

pub mod config;
pub mod map_client;
pub mod news_client;
pub mod server;
pub mod types;

// these are internal modules, not re-exported
mod router;
mod session;
