//! Real-time campus chat service.
//!
//! Rooms, membership with capacity enforcement, an append-only message log
//! with unread tracking, and WebSocket fan-out of newly stored messages to
//! connected clients.

pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod logger;
pub mod server;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use server::{ServerConfig, run_server};
