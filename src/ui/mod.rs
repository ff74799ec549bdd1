//! UI layer: HTTP facade and WebSocket endpoint.

pub mod error;
pub mod handler;
pub mod state;
