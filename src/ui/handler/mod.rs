//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{
    create_room, get_room_detail, get_unread_count, health_check, join_room, leave_room,
    list_messages, list_rooms, send_message,
};

// Re-export WebSocket handlers
pub use websocket::websocket_handler;
