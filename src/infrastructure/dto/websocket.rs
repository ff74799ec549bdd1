//! WebSocket frame DTOs for the fan-out gateway.

use serde::{Deserialize, Serialize};

use super::http::MessageDto;

/// Server-to-client event type tag
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    Connected,
    Subscribed,
    Unsubscribed,
    NewMessage,
    Error,
}

/// Client-to-server frames
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientFrame {
    /// Join a room's event channel (idempotent)
    Subscribe { room_id: String },
    /// Leave a room's event channel (idempotent)
    Unsubscribe { room_id: String },
}

/// Sent once right after a successful handshake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectedMessage {
    pub r#type: EventType,
    pub user_id: String,
}

/// Acknowledgement of a subscribe/unsubscribe frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionAck {
    pub r#type: EventType,
    pub room_id: String,
}

/// Rejection of a client frame; the connection stays open
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub r#type: EventType,
    pub message: String,
}

/// Fan-out event carrying a newly stored message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessageEvent {
    pub r#type: EventType,
    pub room_id: String,
    pub message: MessageDto,
}
