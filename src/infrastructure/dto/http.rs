//! HTTP API request/response DTOs for the chat service.

use serde::{Deserialize, Serialize};

use crate::{
    common::time::millis_to_rfc3339,
    domain::{ChatMessage, MessageType, Room, RoomKind, UserProfile, UserRole},
};

/// User profile as rendered in API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileDto {
    pub id: String,
    pub name: String,
    pub role: UserRole,
}

impl UserProfileDto {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.as_str().to_string(),
            name: profile.name.clone(),
            role: profile.role,
        }
    }
}

fn default_max_members() -> usize {
    100
}

/// Body of `POST /api/rooms`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub kind: RoomKind,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default = "default_max_members")]
    pub max_members: usize,
}

/// Body of `POST /api/rooms/{room_id}/messages`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub message_type: MessageType,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub reply_to_id: Option<String>,
}

/// Query parameters of `GET /api/rooms/{room_id}/messages`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagePageQuery {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Room enriched with member profiles and message count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub kind: RoomKind,
    pub is_private: bool,
    pub max_members: usize,
    /// Creator profile; absent when the creator left the directory
    pub created_by: Option<UserProfileDto>,
    /// Active members in join order
    pub members: Vec<UserProfileDto>,
    /// Non-deleted message count
    pub message_count: usize,
    pub created_at: String, // ISO 8601
    pub updated_at: String, // ISO 8601
}

impl RoomDto {
    pub fn from_room(
        room: &Room,
        created_by: Option<&UserProfile>,
        members: &[UserProfile],
        message_count: usize,
    ) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            name: room.name.as_str().to_string(),
            description: room.description.clone(),
            kind: room.kind,
            is_private: room.is_private,
            max_members: room.max_members.value(),
            created_by: created_by.map(UserProfileDto::from_profile),
            members: members.iter().map(UserProfileDto::from_profile).collect(),
            message_count,
            created_at: millis_to_rfc3339(room.created_at.value()),
            updated_at: millis_to_rfc3339(room.updated_at.value()),
        }
    }
}

/// The message a message replies to, shown inline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyDto {
    pub id: String,
    pub sender: Option<UserProfileDto>,
    pub content: Option<String>,
    pub message_type: MessageType,
}

impl ReplyDto {
    pub fn from_message(message: &ChatMessage, sender: Option<&UserProfile>) -> Self {
        Self {
            id: message.id.as_str().to_string(),
            sender: sender.map(UserProfileDto::from_profile),
            content: message.content.as_ref().map(|c| c.as_str().to_string()),
            message_type: message.message_type,
        }
    }
}

/// Message enriched with sender profile and reply context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: String,
    pub room_id: String,
    /// Sender profile; absent when the sender left the directory
    pub sender: Option<UserProfileDto>,
    pub content: Option<String>,
    pub message_type: MessageType,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub reply_to: Option<ReplyDto>,
    pub created_at: String, // ISO 8601
}

impl MessageDto {
    pub fn from_message(
        message: &ChatMessage,
        sender: Option<&UserProfile>,
        reply_to: Option<ReplyDto>,
    ) -> Self {
        Self {
            id: message.id.as_str().to_string(),
            room_id: message.room_id.as_str().to_string(),
            sender: sender.map(UserProfileDto::from_profile),
            content: message.content.as_ref().map(|c| c.as_str().to_string()),
            message_type: message.message_type,
            file_url: message.file_url.clone(),
            file_name: message.file_name.clone(),
            file_size: message.file_size,
            reply_to,
            created_at: millis_to_rfc3339(message.created_at.value()),
        }
    }
}

/// Offset-style pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationDto {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
}

/// Response of the message-list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageListDto {
    pub messages: Vec<MessageDto>,
    pub pagination: PaginationDto,
}

/// Response of the unread-count endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCountDto {
    pub room_id: String,
    pub unread: usize,
}

/// Plain success acknowledgement for join/leave
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessDto {
    pub success: bool,
}

/// Structured error body returned by the facade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}
