//! Core domain models for the chat service.

use serde::{Deserialize, Serialize};

use super::{
    error::MessageError,
    value_object::{MessageContent, MessageId, RoomCapacity, RoomId, RoomName, Timestamp, UserId},
};

/// Role resolved by the identity provider for a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Faculty,
    Hod,
    Student,
}

/// Profile resolved from the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Portal role
    pub role: UserRole,
}

impl UserProfile {
    /// Create a new profile
    pub fn new(id: UserId, name: String, role: UserRole) -> Self {
        Self { id, name, role }
    }
}

/// Kind of a chat room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    Group,
    Direct,
    Course,
    Department,
}

/// Role of a member inside a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Member,
}

/// Represents a chat room. Membership and messages live in their own
/// records; the room itself only carries metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier
    pub id: RoomId,
    /// Room name
    pub name: RoomName,
    /// Optional description
    pub description: Option<String>,
    /// Kind of room
    pub kind: RoomKind,
    /// Whether the room is private
    pub is_private: bool,
    /// Maximum number of active members
    pub max_members: RoomCapacity,
    /// User who created the room
    pub created_by: UserId,
    /// Timestamp when the room was created
    pub created_at: Timestamp,
    /// Bumped on every successful message send
    pub updated_at: Timestamp,
}

impl Room {
    /// Create a new room. The creator's admin membership is a separate
    /// record inserted by the room-creation use case.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: RoomId,
        name: RoomName,
        description: Option<String>,
        kind: RoomKind,
        is_private: bool,
        max_members: RoomCapacity,
        created_by: UserId,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            description,
            kind,
            is_private,
            max_members,
            created_by,
            created_at,
            updated_at: created_at,
        }
    }

    /// Whether a room with the given active-member count cannot accept
    /// another member.
    pub fn is_full(&self, active_members: usize) -> bool {
        active_members >= self.max_members.value()
    }

    /// Bump updated_at.
    pub fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}

/// The relation linking a user to a room.
///
/// At most one record exists per (room, user) pair. Leaving flips
/// `is_active` to false; rejoining reactivates the same record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    /// Room identifier
    pub room_id: RoomId,
    /// User identifier
    pub user_id: UserId,
    /// Role inside the room
    pub role: MemberRole,
    /// Soft-leave flag; history is never deleted
    pub is_active: bool,
    /// Timestamp of the (latest) join
    pub joined_at: Timestamp,
    /// Read cursor used to compute unread counts
    pub last_read_at: Option<Timestamp>,
}

impl Membership {
    /// Create a new active membership with no read cursor.
    pub fn new(room_id: RoomId, user_id: UserId, role: MemberRole, joined_at: Timestamp) -> Self {
        Self {
            room_id,
            user_id,
            role,
            is_active: true,
            joined_at,
            last_read_at: None,
        }
    }

    /// Reactivate a membership after a soft leave. Refreshes the join
    /// timestamp; the read cursor survives.
    pub fn reactivate(&mut self, now: Timestamp) {
        self.is_active = true;
        self.joined_at = now;
    }

    /// Soft leave.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Advance the read cursor.
    pub fn mark_read(&mut self, now: Timestamp) {
        self.last_read_at = Some(now);
    }
}

/// Type of a chat message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Text,
    Image,
    File,
    System,
}

/// Payload for constructing a new [`ChatMessage`].
#[derive(Debug, Clone, Default)]
pub struct MessageDraft {
    /// Message body; required for text messages
    pub content: Option<MessageContent>,
    /// Type of message
    pub message_type: MessageType,
    /// Attachment URL
    pub file_url: Option<String>,
    /// Attachment file name
    pub file_name: Option<String>,
    /// Attachment size in bytes
    pub file_size: Option<u64>,
    /// Message in the same room this one replies to
    pub reply_to_id: Option<MessageId>,
}

/// A stored chat message. Immutable after creation except for the
/// soft-delete flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message identifier
    pub id: MessageId,
    /// Room the message belongs to
    pub room_id: RoomId,
    /// Sender's user id
    pub sender_id: UserId,
    /// Message body; absent only for non-text messages
    pub content: Option<MessageContent>,
    /// Type of message
    pub message_type: MessageType,
    /// Attachment URL
    pub file_url: Option<String>,
    /// Attachment file name
    pub file_name: Option<String>,
    /// Attachment size in bytes
    pub file_size: Option<u64>,
    /// Message in the same room this one replies to
    pub reply_to_id: Option<MessageId>,
    /// Soft-delete flag; messages are never physically removed
    pub is_deleted: bool,
    /// Timestamp when the message was created
    pub created_at: Timestamp,
    /// Timestamp of the last metadata change
    pub updated_at: Timestamp,
}

impl ChatMessage {
    /// Create a new message.
    ///
    /// # Errors
    ///
    /// Returns `MessageError::ContentRequired` when a text message carries
    /// no content
    pub fn new(
        id: MessageId,
        room_id: RoomId,
        sender_id: UserId,
        draft: MessageDraft,
        created_at: Timestamp,
    ) -> Result<Self, MessageError> {
        if draft.message_type == MessageType::Text && draft.content.is_none() {
            return Err(MessageError::ContentRequired);
        }
        Ok(Self {
            id,
            room_id,
            sender_id,
            content: draft.content,
            message_type: draft.message_type,
            file_url: draft.file_url,
            file_name: draft.file_name,
            file_size: draft.file_size,
            reply_to_id: draft.reply_to_id,
            is_deleted: false,
            created_at,
            updated_at: created_at,
        })
    }
}
