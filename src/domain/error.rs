//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserId validation error
    #[error("UserId cannot be empty")]
    UserIdEmpty,

    /// UserId too long error
    #[error("UserId cannot exceed {max} characters (got {actual})")]
    UserIdTooLong { max: usize, actual: usize },

    /// RoomId invalid format error (not a valid UUID format)
    #[error("RoomId must be a valid UUID format (got: {0})")]
    RoomIdInvalidFormat(String),

    /// MessageId invalid format error (not a valid UUID format)
    #[error("MessageId must be a valid UUID format (got: {0})")]
    MessageIdInvalidFormat(String),

    /// RoomName validation error
    #[error("room name cannot be empty")]
    RoomNameEmpty,

    /// RoomName too long error
    #[error("room name cannot exceed {max} characters (got {actual})")]
    RoomNameTooLong { max: usize, actual: usize },

    /// RoomCapacity out of range error
    #[error("max_members must be between {min} and {max} (got {actual})")]
    RoomCapacityOutOfRange {
        min: usize,
        max: usize,
        actual: usize,
    },

    /// MessageContent validation error
    #[error("MessageContent cannot be empty")]
    MessageContentEmpty,

    /// MessageContent too long error
    #[error("MessageContent cannot exceed {max} characters (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },
}

/// Errors related to ChatMessage construction
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// Text messages must carry content
    #[error("text messages require non-empty content")]
    ContentRequired,
}

/// Errors surfaced by repository implementations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Referenced room does not exist in the store
    #[error("room not found: {0}")]
    RoomNotFound(String),

    /// Referenced membership record does not exist
    #[error("membership not found for user '{user_id}' in room '{room_id}'")]
    MembershipNotFound { room_id: String, user_id: String },

    /// An id lookup exceeded the store's batch limit
    #[error("id batch too large: at most {max} ids per lookup (got {actual})")]
    BatchTooLarge { max: usize, actual: usize },
}
