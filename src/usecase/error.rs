//! UseCase 層のエラー定義
//!
//! Facade（ui 層)で HTTP ステータスと構造化エラーボディに変換される、
//! 外部から見えるエラー分類です。

use thiserror::Error;

use crate::domain::{MessageError, RepositoryError, ValueObjectError};

/// Externally visible error taxonomy of the chat operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// No resolved caller identity
    #[error("authentication required")]
    Unauthorized,

    /// Missing or malformed required field
    #[error("{0}")]
    Validation(String),

    /// Caller is not an active member of the target room
    #[error("not a member of this room")]
    NotMember,

    /// Referenced room does not exist
    #[error("room not found")]
    RoomNotFound,

    /// Join attempted on a room at max_members
    #[error("room is full")]
    RoomFull,

    /// Join attempted while already an active member
    #[error("already a member of this room")]
    AlreadyMember,

    /// Unexpected storage-layer failure; logged, surfaced as generic
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ChatError {
    /// Machine-readable code carried in the error body, when one exists.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            ChatError::RoomFull => Some("ROOM_FULL"),
            ChatError::AlreadyMember => Some("ALREADY_MEMBER"),
            _ => None,
        }
    }
}

impl From<ValueObjectError> for ChatError {
    fn from(err: ValueObjectError) -> Self {
        ChatError::Validation(err.to_string())
    }
}

impl From<MessageError> for ChatError {
    fn from(err: MessageError) -> Self {
        ChatError::Validation(err.to_string())
    }
}
