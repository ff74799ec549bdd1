//! Domain layer for the chat service.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{
    ChatMessage, MemberRole, Membership, MessageDraft, MessageType, Room, RoomKind, UserProfile,
    UserRole,
};
pub use error::{MessageError, RepositoryError, ValueObjectError};
pub use factory::{MessageIdFactory, RoomIdFactory};
pub use repository::{
    ID_BATCH_LIMIT, MembershipRepository, MessageRepository, RoomRepository, UserDirectory,
};
pub use value_object::{
    MessageContent, MessageId, RoomCapacity, RoomId, RoomName, Timestamp, UserId,
};
