//! Domain factories for creating domain entities and value objects.

use super::{
    error::ValueObjectError,
    value_object::{MessageId, RoomId},
};

/// Factory for generating RoomId instances.
///
/// Encapsulates id generation, separating it from the validation logic
/// in RoomId.
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// Generate a new RoomId with a random UUID v4.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for
    /// consistency with the domain error handling pattern.
    pub fn generate() -> Result<RoomId, ValueObjectError> {
        let uuid = uuid::Uuid::new_v4();
        RoomId::from_uuid(uuid)
    }
}

/// Factory for generating MessageId instances.
pub struct MessageIdFactory;

impl MessageIdFactory {
    /// Generate a new MessageId with a random UUID v4.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for
    /// consistency with the domain error handling pattern.
    pub fn generate() -> Result<MessageId, ValueObjectError> {
        let uuid = uuid::Uuid::new_v4();
        MessageId::from_uuid(uuid)
    }
}
