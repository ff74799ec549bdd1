//! Repository と Directory の trait 定義
//!
//! ドキュメントストアと ID プロバイダをポートとして抽象化します。
//! UseCase 層はこの trait に依存し、具体的な実装（infrastructure 層）には
//! 直接依存しません（依存性の逆転）。

use async_trait::async_trait;

use super::{
    entity::{ChatMessage, Membership, Room, UserProfile},
    error::RepositoryError,
    value_object::{MessageId, RoomId, Timestamp, UserId},
};

/// Maximum number of ids a single `in`-style lookup may carry.
/// Larger id lists must be chunked by the caller.
pub const ID_BATCH_LIMIT: usize = 10;

/// Store for room documents.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Persist a new room.
    async fn insert_room(&self, room: Room) -> Result<(), RepositoryError>;

    /// Look up a room by id.
    async fn find_room(&self, room_id: &RoomId) -> Result<Option<Room>, RepositoryError>;

    /// Bump a room's updated_at. Called after every successful message send.
    async fn touch_room(&self, room_id: &RoomId, now: Timestamp) -> Result<(), RepositoryError>;
}

/// Store for membership records (one per room × user).
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Persist a new membership record.
    async fn insert_membership(&self, membership: Membership) -> Result<(), RepositoryError>;

    /// Look up the membership record for a (room, user) pair, active or not.
    async fn find_membership(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Option<Membership>, RepositoryError>;

    /// All active memberships of a room, in join order.
    async fn active_members(&self, room_id: &RoomId) -> Result<Vec<Membership>, RepositoryError>;

    /// All active memberships of a user across rooms.
    async fn active_rooms_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Membership>, RepositoryError>;

    /// Number of active members in a room.
    async fn count_active(&self, room_id: &RoomId) -> Result<usize, RepositoryError>;

    /// Reactivate a previously left membership, refreshing its join
    /// timestamp. The read cursor is left untouched.
    async fn reactivate(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        rejoined_at: Timestamp,
    ) -> Result<(), RepositoryError>;

    /// Soft-leave: flip is_active to false, keeping the record.
    async fn deactivate(&self, room_id: &RoomId, user_id: &UserId) -> Result<(), RepositoryError>;

    /// Advance the user's read cursor for a room.
    async fn set_last_read(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        read_at: Timestamp,
    ) -> Result<(), RepositoryError>;
}

/// Append-only store for message documents, scoped per room.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Append a message.
    async fn insert_message(&self, message: ChatMessage) -> Result<(), RepositoryError>;

    /// Look up a message by id within a room.
    async fn find_message(
        &self,
        room_id: &RoomId,
        message_id: &MessageId,
    ) -> Result<Option<ChatMessage>, RepositoryError>;

    /// One page of non-deleted messages, newest first, together with the
    /// total non-deleted count. `page` is 1-based.
    async fn page_desc(
        &self,
        room_id: &RoomId,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<ChatMessage>, usize), RepositoryError>;

    /// Total non-deleted message count of a room.
    async fn count_messages(&self, room_id: &RoomId) -> Result<usize, RepositoryError>;

    /// Non-deleted messages from other senders newer than the read cursor.
    /// A `None` cursor counts every such message.
    async fn count_unread(
        &self,
        room_id: &RoomId,
        reader: &UserId,
        read_up_to: Option<Timestamp>,
    ) -> Result<usize, RepositoryError>;
}

/// Identity collaborator resolving user ids to profiles.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve a single user id.
    async fn find_user(&self, user_id: &UserId) -> Result<Option<UserProfile>, RepositoryError>;

    /// Resolve a batch of user ids. Unknown ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::BatchTooLarge` when more than
    /// [`ID_BATCH_LIMIT`] ids are passed in one call.
    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<UserProfile>, RepositoryError>;
}
