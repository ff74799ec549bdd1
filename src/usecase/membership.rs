//! メンバーシップの共通ガードとルーム単位の直列化
//!
//! ## 何を保証するか
//! - `require_active_member`: 全メッセージ操作と WebSocket 購読の前提条件。
//!   アクティブなメンバーシップがなければ `ChatError::NotMember`。
//! - `RoomLocks`: ルーム ID ごとの非同期ミューテックス。join / leave の
//!   read-check-write 列を直列化し、競合する join が定員を超過したり
//!   重複したアクティブメンバーシップを作ることを防ぎます。

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{Membership, MembershipRepository, RoomId, UserId};

use super::error::ChatError;

/// Guard every message read/write runs first: the caller must hold an
/// active membership in the room.
pub async fn require_active_member(
    memberships: &dyn MembershipRepository,
    room_id: &RoomId,
    user_id: &UserId,
) -> Result<Membership, ChatError> {
    match memberships.find_membership(room_id, user_id).await? {
        Some(membership) if membership.is_active => Ok(membership),
        _ => Err(ChatError::NotMember),
    }
}

/// Per-room async mutex registry serializing membership mutation.
pub struct RoomLocks {
    locks: Mutex<HashMap<RoomId, Arc<Mutex<()>>>>,
}

impl RoomLocks {
    /// 新しい RoomLocks を作成
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Acquire the lock of one room. The guard is held across the whole
    /// check-then-write sequence of a join/leave.
    pub async fn acquire(&self, room_id: &RoomId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(room_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

impl Default for RoomLocks {
    fn default() -> Self {
        Self::new()
    }
}
