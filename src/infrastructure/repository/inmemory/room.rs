//! InMemory Room Store 実装
//!
//! ドメイン層が定義する RoomRepository / MembershipRepository trait の
//! 具体的な実装。HashMap をインメモリ DB として使用します。
//! ルームドキュメントとメンバーシップレコードは同じストアが所有します。
//!
//! ## 技術的負債
//!
//! 現在、ドメインモデル（`Room` / `Membership`）を直接ストレージとして
//! 使用しています。これは InMemory 実装では許容される妥協ですが、将来
//! ドキュメント DB を実装する際は DTO への変換層が必要になります。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Membership, MembershipRepository, RepositoryError, Room, RoomId, RoomRepository, Timestamp,
    UserId,
};

/// インメモリ Room Store 実装
///
/// ルームとメンバーシップの両コレクションを Mutex 付き HashMap で保持します。
pub struct InMemoryRoomStore {
    /// Room ドキュメント
    rooms: Mutex<HashMap<RoomId, Room>>,
    /// ルームごとのメンバーシップレコード（参加順）
    memberships: Mutex<HashMap<RoomId, Vec<Membership>>>,
}

impl InMemoryRoomStore {
    /// 新しい InMemoryRoomStore を作成
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            memberships: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRoomStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomStore {
    async fn insert_room(&self, room: Room) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        rooms.insert(room.id.clone(), room);
        Ok(())
    }

    async fn find_room(&self, room_id: &RoomId) -> Result<Option<Room>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms.get(room_id).cloned())
    }

    async fn touch_room(&self, room_id: &RoomId, now: Timestamp) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))?;
        room.touch(now);
        Ok(())
    }
}

#[async_trait]
impl MembershipRepository for InMemoryRoomStore {
    async fn insert_membership(&self, membership: Membership) -> Result<(), RepositoryError> {
        let mut memberships = self.memberships.lock().await;
        memberships
            .entry(membership.room_id.clone())
            .or_default()
            .push(membership);
        Ok(())
    }

    async fn find_membership(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Option<Membership>, RepositoryError> {
        let memberships = self.memberships.lock().await;
        Ok(memberships
            .get(room_id)
            .and_then(|records| records.iter().find(|m| &m.user_id == user_id))
            .cloned())
    }

    async fn active_members(&self, room_id: &RoomId) -> Result<Vec<Membership>, RepositoryError> {
        let memberships = self.memberships.lock().await;
        Ok(memberships
            .get(room_id)
            .map(|records| records.iter().filter(|m| m.is_active).cloned().collect())
            .unwrap_or_default())
    }

    async fn active_rooms_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Membership>, RepositoryError> {
        let memberships = self.memberships.lock().await;
        Ok(memberships
            .values()
            .flat_map(|records| records.iter())
            .filter(|m| m.is_active && &m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn count_active(&self, room_id: &RoomId) -> Result<usize, RepositoryError> {
        let memberships = self.memberships.lock().await;
        Ok(memberships
            .get(room_id)
            .map(|records| records.iter().filter(|m| m.is_active).count())
            .unwrap_or(0))
    }

    async fn reactivate(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        rejoined_at: Timestamp,
    ) -> Result<(), RepositoryError> {
        let mut memberships = self.memberships.lock().await;
        let record = memberships
            .get_mut(room_id)
            .and_then(|records| records.iter_mut().find(|m| &m.user_id == user_id))
            .ok_or_else(|| RepositoryError::MembershipNotFound {
                room_id: room_id.as_str().to_string(),
                user_id: user_id.as_str().to_string(),
            })?;
        record.reactivate(rejoined_at);
        Ok(())
    }

    async fn deactivate(&self, room_id: &RoomId, user_id: &UserId) -> Result<(), RepositoryError> {
        let mut memberships = self.memberships.lock().await;
        let record = memberships
            .get_mut(room_id)
            .and_then(|records| records.iter_mut().find(|m| &m.user_id == user_id))
            .ok_or_else(|| RepositoryError::MembershipNotFound {
                room_id: room_id.as_str().to_string(),
                user_id: user_id.as_str().to_string(),
            })?;
        record.deactivate();
        Ok(())
    }

    async fn set_last_read(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        read_at: Timestamp,
    ) -> Result<(), RepositoryError> {
        let mut memberships = self.memberships.lock().await;
        let record = memberships
            .get_mut(room_id)
            .and_then(|records| records.iter_mut().find(|m| &m.user_id == user_id))
            .ok_or_else(|| RepositoryError::MembershipNotFound {
                room_id: room_id.as_str().to_string(),
                user_id: user_id.as_str().to_string(),
            })?;
        record.mark_read(read_at);
        Ok(())
    }
}
