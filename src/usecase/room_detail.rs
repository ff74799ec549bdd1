//! UseCase: ルーム詳細取得
//!
//! 単一ルーム版の一覧取得。呼び出し元がアクティブメンバーであることが
//! 前提条件です。

use std::sync::Arc;

use crate::{
    domain::{MembershipRepository, MessageRepository, RoomId, RoomRepository, UserDirectory, UserId},
    infrastructure::dto::http::RoomDto,
    usecase::{membership::require_active_member, profiles::load_profiles},
};

use super::error::ChatError;

/// ルーム詳細取得のユースケース
pub struct RoomDetailUseCase {
    rooms: Arc<dyn RoomRepository>,
    memberships: Arc<dyn MembershipRepository>,
    messages: Arc<dyn MessageRepository>,
    users: Arc<dyn UserDirectory>,
}

impl RoomDetailUseCase {
    /// 新しい RoomDetailUseCase を作成
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        memberships: Arc<dyn MembershipRepository>,
        messages: Arc<dyn MessageRepository>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            rooms,
            memberships,
            messages,
            users,
        }
    }

    /// ルーム詳細取得を実行
    pub async fn execute(
        &self,
        caller: &UserId,
        room_id: &RoomId,
    ) -> Result<RoomDto, ChatError> {
        let room = self
            .rooms
            .find_room(room_id)
            .await?
            .ok_or(ChatError::RoomNotFound)?;
        require_active_member(self.memberships.as_ref(), room_id, caller).await?;

        let members = self.memberships.active_members(room_id).await?;
        let message_count = self.messages.count_messages(room_id).await?;

        let mut profile_ids: Vec<UserId> = members.iter().map(|m| m.user_id.clone()).collect();
        profile_ids.push(room.created_by.clone());
        let profiles = load_profiles(self.users.as_ref(), &profile_ids).await?;

        let member_profiles: Vec<_> = members
            .iter()
            .filter_map(|m| profiles.get(&m.user_id).cloned())
            .collect();
        Ok(RoomDto::from_room(
            &room,
            profiles.get(&room.created_by),
            &member_profiles,
            message_count,
        ))
    }
}
