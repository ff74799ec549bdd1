//! UseCase: 参加中ルーム一覧取得
//!
//! アクティブなメンバーシップを持つルームを、アクティブメンバーの
//! プロフィール・作成者プロフィール・メッセージ数で補完して返します。
//! 副作用のない読み取り専用の操作です。

use std::sync::Arc;

use crate::{
    domain::{MembershipRepository, MessageRepository, RoomRepository, UserDirectory, UserId},
    infrastructure::dto::http::RoomDto,
    usecase::profiles::load_profiles,
};

use super::error::ChatError;

/// ルーム一覧取得のユースケース
pub struct ListRoomsUseCase {
    rooms: Arc<dyn RoomRepository>,
    memberships: Arc<dyn MembershipRepository>,
    messages: Arc<dyn MessageRepository>,
    users: Arc<dyn UserDirectory>,
}

impl ListRoomsUseCase {
    /// 新しい ListRoomsUseCase を作成
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

    /// ルーム一覧取得を実行（更新が新しい順）
    pub async fn execute(&self, caller: &UserId) -> Result<Vec<RoomDto>, ChatError> {
        let own_memberships = self.memberships.active_rooms_for_user(caller).await?;

        let mut rooms = Vec::with_capacity(own_memberships.len());
        for membership in &own_memberships {
            let Some(room) = self.rooms.find_room(&membership.room_id).await? else {
                // Membership pointing at a missing room document; skip it.
                tracing::warn!(
                    "membership of '{}' references missing room '{}'",
                    caller,
                    membership.room_id
                );
                continue;
            };
            rooms.push(room);
        }
        rooms.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let mut result = Vec::with_capacity(rooms.len());
        for room in rooms {
            let members = self.memberships.active_members(&room.id).await?;
            let message_count = self.messages.count_messages(&room.id).await?;

            let mut profile_ids: Vec<UserId> =
                members.iter().map(|m| m.user_id.clone()).collect();
            profile_ids.push(room.created_by.clone());
            let profiles = load_profiles(self.users.as_ref(), &profile_ids).await?;

            let member_profiles: Vec<_> = members
                .iter()
                .filter_map(|m| profiles.get(&m.user_id).cloned())
                .collect();
            result.push(RoomDto::from_room(
                &room,
                profiles.get(&room.created_by),
                &member_profiles,
                message_count,
            ));
        }
        Ok(result)
    }
}
