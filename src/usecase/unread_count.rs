//! UseCase: 未読数取得
//!
//! 読了カーソル（last_read_at）より新しい、自分以外の送信者による
//! 削除されていないメッセージを数えます。カーソル未設定なら該当する
//! 全メッセージが未読です。

use std::sync::Arc;

use crate::{
    domain::{MembershipRepository, MessageRepository, RoomId, RoomRepository, UserId},
    infrastructure::dto::http::UnreadCountDto,
    usecase::membership::require_active_member,
};

use super::error::ChatError;

/// 未読数取得のユースケース
pub struct UnreadCountUseCase {
    rooms: Arc<dyn RoomRepository>,
    memberships: Arc<dyn MembershipRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl UnreadCountUseCase {
    /// 新しい UnreadCountUseCase を作成
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        memberships: Arc<dyn MembershipRepository>,
        messages: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            rooms,
            memberships,
            messages,
        }
    }

    /// 未読数取得を実行
    pub async fn execute(
        &self,
        caller: &UserId,
        room_id: &RoomId,
    ) -> Result<UnreadCountDto, ChatError> {
        self.rooms
            .find_room(room_id)
            .await?
            .ok_or(ChatError::RoomNotFound)?;
        let membership =
            require_active_member(self.memberships.as_ref(), room_id, caller).await?;

        let unread = self
            .messages
            .count_unread(room_id, caller, membership.last_read_at)
            .await?;
        Ok(UnreadCountDto {
            room_id: room_id.as_str().to_string(),
            unread,
        })
    }
}
