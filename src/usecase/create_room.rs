//! UseCase: ルーム作成処理
//!
//! ルームドキュメントの永続化と同時に、作成者を role=admin のアクティブ
//! メンバーとして登録します。作成直後から「少なくとも 1 人のメンバーが
//! 存在する」不変条件が成立します。

use std::sync::Arc;

use crate::{
    common::time::now_millis,
    domain::{
        MemberRole, Membership, MembershipRepository, Room, RoomCapacity, RoomIdFactory, RoomName,
        RoomRepository, Timestamp, UserProfile,
    },
    infrastructure::dto::http::{CreateRoomRequest, RoomDto},
};

use super::error::ChatError;

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    memberships: Arc<dyn MembershipRepository>,
}

impl CreateRoomUseCase {
    /// 新しい CreateRoomUseCase を作成
    pub fn new(rooms: Arc<dyn RoomRepository>, memberships: Arc<dyn MembershipRepository>) -> Self {
        Self { rooms, memberships }
    }

    /// ルーム作成を実行
    ///
    /// # Returns
    ///
    /// * `Ok(RoomDto)` - 作成されたルーム（作成者のみがメンバー）
    /// * `Err(ChatError::Validation)` - パラメータ不正
    pub async fn execute(
        &self,
        caller: &UserProfile,
        request: CreateRoomRequest,
    ) -> Result<RoomDto, ChatError> {
        let name = RoomName::new(request.name)?;
        let max_members = RoomCapacity::new(request.max_members)?;
        let room_id = RoomIdFactory::generate()?;
        let now = Timestamp::new(now_millis());

        let room = Room::new(
            room_id.clone(),
            name,
            request.description,
            request.kind,
            request.is_private,
            max_members,
            caller.id.clone(),
            now,
        );
        self.rooms.insert_room(room.clone()).await?;

        let membership = Membership::new(room_id, caller.id.clone(), MemberRole::Admin, now);
        self.memberships.insert_membership(membership).await?;

        Ok(RoomDto::from_room(
            &room,
            Some(caller),
            std::slice::from_ref(caller),
            0,
        ))
    }
}
