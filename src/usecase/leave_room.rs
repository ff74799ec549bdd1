//! UseCase: ルーム退室処理
//!
//! 退室はソフト削除です。メンバーシップレコードは is_active=false に
//! 遷移するだけで、履歴（参加日時・読了カーソル）は保持されます。

use std::sync::Arc;

use crate::{
    domain::{MembershipRepository, RoomId, UserId},
    usecase::membership::RoomLocks,
};

use super::error::ChatError;

/// ルーム退室のユースケース
pub struct LeaveRoomUseCase {
    memberships: Arc<dyn MembershipRepository>,
    locks: Arc<RoomLocks>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(memberships: Arc<dyn MembershipRepository>, locks: Arc<RoomLocks>) -> Self {
        Self { memberships, locks }
    }

    /// ルーム退室を実行
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 退室成功
    /// * `Err(ChatError::NotMember)` - アクティブなメンバーシップがない
    pub async fn execute(&self, caller: &UserId, room_id: &RoomId) -> Result<(), ChatError> {
        let _guard = self.locks.acquire(room_id).await;

        match self.memberships.find_membership(room_id, caller).await? {
            Some(membership) if membership.is_active => {
                self.memberships.deactivate(room_id, caller).await?;
                Ok(())
            }
            _ => Err(ChatError::NotMember),
        }
    }
}
