//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加処理（定員チェック、重複チェック、退室済みレコードの再活性化）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：アクティブメンバー数が定員を超えない
//! - (room, user) ごとに 1 レコードという不変条件を保証
//! - 並行参加が定員チェックをすり抜けないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加、退室後の再参加
//! - 異常系：ルーム不在、定員超過、重複参加
//! - エッジケース：定員間際のルームへの同時参加

use std::sync::Arc;

use crate::{
    common::time::now_millis,
    domain::{MemberRole, Membership, MembershipRepository, RoomId, RoomRepository, Timestamp, UserId},
    usecase::membership::RoomLocks,
};

use super::error::ChatError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    memberships: Arc<dyn MembershipRepository>,
    /// ルーム単位の直列化（定員チェックと書き込みをアトミックにする）
    locks: Arc<RoomLocks>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        memberships: Arc<dyn MembershipRepository>,
        locks: Arc<RoomLocks>,
    ) -> Self {
        Self {
            rooms,
            memberships,
            locks,
        }
    }

    /// ルーム参加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 参加成功（新規参加または再参加）
    /// * `Err(ChatError::RoomNotFound)` - ルームが存在しない
    /// * `Err(ChatError::RoomFull)` - 定員超過
    /// * `Err(ChatError::AlreadyMember)` - 参加済み
    pub async fn execute(
        &self,
        caller: &UserId,
        room_id: &RoomId,
    ) -> Result<(), ChatError> {
        let room = self
            .rooms
            .find_room(room_id)
            .await?
            .ok_or(ChatError::RoomNotFound)?;

        // Capacity check and write must not interleave with other joins.
        let _guard = self.locks.acquire(room_id).await;

        let existing = self.memberships.find_membership(room_id, caller).await?;
        if let Some(membership) = &existing
            && membership.is_active
        {
            return Err(ChatError::AlreadyMember);
        }

        let active = self.memberships.count_active(room_id).await?;
        if room.is_full(active) {
            return Err(ChatError::RoomFull);
        }

        let now = Timestamp::new(now_millis());
        match existing {
            // Soft-left record: reactivate instead of inserting a duplicate.
            Some(_) => self.memberships.reactivate(room_id, caller, now).await?,
            None => {
                self.memberships
                    .insert_membership(Membership::new(
                        room_id.clone(),
                        caller.clone(),
                        MemberRole::Member,
                        now,
                    ))
                    .await?
            }
        }
        Ok(())
    }
}
