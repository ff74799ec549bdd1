//! リアルタイム配信のポート定義
//!
//! メッセージ送信ユースケースはこの trait にのみ依存します。永続化が
//! 成功した後に呼ばれる fire-and-forget の通知であり、配信の失敗は
//! 送信者にエラーとして返されません。

use async_trait::async_trait;

use crate::domain::RoomId;

/// Fan-out port: deliver a serialized event to every connection currently
/// subscribed to a room.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageFanout: Send + Sync {
    /// Best-effort, at-most-once delivery per connected client.
    async fn broadcast(&self, room_id: RoomId, payload: String);
}
