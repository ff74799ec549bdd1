//! InMemory Message Store 実装
//!
//! ルームごとの追記専用メッセージログ。HashMap + Vec をインメモリ DB と
//! して使用し、挿入順を保持します（created_at が同値の場合のタイブレーク）。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, MessageId, MessageRepository, RepositoryError, RoomId, Timestamp, UserId,
};

/// インメモリ Message Store 実装
pub struct InMemoryMessageStore {
    /// ルームごとのメッセージログ（挿入順）
    messages: Mutex<HashMap<RoomId, Vec<ChatMessage>>>,
}

impl InMemoryMessageStore {
    /// 新しい InMemoryMessageStore を作成
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-deleted messages ordered by created_at ascending; the sort is
/// stable, so insertion order breaks ties.
fn live_sorted(records: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut live: Vec<ChatMessage> = records.iter().filter(|m| !m.is_deleted).cloned().collect();
    live.sort_by_key(|m| m.created_at);
    live
}

#[async_trait]
impl MessageRepository for InMemoryMessageStore {
    async fn insert_message(&self, message: ChatMessage) -> Result<(), RepositoryError> {
        let mut messages = self.messages.lock().await;
        messages
            .entry(message.room_id.clone())
            .or_default()
            .push(message);
        Ok(())
    }

    async fn find_message(
        &self,
        room_id: &RoomId,
        message_id: &MessageId,
    ) -> Result<Option<ChatMessage>, RepositoryError> {
        let messages = self.messages.lock().await;
        Ok(messages
            .get(room_id)
            .and_then(|records| records.iter().find(|m| &m.id == message_id))
            .cloned())
    }

    async fn page_desc(
        &self,
        room_id: &RoomId,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<ChatMessage>, usize), RepositoryError> {
        let messages = self.messages.lock().await;
        let live = messages
            .get(room_id)
            .map(|records| live_sorted(records))
            .unwrap_or_default();
        let total = live.len();
        let items = live
            .into_iter()
            .rev()
            .skip(page.saturating_sub(1) * limit)
            .take(limit)
            .collect();
        Ok((items, total))
    }

    async fn count_messages(&self, room_id: &RoomId) -> Result<usize, RepositoryError> {
        let messages = self.messages.lock().await;
        Ok(messages
            .get(room_id)
            .map(|records| records.iter().filter(|m| !m.is_deleted).count())
            .unwrap_or(0))
    }

    async fn count_unread(
        &self,
        room_id: &RoomId,
        reader: &UserId,
        read_up_to: Option<Timestamp>,
    ) -> Result<usize, RepositoryError> {
        let messages = self.messages.lock().await;
        Ok(messages
            .get(room_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|m| !m.is_deleted && &m.sender_id != reader)
                    .filter(|m| match read_up_to {
                        Some(cursor) => m.created_at > cursor,
                        None => true,
                    })
                    .count()
            })
            .unwrap_or(0))
    }
}
