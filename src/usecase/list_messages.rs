//! UseCase: メッセージ一覧取得
//!
//! ストア内部では新しい順でページングし、表示用に古い順へ反転して
//! 返します。送信者プロフィールと返信先メッセージを補完し、副作用と
//! して呼び出し元の読了カーソルを現在時刻へ進めます（既読化）。

use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    common::time::now_millis,
    domain::{
        ChatMessage, MembershipRepository, MessageId, MessageRepository, RoomId, RoomRepository,
        Timestamp, UserDirectory, UserId,
    },
    infrastructure::dto::http::{MessageDto, MessageListDto, PaginationDto, ReplyDto},
    usecase::{membership::require_active_member, profiles::load_profiles},
};

use super::error::ChatError;

/// デフォルトのページ番号
const DEFAULT_PAGE: usize = 1;
/// デフォルトの 1 ページあたりの件数
const DEFAULT_LIMIT: usize = 50;
/// 1 ページあたりの最大件数
const MAX_LIMIT: usize = 100;

/// メッセージ一覧取得のユースケース
pub struct ListMessagesUseCase {
    rooms: Arc<dyn RoomRepository>,
    memberships: Arc<dyn MembershipRepository>,
    messages: Arc<dyn MessageRepository>,
    users: Arc<dyn UserDirectory>,
}

impl ListMessagesUseCase {
    /// 新しい ListMessagesUseCase を作成
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

    /// メッセージ一覧取得を実行
    ///
    /// # Arguments
    ///
    /// * `page` - 1 始まりのページ番号（省略時 1）
    /// * `limit` - 1 ページあたりの件数（省略時 50、最大 100）
    pub async fn execute(
        &self,
        caller: &UserId,
        room_id: &RoomId,
        page: Option<usize>,
        limit: Option<usize>,
    ) -> Result<MessageListDto, ChatError> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if page < 1 {
            return Err(ChatError::Validation("page must be at least 1".to_string()));
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ChatError::Validation(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }

        self.rooms
            .find_room(room_id)
            .await?
            .ok_or(ChatError::RoomNotFound)?;
        require_active_member(self.memberships.as_ref(), room_id, caller).await?;

        let (newest_first, total) = self.messages.page_desc(room_id, page, limit).await?;
        // Oldest first for display.
        let ascending: Vec<ChatMessage> = newest_first.into_iter().rev().collect();

        // Resolve replied-to messages before profile loading so their
        // senders are part of the same lookup.
        let mut replies: HashMap<MessageId, ChatMessage> = HashMap::new();
        for message in &ascending {
            if let Some(reply_id) = &message.reply_to_id
                && !replies.contains_key(reply_id)
                && let Some(replied) = self.messages.find_message(room_id, reply_id).await?
            {
                replies.insert(reply_id.clone(), replied);
            }
        }

        let mut profile_ids: Vec<UserId> =
            ascending.iter().map(|m| m.sender_id.clone()).collect();
        profile_ids.extend(replies.values().map(|m| m.sender_id.clone()));
        let profiles = load_profiles(self.users.as_ref(), &profile_ids).await?;

        let messages = ascending
            .iter()
            .map(|message| {
                let reply_to = message
                    .reply_to_id
                    .as_ref()
                    .and_then(|id| replies.get(id))
                    .map(|replied| {
                        ReplyDto::from_message(replied, profiles.get(&replied.sender_id))
                    });
                MessageDto::from_message(message, profiles.get(&message.sender_id), reply_to)
            })
            .collect();

        // Reading marks the room read.
        self.memberships
            .set_last_read(room_id, caller, Timestamp::new(now_millis()))
            .await?;

        Ok(MessageListDto {
            messages,
            pagination: PaginationDto {
                page,
                limit,
                total,
                pages: total.div_ceil(limit),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            MemberRole, Membership, MessageContent, MessageDraft, MessageIdFactory, Room,
            RoomCapacity, RoomIdFactory, RoomKind, RoomName, UserProfile, UserRole,
        },
        infrastructure::repository::{
            InMemoryMessageStore, InMemoryRoomStore, InMemoryUserDirectory,
        },
    };

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    struct Fixture {
        store: Arc<InMemoryRoomStore>,
        messages: Arc<InMemoryMessageStore>,
        usecase: ListMessagesUseCase,
        room_id: RoomId,
    }

    async fn setup() -> Fixture {
        let store = Arc::new(InMemoryRoomStore::new());
        let messages = Arc::new(InMemoryMessageStore::new());
        let users = Arc::new(InMemoryUserDirectory::new(vec![
            UserProfile::new(user("alice"), "Alice".to_string(), UserRole::Student),
            UserProfile::new(user("bob"), "Bob".to_string(), UserRole::Student),
        ]));
        let usecase = ListMessagesUseCase::new(
            store.clone(),
            store.clone(),
            messages.clone(),
            users,
        );

        let room = Room::new(
            RoomIdFactory::generate().unwrap(),
            RoomName::new("CS201".to_string()).unwrap(),
            None,
            RoomKind::Course,
            false,
            RoomCapacity::new(10).unwrap(),
            user("alice"),
            Timestamp::new(1000),
        );
        let room_id = room.id.clone();
        store.insert_room(room).await.unwrap();
        for id in ["alice", "bob"] {
            store
                .insert_membership(Membership::new(
                    room_id.clone(),
                    user(id),
                    MemberRole::Member,
                    Timestamp::new(1000),
                ))
                .await
                .unwrap();
        }
        Fixture {
            store,
            messages,
            usecase,
            room_id,
        }
    }

    async fn insert_text(
        fixture: &Fixture,
        sender: &str,
        content: &str,
        at: i64,
    ) -> crate::domain::ChatMessage {
        let message = crate::domain::ChatMessage::new(
            MessageIdFactory::generate().unwrap(),
            fixture.room_id.clone(),
            user(sender),
            MessageDraft {
                content: Some(MessageContent::new(content.to_string()).unwrap()),
                ..Default::default()
            },
            Timestamp::new(at),
        )
        .unwrap();
        fixture
            .messages
            .insert_message(message.clone())
            .await
            .unwrap();
        message
    }

    #[tokio::test]
    async fn test_messages_returned_oldest_first_with_pagination() {
        // テスト項目: 古い順で返され、ページ情報が ceil(total/limit) を含む
        // given (前提条件):
        let fixture = setup().await;
        for i in 0..5 {
            insert_text(&fixture, "alice", &format!("m{i}"), 1000 + i).await;
        }

        // when (操作):
        let result = fixture
            .usecase
            .execute(&user("bob"), &fixture.room_id, Some(1), Some(2))
            .await
            .unwrap();

        // then (期待する結果): 最新 2 件が古い順
        let contents: Vec<_> = result
            .messages
            .iter()
            .map(|m| m.content.clone().unwrap())
            .collect();
        assert_eq!(contents, vec!["m3", "m4"]);
        assert_eq!(result.pagination.total, 5);
        assert_eq!(result.pagination.pages, 3);
        assert_eq!(result.messages[0].sender.as_ref().unwrap().name, "Alice");
    }

    #[tokio::test]
    async fn test_listing_marks_room_read() {
        // テスト項目: 一覧取得後に読了カーソルが進み、未読が 0 になる
        // given (前提条件):
        let fixture = setup().await;
        insert_text(&fixture, "alice", "hello", 2000).await;
        let unread_before = fixture
            .messages
            .count_unread(&fixture.room_id, &user("bob"), None)
            .await
            .unwrap();
        assert_eq!(unread_before, 1);

        // when (操作):
        fixture
            .usecase
            .execute(&user("bob"), &fixture.room_id, None, None)
            .await
            .unwrap();

        // then (期待する結果):
        let membership = fixture
            .store
            .find_membership(&fixture.room_id, &user("bob"))
            .await
            .unwrap()
            .unwrap();
        let cursor = membership.last_read_at.expect("cursor must be set");
        let unread_after = fixture
            .messages
            .count_unread(&fixture.room_id, &user("bob"), Some(cursor))
            .await
            .unwrap();
        assert_eq!(unread_after, 0);
    }

    #[tokio::test]
    async fn test_reply_context_is_resolved() {
        // テスト項目: 返信メッセージには返信先と送信者が補完される
        // given (前提条件):
        let fixture = setup().await;
        let original = insert_text(&fixture, "alice", "question", 2000).await;
        let reply = crate::domain::ChatMessage::new(
            MessageIdFactory::generate().unwrap(),
            fixture.room_id.clone(),
            user("bob"),
            MessageDraft {
                content: Some(MessageContent::new("answer".to_string()).unwrap()),
                reply_to_id: Some(original.id.clone()),
                ..Default::default()
            },
            Timestamp::new(3000),
        )
        .unwrap();
        fixture.messages.insert_message(reply).await.unwrap();

        // when (操作):
        let result = fixture
            .usecase
            .execute(&user("alice"), &fixture.room_id, None, None)
            .await
            .unwrap();

        // then (期待する結果):
        let replied = result.messages[1].reply_to.as_ref().unwrap();
        assert_eq!(replied.id, original.id.as_str());
        assert_eq!(replied.sender.as_ref().unwrap().name, "Alice");
        assert_eq!(replied.content.as_deref(), Some("question"));
    }

    #[tokio::test]
    async fn test_non_member_cannot_list() {
        // テスト項目: 非メンバーの一覧取得は NotMember になる
        // given (前提条件):
        let fixture = setup().await;

        // when (操作):
        let result = fixture
            .usecase
            .execute(&user("carol"), &fixture.room_id, None, None)
            .await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ChatError::NotMember);
    }

    #[tokio::test]
    async fn test_invalid_pagination_params_fail() {
        // テスト項目: page=0 / limit=0 / limit>100 は Validation エラーになる
        // given (前提条件):
        let fixture = setup().await;

        // then (期待する結果):
        for (page, limit) in [(Some(0), None), (None, Some(0)), (None, Some(101))] {
            let result = fixture
                .usecase
                .execute(&user("alice"), &fixture.room_id, page, limit)
                .await;
            assert!(matches!(result.unwrap_err(), ChatError::Validation(_)));
        }
    }
}
