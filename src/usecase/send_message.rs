//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージ送信処理（メンバーシップ検査、ペイロード検証、永続化、
//!   ルームの updated_at 更新、Fan-out への配信依頼）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：永続化が成功したときだけ配信される
//! - 返信先が同一ルーム内のメッセージであることを保証
//! - 配信はポート（MessageFanout）経由であり、モックで独立に検証できる
//!
//! ### どのような状況を想定しているか
//! - 正常系：テキスト送信、返信付き送信
//! - 異常系：空のテキスト、非メンバー、他ルームのメッセージへの返信
//! - エッジケース：購読者ゼロ（配信対象なしでも送信は成功する）

use std::sync::Arc;

use crate::{
    common::time::now_millis,
    domain::{
        ChatMessage, MembershipRepository, MessageContent, MessageDraft, MessageId,
        MessageIdFactory, MessageRepository, RoomId, RoomRepository, Timestamp, UserDirectory,
        UserProfile,
    },
    infrastructure::dto::{
        http::{MessageDto, ReplyDto, SendMessageRequest},
        websocket::{EventType, NewMessageEvent},
    },
    usecase::membership::require_active_member,
};

use super::{error::ChatError, fanout::MessageFanout};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    rooms: Arc<dyn RoomRepository>,
    memberships: Arc<dyn MembershipRepository>,
    messages: Arc<dyn MessageRepository>,
    users: Arc<dyn UserDirectory>,
    /// Fan-out ポート（配信失敗は送信者へ返さない）
    fanout: Arc<dyn MessageFanout>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        memberships: Arc<dyn MembershipRepository>,
        messages: Arc<dyn MessageRepository>,
        users: Arc<dyn UserDirectory>,
        fanout: Arc<dyn MessageFanout>,
    ) -> Self {
        Self {
            rooms,
            memberships,
            messages,
            users,
            fanout,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(MessageDto)` - 送信者プロフィール付きの保存済みメッセージ
    /// * `Err(ChatError)` - 検証・認可・保存の失敗
    pub async fn execute(
        &self,
        caller: &UserProfile,
        room_id: &RoomId,
        request: SendMessageRequest,
    ) -> Result<MessageDto, ChatError> {
        self.rooms
            .find_room(room_id)
            .await?
            .ok_or(ChatError::RoomNotFound)?;
        require_active_member(self.memberships.as_ref(), room_id, &caller.id).await?;

        let content = match request.content {
            Some(raw) => Some(MessageContent::new(raw)?),
            None => None,
        };
        let reply_to_id = match request.reply_to_id {
            Some(raw) => Some(self.resolve_reply_target(room_id, raw).await?),
            None => None,
        };

        let now = Timestamp::new(now_millis());
        let message = ChatMessage::new(
            MessageIdFactory::generate()?,
            room_id.clone(),
            caller.id.clone(),
            MessageDraft {
                content,
                message_type: request.message_type,
                file_url: request.file_url,
                file_name: request.file_name,
                file_size: request.file_size,
                reply_to_id,
            },
            now,
        )?;

        self.messages.insert_message(message.clone()).await?;
        self.rooms.touch_room(room_id, now).await?;

        let reply_to = match &message.reply_to_id {
            Some(reply_id) => self.build_reply_dto(room_id, reply_id).await?,
            None => None,
        };
        let dto = MessageDto::from_message(&message, Some(caller), reply_to);

        // Durability already succeeded; delivery is fire-and-forget.
        let event = NewMessageEvent {
            r#type: EventType::NewMessage,
            room_id: room_id.as_str().to_string(),
            message: dto.clone(),
        };
        match serde_json::to_string(&event) {
            Ok(payload) => self.fanout.broadcast(room_id.clone(), payload).await,
            Err(e) => tracing::error!("failed to serialize new-message event: {e}"),
        }

        Ok(dto)
    }

    /// 返信先がこのルームの削除されていないメッセージであることを検証
    async fn resolve_reply_target(
        &self,
        room_id: &RoomId,
        raw_id: String,
    ) -> Result<MessageId, ChatError> {
        let reply_id = MessageId::new(raw_id)?;
        match self.messages.find_message(room_id, &reply_id).await? {
            Some(target) if !target.is_deleted => Ok(reply_id),
            _ => Err(ChatError::Validation(
                "reply target not found in this room".to_string(),
            )),
        }
    }

    async fn build_reply_dto(
        &self,
        room_id: &RoomId,
        reply_id: &MessageId,
    ) -> Result<Option<ReplyDto>, ChatError> {
        let Some(replied) = self.messages.find_message(room_id, reply_id).await? else {
            return Ok(None);
        };
        let sender = self.users.find_user(&replied.sender_id).await?;
        Ok(Some(ReplyDto::from_message(&replied, sender.as_ref())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            MemberRole, Membership, MessageType, Room, RoomCapacity, RoomIdFactory, RoomKind,
            RoomName, UserId, UserRole,
        },
        infrastructure::repository::{
            InMemoryMessageStore, InMemoryRoomStore, InMemoryUserDirectory,
        },
        usecase::fanout::MockMessageFanout,
    };

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn profile(id: &str, name: &str) -> UserProfile {
        UserProfile::new(user(id), name.to_string(), UserRole::Student)
    }

    struct Fixture {
        store: Arc<InMemoryRoomStore>,
        messages: Arc<InMemoryMessageStore>,
        room_id: RoomId,
    }

    async fn setup() -> Fixture {
        let store = Arc::new(InMemoryRoomStore::new());
        let messages = Arc::new(InMemoryMessageStore::new());
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
        store
            .insert_membership(Membership::new(
                room_id.clone(),
                user("alice"),
                MemberRole::Admin,
                Timestamp::new(1000),
            ))
            .await
            .unwrap();
        Fixture {
            store,
            messages,
            room_id,
        }
    }

    fn usecase_with_fanout(fixture: &Fixture, fanout: Arc<dyn MessageFanout>) -> SendMessageUseCase {
        SendMessageUseCase::new(
            fixture.store.clone(),
            fixture.store.clone(),
            fixture.messages.clone(),
            Arc::new(InMemoryUserDirectory::new(vec![profile("alice", "Alice")])),
            fanout,
        )
    }

    fn text_request(content: &str) -> SendMessageRequest {
        SendMessageRequest {
            content: Some(content.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_send_message_stores_touches_and_broadcasts() {
        // テスト項目: 送信でメッセージが保存され、ルームが touch され、配信が 1 回行われる
        // given (前提条件):
        let fixture = setup().await;
        let mut fanout = MockMessageFanout::new();
        let expected_room = fixture.room_id.clone();
        fanout
            .expect_broadcast()
            .withf(move |room_id, payload| {
                room_id == &expected_room && payload.contains("\"new-message\"")
            })
            .times(1)
            .return_const(());
        let usecase = usecase_with_fanout(&fixture, Arc::new(fanout));

        // when (操作):
        let caller = profile("alice", "Alice");
        let result = usecase
            .execute(&caller, &fixture.room_id, text_request("hi"))
            .await;

        // then (期待する結果):
        let dto = result.unwrap();
        assert_eq!(dto.content.as_deref(), Some("hi"));
        assert_eq!(dto.sender.as_ref().unwrap().id, "alice");
        assert_eq!(dto.message_type, MessageType::Text);

        // 保存されている
        assert_eq!(
            fixture
                .messages
                .count_messages(&fixture.room_id)
                .await
                .unwrap(),
            1
        );
        // ルームの updated_at が進んでいる
        let room = fixture
            .store
            .find_room(&fixture.room_id)
            .await
            .unwrap()
            .unwrap();
        assert!(room.updated_at > room.created_at);
    }

    #[tokio::test]
    async fn test_send_empty_text_fails_without_broadcast() {
        // テスト項目: 空のテキストは Validation エラーになり、配信も保存も行われない
        // given (前提条件):
        let fixture = setup().await;
        let mut fanout = MockMessageFanout::new();
        fanout.expect_broadcast().times(0);
        let usecase = usecase_with_fanout(&fixture, Arc::new(fanout));

        // when (操作):
        let caller = profile("alice", "Alice");
        let result = usecase
            .execute(&caller, &fixture.room_id, text_request(""))
            .await;

        // then (期待する結果):
        assert!(matches!(result.unwrap_err(), ChatError::Validation(_)));
        assert_eq!(
            fixture
                .messages
                .count_messages(&fixture.room_id)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_send_text_without_content_fails() {
        // テスト項目: content 欠落のテキストメッセージは Validation エラーになる
        // given (前提条件):
        let fixture = setup().await;
        let mut fanout = MockMessageFanout::new();
        fanout.expect_broadcast().times(0);
        let usecase = usecase_with_fanout(&fixture, Arc::new(fanout));

        // when (操作):
        let caller = profile("alice", "Alice");
        let result = usecase
            .execute(&caller, &fixture.room_id, SendMessageRequest::default())
            .await;

        // then (期待する結果):
        assert!(matches!(result.unwrap_err(), ChatError::Validation(_)));
    }

    #[tokio::test]
    async fn test_non_member_cannot_send() {
        // テスト項目: 非メンバーの送信は NotMember になる
        // given (前提条件):
        let fixture = setup().await;
        let mut fanout = MockMessageFanout::new();
        fanout.expect_broadcast().times(0);
        let usecase = usecase_with_fanout(&fixture, Arc::new(fanout));

        // when (操作):
        let caller = profile("mallory", "Mallory");
        let result = usecase
            .execute(&caller, &fixture.room_id, text_request("hi"))
            .await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ChatError::NotMember);
    }

    #[tokio::test]
    async fn test_send_to_missing_room_fails() {
        // テスト項目: 存在しないルームへの送信は RoomNotFound になる
        // given (前提条件):
        let fixture = setup().await;
        let mut fanout = MockMessageFanout::new();
        fanout.expect_broadcast().times(0);
        let usecase = usecase_with_fanout(&fixture, Arc::new(fanout));
        let other_room = RoomIdFactory::generate().unwrap();

        // when (操作):
        let caller = profile("alice", "Alice");
        let result = usecase.execute(&caller, &other_room, text_request("hi")).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ChatError::RoomNotFound);
    }

    #[tokio::test]
    async fn test_reply_to_message_in_same_room() {
        // テスト項目: 同一ルームのメッセージへの返信は返信先付きで返される
        // given (前提条件):
        let fixture = setup().await;
        let mut fanout = MockMessageFanout::new();
        fanout.expect_broadcast().times(2).return_const(());
        let usecase = usecase_with_fanout(&fixture, Arc::new(fanout));
        let caller = profile("alice", "Alice");
        let original = usecase
            .execute(&caller, &fixture.room_id, text_request("question"))
            .await
            .unwrap();

        // when (操作):
        let request = SendMessageRequest {
            content: Some("answer".to_string()),
            reply_to_id: Some(original.id.clone()),
            ..Default::default()
        };
        let reply = usecase
            .execute(&caller, &fixture.room_id, request)
            .await
            .unwrap();

        // then (期待する結果):
        let reply_to = reply.reply_to.unwrap();
        assert_eq!(reply_to.id, original.id);
        assert_eq!(reply_to.content.as_deref(), Some("question"));
    }

    #[tokio::test]
    async fn test_reply_to_foreign_message_fails() {
        // テスト項目: 他ルームのメッセージへの返信は Validation エラーになる
        // given (前提条件): 別ルームにだけ存在するメッセージ
        let fixture = setup().await;
        let foreign_room = RoomIdFactory::generate().unwrap();
        let foreign = ChatMessage::new(
            MessageIdFactory::generate().unwrap(),
            foreign_room.clone(),
            user("alice"),
            MessageDraft {
                content: Some(MessageContent::new("elsewhere".to_string()).unwrap()),
                ..Default::default()
            },
            Timestamp::new(2000),
        )
        .unwrap();
        fixture.messages.insert_message(foreign.clone()).await.unwrap();

        let mut fanout = MockMessageFanout::new();
        fanout.expect_broadcast().times(0);
        let usecase = usecase_with_fanout(&fixture, Arc::new(fanout));

        // when (操作):
        let caller = profile("alice", "Alice");
        let request = SendMessageRequest {
            content: Some("answer".to_string()),
            reply_to_id: Some(foreign.id.as_str().to_string()),
            ..Default::default()
        };
        let result = usecase.execute(&caller, &fixture.room_id, request).await;

        // then (期待する結果):
        assert!(matches!(result.unwrap_err(), ChatError::Validation(_)));
    }
}
