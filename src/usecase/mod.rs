//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod create_room;
pub mod error;
pub mod fanout;
pub mod join_room;
pub mod leave_room;
pub mod list_messages;
pub mod list_rooms;
pub mod membership;
pub mod profiles;
pub mod room_detail;
pub mod send_message;
pub mod unread_count;

pub use create_room::CreateRoomUseCase;
pub use error::ChatError;
pub use fanout::MessageFanout;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use list_messages::ListMessagesUseCase;
pub use list_rooms::ListRoomsUseCase;
pub use membership::{RoomLocks, require_active_member};
pub use room_detail::RoomDetailUseCase;
pub use send_message::SendMessageUseCase;
pub use unread_count::UnreadCountUseCase;
