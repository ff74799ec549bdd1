//! HashMap をインメモリ DB として使用する Repository 実装

pub mod message;
pub mod room;
pub mod user;

pub use message::InMemoryMessageStore;
pub use room::InMemoryRoomStore;
pub use user::InMemoryUserDirectory;
