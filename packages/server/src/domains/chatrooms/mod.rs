// Chatrooms domain - room provisioning only. Message transport lives in the
// chat service; the matching core just needs "same pair, same room".

pub mod models;
pub mod service;

pub use models::chatroom::ChatRoom;
pub use service::PgChatService;
