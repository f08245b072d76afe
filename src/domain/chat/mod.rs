pub mod conversation;
pub mod error;
pub mod service;

pub use conversation::{ConversationLog, Message, Role, FALLBACK_REPLY, SEED_MESSAGE};
pub use error::ChatServiceError;
pub use service::{ChatService, ChatServiceApi, ChatTurnResult};
