mod core;
pub mod models;

pub use self::core::{ChatSession, ChatSessionBuilder, SEARCH_DYNAMIC_THRESHOLD};
pub use models::{ChatMessage, Transcript};
