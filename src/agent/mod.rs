//! Agent system: conversation state, turn execution and tool dispatch.

pub mod chat_bot;
pub mod conversation;
pub mod invoker;
pub mod session;

pub use chat_bot::{ChatBot, TurnState};
pub use conversation::Conversation;
pub use invoker::{PreparedCall, ToolCancelHandle, ToolInvoker};
pub use session::ChatSession;
