//! Convenience re-exports for common use.

pub use crate::agent::{ChatBot, ChatSession, Conversation, ToolCancelHandle, TurnState};
pub use crate::config::ToolchatConfig;
pub use crate::error::{Result, ToolchatError};
pub use crate::provider::{CompletionProvider, ProviderRequest, ToolDefinition};
pub use crate::tools::{FnTool, Tool, ToolArguments, ToolParameters, ToolRegistry};
pub use crate::types::{
    AssistantResponse, FinishReason, GenerationSettings, Message, Role, ToolCall, ToolResult,
    ToolRound, Usage,
};
