//! Shared chat session handle.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::error::ToolchatError;
use crate::types::{AssistantResponse, Message, ToolCall, ToolRound};

use super::chat_bot::{ChatBot, TurnState};
use super::invoker::ToolCancelHandle;

/// Cloneable handle to one [`ChatBot`] shared across tasks.
///
/// Each call holds the lock for the whole turn, so at most one turn is
/// active on the conversation at a time; other callers wait their turn.
#[derive(Debug, Clone)]
pub struct ChatSession {
    bot: Arc<Mutex<ChatBot>>,
    tool_cancel: ToolCancelHandle,
    shutdown: CancellationToken,
}

impl ChatSession {
    pub fn new(bot: ChatBot) -> Self {
        Self {
            tool_cancel: bot.tool_cancel_handle(),
            shutdown: bot.shutdown_token().clone(),
            bot: Arc::new(Mutex::new(bot)),
        }
    }

    pub async fn handle_turn(
        &self,
        user_text: impl Into<String>,
    ) -> Result<AssistantResponse, ToolchatError> {
        self.bot.lock().await.handle_turn(user_text).await
    }

    pub async fn handle_tool_calls(
        &self,
        tool_calls: &[ToolCall],
    ) -> Result<ToolRound, ToolchatError> {
        self.bot.lock().await.handle_tool_calls(tool_calls).await
    }

    /// Snapshot of the history.
    pub async fn history(&self) -> Vec<Message> {
        self.bot.lock().await.history().to_vec()
    }

    pub async fn state(&self) -> TurnState {
        self.bot.lock().await.state()
    }

    /// Cancel the tool batch of the running turn without waiting for it to
    /// release the conversation. Later turns dispatch tools normally.
    /// Returns `false` if no batch was running.
    pub fn cancel_tools(&self) -> bool {
        self.tool_cancel.cancel()
    }

    /// Stop every running and future tool invocation on this conversation.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
