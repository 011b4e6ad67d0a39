//! Results returned to the caller of a turn.

use serde::{Deserialize, Serialize};

use super::{FinishReason, ToolCall, ToolResult, Usage};

/// One assistant reply from the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AssistantResponse {
    pub content: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    #[serde(default)]
    pub usage: Usage,
}

impl AssistantResponse {
    /// A plain text reply with no tool calls.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            finish_reason: Some(FinishReason::Stop),
            ..Default::default()
        }
    }

    /// Whether the model asked for tools to run.
    pub fn requests_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Output of one tool round: the follow-up reply plus the raw tool results,
/// in request order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolRound {
    pub follow_up: AssistantResponse,
    pub tool_results: Vec<ToolResult>,
}
