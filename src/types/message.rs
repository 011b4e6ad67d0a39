//! Message types for model communication.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Function name, only set on tool messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    /// Create a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: text.into(),
            name: None,
        }
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
            name: None,
        }
    }

    /// Create an assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
            name: None,
        }
    }

    /// Create a tool message carrying a function's stringified output.
    pub fn tool(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            name: Some(name.into()),
        }
    }
}

/// Conversation role.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A tool call requested by the model.
///
/// `arguments` keeps the JSON-encoded wire form untouched; it is decoded
/// only when the call is dispatched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolCall {
    pub id: String,
    pub function_name: String,
    pub arguments: String,
}

impl ToolCall {
    pub fn new(
        id: impl Into<String>,
        function_name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            function_name: function_name.into(),
            arguments: arguments.into(),
        }
    }

    /// Build a call whose arguments are encoded from a JSON value.
    pub fn with_json_arguments(
        id: impl Into<String>,
        function_name: impl Into<String>,
        arguments: &serde_json::Value,
    ) -> Self {
        Self::new(id, function_name, arguments.to_string())
    }
}

/// The outcome of one dispatched tool call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    /// Successful result; the value is stringified.
    pub fn success(call: &ToolCall, value: &serde_json::Value) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            name: call.function_name.clone(),
            content: value_to_text(value),
            is_error: false,
        }
    }

    /// Failed result; the error text takes the content slot.
    pub fn failure(call: &ToolCall, error: impl std::fmt::Display) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            name: call.function_name.clone(),
            content: format!("Error: {error}"),
            is_error: true,
        }
    }

    /// The tool message appended to the conversation.
    pub fn to_message(&self) -> Message {
        Message::tool(self.name.clone(), self.content.clone())
    }
}

/// Render a tool return value as text.
///
/// Strings pass through unquoted; everything else uses its JSON form.
pub fn value_to_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
