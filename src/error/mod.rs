//! Error types for toolchat.

use thiserror::Error;

/// Primary error type for all toolchat operations.
#[derive(Error, Debug)]
pub enum ToolchatError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Provider error: {provider} — {message}")]
    Provider { provider: String, message: String },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool_name}: {message}")]
    ArgumentDecode { tool_name: String, message: String },

    #[error("Tool execution error: {tool_name} — {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Canceled")]
    Canceled,
}

/// Broad error category, used for logging and caller-side routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Provider,
    Tool,
    Configuration,
    Timeout,
    Usage,
}

impl ToolchatError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a provider error (malformed payload, missing fields).
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an argument decode error for a tool call.
    pub fn argument_decode(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ArgumentDecode {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Api { .. }
            | Self::Network(_)
            | Self::Authentication(_)
            | Self::Provider { .. }
            | Self::Serialization(_) => ErrorCategory::Provider,
            Self::UnknownTool(_) | Self::ArgumentDecode { .. } | Self::ToolExecution { .. } => {
                ErrorCategory::Tool
            }
            Self::Configuration(_) | Self::Io(_) => ErrorCategory::Configuration,
            Self::Timeout(_) | Self::Canceled => ErrorCategory::Timeout,
            Self::InvalidArgument(_) | Self::InvalidState(_) => ErrorCategory::Usage,
        }
    }

    /// Whether this error came from talking to the completion endpoint.
    pub fn is_provider_error(&self) -> bool {
        self.category() == ErrorCategory::Provider
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ToolchatError>;
