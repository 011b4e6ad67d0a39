//! Completion provider trait and implementations.

pub mod http;

#[cfg(feature = "openai")]
pub mod openai;

use async_trait::async_trait;

use crate::error::ToolchatError;
use crate::types::{AssistantResponse, GenerationSettings, Message};

/// A request sent to a completion provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub messages: Vec<Message>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Core trait implemented by completion providers.
///
/// Implementations are constructed explicitly and handed to a
/// [`ChatBot`](crate::agent::ChatBot), so tests can substitute doubles.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &str;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Send the full history and return the first generated choice.
    async fn complete(&self, request: &ProviderRequest) -> Result<AssistantResponse, ToolchatError>;
}
