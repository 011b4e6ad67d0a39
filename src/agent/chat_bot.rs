//! Turn executor: one conversation, one provider, one tool registry.

use std::sync::Arc;
use std::time::Duration;

use strum::Display;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::ToolchatConfig;
use crate::error::ToolchatError;
use crate::provider::{CompletionProvider, ProviderRequest};
use crate::tools::ToolRegistry;
use crate::types::*;
use crate::util::timeout::with_timeout;

use super::conversation::Conversation;
use super::invoker::{ToolCancelHandle, ToolInvoker};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(60);

/// Where a [`ChatBot`] is within the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TurnState {
    AwaitingUser,
    ProviderQueried,
    ToolsRequested,
    ToolsExecuting,
    ToolsAppended,
    ProviderRequeried,
    Done,
}

/// A conversational agent that owns its history.
///
/// Tool calls returned by [`handle_turn`](Self::handle_turn) are not run
/// automatically; pass them to [`handle_tool_calls`](Self::handle_tool_calls)
/// to execute them and get the model's follow-up. Chaining further rounds is
/// up to the caller.
pub struct ChatBot {
    provider: Arc<dyn CompletionProvider>,
    invoker: ToolInvoker,
    conversation: Conversation,
    settings: GenerationSettings,
    request_timeout: Duration,
    state: TurnState,
    usage: Usage,
    shutdown: CancellationToken,
    tool_cancel: ToolCancelHandle,
}

impl ChatBot {
    /// Create a bot with deterministic sampling and default timeouts.
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        registry: Arc<ToolRegistry>,
        system: Option<String>,
    ) -> Self {
        Self {
            provider,
            invoker: ToolInvoker::new(registry, DEFAULT_TOOL_TIMEOUT),
            conversation: Conversation::new(system),
            settings: GenerationSettings::deterministic(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            state: TurnState::AwaitingUser,
            usage: Usage::default(),
            shutdown: CancellationToken::new(),
            tool_cancel: ToolCancelHandle::default(),
        }
    }

    /// Create a bot talking to an OpenAI-compatible endpoint described by `config`.
    #[cfg(feature = "openai")]
    pub fn from_config(
        config: &ToolchatConfig,
        registry: Arc<ToolRegistry>,
        system: Option<String>,
    ) -> Result<Self, ToolchatError> {
        let provider = crate::provider::openai::OpenAiProvider::from_config(config)?;
        Ok(Self::new(Arc::new(provider), registry, system).with_config(config))
    }

    /// Apply sampling settings and timeouts from `config`.
    pub fn with_config(mut self, config: &ToolchatConfig) -> Self {
        self.settings = config.generation_settings();
        self.request_timeout = config.request_timeout();
        self.invoker = ToolInvoker::new(self.invoker.registry().clone(), config.tool_timeout());
        self
    }

    /// Set generation settings.
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Bound each tool invocation.
    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.invoker = ToolInvoker::new(self.invoker.registry().clone(), timeout);
        self
    }

    /// Bound each provider call.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Drive one user turn: append the message, query the provider, and
    /// record the reply. Empty assistant content is not recorded.
    pub async fn handle_turn(
        &mut self,
        user_text: impl Into<String>,
    ) -> Result<AssistantResponse, ToolchatError> {
        let user_text = user_text.into();
        info!(message = %user_text, "user message");
        self.conversation.append(Message::user(user_text));

        self.state = TurnState::ProviderQueried;
        let response = self.query_provider().await?;
        self.record_reply(&response);
        Ok(response)
    }

    /// Run the requested tool calls concurrently, append their results in
    /// request order, then ask the provider for a follow-up.
    ///
    /// Unknown or excluded tools and undecodable arguments reject the batch
    /// before anything runs and leave the history untouched. A tool that
    /// fails or times out yields an error result in its own slot.
    pub async fn handle_tool_calls(
        &mut self,
        tool_calls: &[ToolCall],
    ) -> Result<ToolRound, ToolchatError> {
        if tool_calls.is_empty() {
            return Err(ToolchatError::InvalidState("no tool calls to execute".into()));
        }

        let prepared = self.invoker.prepare(tool_calls)?;
        let batch = self.tool_cancel.begin(&self.shutdown);
        self.state = TurnState::ToolsExecuting;
        let tool_results = self.invoker.run(prepared, &batch).await;
        self.tool_cancel.finish();

        for result in &tool_results {
            self.conversation.append(result.to_message());
        }
        self.state = TurnState::ToolsAppended;
        debug!(count = tool_results.len(), "tool results appended");

        self.state = TurnState::ProviderRequeried;
        let follow_up = self.query_provider().await?;
        self.record_reply(&follow_up);

        Ok(ToolRound {
            follow_up,
            tool_results,
        })
    }

    /// Send the current history to the provider.
    pub async fn query_provider(&self) -> Result<AssistantResponse, ToolchatError> {
        let definitions = self.invoker.registry().definitions();
        let request = ProviderRequest {
            messages: self.conversation.history().to_vec(),
            settings: self.settings.clone(),
            tools: (!definitions.is_empty()).then_some(definitions),
        };

        debug!(
            provider = self.provider.provider_name(),
            model = self.provider.model_id(),
            messages = request.messages.len(),
            "querying provider"
        );
        with_timeout(self.request_timeout, self.provider.complete(&request)).await
    }

    fn record_reply(&mut self, response: &AssistantResponse) {
        self.usage.merge(&response.usage);
        info!(
            content = %response.content,
            tool_calls = response.tool_calls.len(),
            "assistant response"
        );
        if !response.content.is_empty() {
            self.conversation.append(Message::assistant(response.content.clone()));
        }
        self.state = if response.requests_tools() {
            TurnState::ToolsRequested
        } else {
            TurnState::Done
        };
    }

    /// The full ordered history.
    pub fn history(&self) -> &[Message] {
        self.conversation.history()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        self.invoker.registry()
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Token usage summed over every provider reply in this conversation.
    pub fn total_usage(&self) -> Usage {
        self.usage
    }

    /// Cancel the tool batch that is currently running, if any.
    pub fn cancel_tools(&self) -> bool {
        self.tool_cancel.cancel()
    }

    /// A handle that can cancel running tool batches from another task.
    pub fn tool_cancel_handle(&self) -> ToolCancelHandle {
        self.tool_cancel.clone()
    }

    /// Parent of every tool batch token. Cancelling it shuts the bot's tools
    /// down for good: running and future invocations fail with `Canceled`.
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }
}

impl std::fmt::Debug for ChatBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatBot")
            .field("provider", &self.provider.provider_name())
            .field("model", &self.provider.model_id())
            .field("messages", &self.conversation.len())
            .field("state", &self.state)
            .field("usage", &self.usage)
            .finish()
    }
}
