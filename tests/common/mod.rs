//! Shared test helpers: scripted provider and tool builders.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use toolchat::error::ToolchatError;
use toolchat::provider::{CompletionProvider, ProviderRequest};
use toolchat::tools::{FnTool, Tool, ToolParameters};
use toolchat::types::*;

/// A provider that replays queued responses and records every request.
pub struct MockProvider {
    model_id: String,
    delay: Duration,
    responses: Mutex<VecDeque<Result<AssistantResponse, ToolchatError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            delay: Duration::ZERO,
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Wait `delay` before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queue a fully specified response.
    pub fn queue_reply(&self, response: AssistantResponse) {
        self.queue(Ok(response));
    }

    /// Queue a text response.
    pub fn queue_response(&self, text: &str) {
        self.queue(Ok(AssistantResponse::text(text)));
    }

    /// Queue a response asking for tools, with optional accompanying text.
    pub fn queue_tool_calls(&self, text: &str, calls: Vec<ToolCall>) {
        self.queue(Ok(AssistantResponse {
            content: text.to_string(),
            tool_calls: calls,
            finish_reason: Some(FinishReason::ToolCalls),
            usage: Usage::default(),
        }));
    }

    /// Queue a failure.
    pub fn queue_error(&self, error: ToolchatError) {
        self.queue(Err(error));
    }

    fn queue(&self, response: Result<AssistantResponse, ToolchatError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn complete(&self, request: &ProviderRequest) -> Result<AssistantResponse, ToolchatError> {
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(AssistantResponse::text("Mock response")))
    }
}

/// A tool that waits `delay`, bumps `calls`, then returns `value`.
pub fn delayed_tool(
    name: &str,
    delay: Duration,
    value: serde_json::Value,
    calls: Arc<AtomicUsize>,
) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        name,
        format!("test tool {name}"),
        ToolParameters::empty(),
        move |_args, _ctx| {
            let value = value.clone();
            let calls = calls.clone();
            async move {
                tokio::time::sleep(delay).await;
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            }
        },
    ))
}

/// A tool returning `value` immediately.
pub fn constant_tool(name: &str, value: serde_json::Value) -> Arc<dyn Tool> {
    delayed_tool(name, Duration::ZERO, value, Arc::new(AtomicUsize::new(0)))
}

/// A tool that always fails.
pub fn failing_tool(name: &str, message: &str) -> Arc<dyn Tool> {
    let tool_name = name.to_string();
    let message = message.to_string();
    Arc::new(FnTool::new(
        name,
        "always fails",
        ToolParameters::empty(),
        move |_args, _ctx| {
            let tool_name = tool_name.clone();
            let message = message.clone();
            async move {
                Err(ToolchatError::ToolExecution {
                    tool_name,
                    message,
                })
            }
        },
    ))
}
