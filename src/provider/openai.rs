//! OpenAI-compatible Chat Completions provider.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::{ToolchatConfig, DEFAULT_BASE_URL};
use crate::error::ToolchatError;
use crate::types::*;

use super::http::{bearer_headers, build_client, status_to_error};
use super::{CompletionProvider, ProviderRequest};

const PROVIDER_NAME: &str = "openai";

/// Chat Completions client for servers speaking the OpenAI protocol.
///
/// Tool results go on the wire as `{role: "tool", content, name}` with no
/// `tool_call_id`, and the assistant turn that requested them is not echoed
/// back. vLLM and other self-hosted servers accept that shape. The hosted
/// OpenAI API does not and answers the follow-up request with a 400, so point
/// `base_url` at a compatible server when tools are registered.
pub struct OpenAiProvider {
    model: String,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: Option<String>,
        client: reqwest::Client,
    ) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Build a provider (and its HTTP client) from resolved configuration.
    pub fn from_config(config: &ToolchatConfig) -> Result<Self, ToolchatError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ToolchatError::Authentication("Missing OPENAI_API_KEY".into()))?;
        let client = build_client(config.request_timeout())?;
        Ok(Self::new(
            config.model.clone(),
            api_key,
            Some(config.base_url.clone()),
            client,
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request_body(&self, request: &ProviderRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": request.messages,
        });

        if let Some(obj) = body.as_object_mut() {
            if let Some(temp) = request.settings.temperature {
                obj.insert("temperature".into(), temp.into());
            }
            if let Some(seed) = request.settings.seed {
                obj.insert("seed".into(), seed.into());
            }
            if let Some(max) = request.settings.max_tokens {
                obj.insert("max_tokens".into(), max.into());
            }

            if let Some(ref tools) = request.tools {
                if !tools.is_empty() {
                    let tool_defs: Vec<serde_json::Value> = tools
                        .iter()
                        .map(|t| {
                            serde_json::json!({
                                "type": "function",
                                "function": {
                                    "name": t.name,
                                    "description": t.description,
                                    "parameters": t.parameters,
                                }
                            })
                        })
                        .collect();
                    obj.insert("tools".into(), tool_defs.into());
                }
            }
        }

        body
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ProviderRequest) -> Result<AssistantResponse, ToolchatError> {
        let body = self.build_request_body(request);
        let url = format!("{}/chat/completions", self.base_url);

        debug!(
            model = %self.model,
            messages = request.messages.len(),
            "OpenAI chat completion"
        );

        let resp = self
            .client
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body_text = resp.text().await?;
        if !(200..300).contains(&status) {
            return Err(status_to_error(status, &body_text));
        }

        parse_chat_response(&body_text)
    }
}

/// Parse a Chat Completions body into the first choice.
fn parse_chat_response(body: &str) -> Result<AssistantResponse, ToolchatError> {
    let data: OpenAiChatResponse = serde_json::from_str(body).map_err(|e| {
        ToolchatError::provider(PROVIDER_NAME, format!("Malformed completion payload: {e}"))
    })?;
    let choice = data
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ToolchatError::provider(PROVIDER_NAME, "No choices in response"))?;

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| ToolCall {
            id: tc.id,
            function_name: tc.function.name,
            arguments: tc.function.arguments,
        })
        .collect();

    Ok(AssistantResponse {
        content: choice.message.content.unwrap_or_default(),
        tool_calls,
        finish_reason: choice.finish_reason.as_deref().and_then(|s| s.parse().ok()),
        usage: data
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default(),
    })
}

// OpenAI API response types (internal)

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Deserialize)]
struct OpenAiToolCall {
    id: String,
    function: OpenAiFunction,
}

#[derive(Deserialize)]
struct OpenAiFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
