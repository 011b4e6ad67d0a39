//! The [`Tool`] trait and [`FnTool`], its closure-backed implementation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::arguments::ToolArguments;
use super::types::ToolParameters;
use crate::error::ToolchatError;

/// Per-invocation state handed to [`Tool::execute`].
///
/// `cancel` belongs to this invocation alone. It fires when the call times
/// out, when the caller cancels the running tool batch, or when the bot is
/// shut down. The invoker stops polling the tool at that point, so work the
/// tool spawned elsewhere should watch the token to stop too.
#[derive(Debug, Clone, Default)]
pub struct ToolExecutionContext {
    pub tool_call_id: Option<String>,
    pub tool_name: Option<String>,
    pub cancel: CancellationToken,
}

impl ToolExecutionContext {
    pub fn is_canceled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// A function the model may call.
///
/// `name` is what the model sees and sends back in its tool calls, so it has
/// to be unique within a [`ToolRegistry`](super::ToolRegistry). Whatever JSON
/// value `execute` returns is stringified into the tool message; an `Err`
/// becomes an `Error: ...` message in the same slot.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema of the argument object.
    fn parameters(&self) -> &ToolParameters;

    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, ToolchatError>;
}

type BoxedHandler = dyn Fn(
        ToolArguments,
        ToolExecutionContext,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, ToolchatError>> + Send>>
    + Send
    + Sync;

/// A [`Tool`] backed by an async closure.
///
/// The closure receives owned copies of the arguments and context, so it can
/// move them into the returned future. A long-running handler can race its
/// work against the invocation's cancel token:
///
/// ```
/// use std::time::Duration;
///
/// use serde_json::json;
/// use toolchat::error::ToolchatError;
/// use toolchat::tools::{FnTool, ToolParameters};
///
/// let report = FnTool::new(
///     "build_report",
///     "Aggregates a year of sales into a report",
///     ToolParameters::empty(),
///     |_args, ctx| async move {
///         tokio::select! {
///             _ = ctx.cancel.cancelled() => Err(ToolchatError::Canceled),
///             _ = tokio::time::sleep(Duration::from_secs(30)) => Ok(json!("report ready")),
///         }
///     },
/// );
/// ```
pub struct FnTool {
    name: String,
    description: String,
    parameters: ToolParameters,
    handler: Arc<BoxedHandler>,
}

impl FnTool {
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ToolParameters,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<serde_json::Value, ToolchatError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler: Arc::new(move |args, ctx| Box::pin(handler(args, ctx))),
        }
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, ToolchatError> {
        if ctx.is_canceled() {
            return Err(ToolchatError::Canceled);
        }
        (self.handler)(args.clone(), ctx.clone()).await
    }
}

impl std::fmt::Debug for FnTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}
