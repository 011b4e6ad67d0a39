//! Concurrent tool-call dispatch.
//!
//! A batch is handled in two phases. [`ToolInvoker::prepare`] resolves every
//! call against the registry and decodes its arguments; any failure there
//! rejects the whole batch before a single tool runs. [`ToolInvoker::run`]
//! then polls all invocations together on the current task and returns one
//! [`ToolResult`] per call, in request order. Failures during execution stay
//! in their own slot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::ToolchatError;
use crate::tools::{Tool, ToolArguments, ToolExecutionContext, ToolRegistry};
use crate::types::{ToolCall, ToolResult};
use crate::util::timeout::with_timeout;

/// A tool call that passed resolution and argument decoding.
pub struct PreparedCall<'a> {
    pub call: &'a ToolCall,
    pub arguments: ToolArguments,
    tool: Arc<dyn Tool>,
}

impl std::fmt::Debug for PreparedCall<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedCall")
            .field("call", &self.call)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// Cancels the tool batch currently running on a bot.
///
/// Every batch runs under a fresh token, so cancelling only reaches the
/// invocations in flight. Batches started afterwards are unaffected.
#[derive(Debug, Clone, Default)]
pub struct ToolCancelHandle {
    current: Arc<Mutex<Option<CancellationToken>>>,
}

impl ToolCancelHandle {
    /// Install a new batch token derived from `parent`.
    pub(crate) fn begin(&self, parent: &CancellationToken) -> CancellationToken {
        let token = parent.child_token();
        *self.slot() = Some(token.clone());
        token
    }

    pub(crate) fn finish(&self) {
        self.slot().take();
    }

    /// Cancel the running batch. Returns `false` if none was running.
    pub fn cancel(&self) -> bool {
        match self.slot().take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.slot().is_some()
    }

    fn slot(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Runs batches of tool calls against a registry.
#[derive(Debug, Clone)]
pub struct ToolInvoker {
    registry: Arc<ToolRegistry>,
    timeout: Duration,
}

impl ToolInvoker {
    pub fn new(registry: Arc<ToolRegistry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve and decode every call, failing on the first unknown tool or
    /// malformed argument payload.
    pub fn prepare<'a>(&self, calls: &'a [ToolCall]) -> Result<Vec<PreparedCall<'a>>, ToolchatError> {
        calls
            .iter()
            .map(|call| {
                let tool = self.registry.resolve(&call.function_name)?;
                let arguments = ToolArguments::decode(&call.function_name, &call.arguments)?;
                Ok(PreparedCall {
                    call,
                    arguments,
                    tool,
                })
            })
            .collect()
    }

    /// Run prepared calls concurrently. Each call gets a child of `cancel`
    /// and its own timeout; the output is in the same order as `prepared`.
    pub async fn run(
        &self,
        prepared: Vec<PreparedCall<'_>>,
        cancel: &CancellationToken,
    ) -> Vec<ToolResult> {
        let invocations = prepared
            .into_iter()
            .map(|p| self.invoke(p, cancel.child_token()));
        join_all(invocations).await
    }

    /// [`prepare`](Self::prepare) followed by [`run`](Self::run).
    pub async fn invoke_all(
        &self,
        calls: &[ToolCall],
        cancel: &CancellationToken,
    ) -> Result<Vec<ToolResult>, ToolchatError> {
        let prepared = self.prepare(calls)?;
        Ok(self.run(prepared, cancel).await)
    }

    async fn invoke(&self, prepared: PreparedCall<'_>, cancel: CancellationToken) -> ToolResult {
        let PreparedCall {
            call,
            arguments,
            tool,
        } = prepared;

        info!(
            tool = %call.function_name,
            tool_call_id = %call.id,
            arguments = %arguments.raw(),
            "calling tool"
        );

        let ctx = ToolExecutionContext {
            tool_call_id: Some(call.id.clone()),
            tool_name: Some(call.function_name.clone()),
            cancel: cancel.clone(),
        };

        let outcome = tokio::select! {
            _ = cancel.cancelled() => Err(ToolchatError::Canceled),
            outcome = with_timeout(self.timeout, tool.execute(&arguments, &ctx)) => outcome,
        };

        match outcome {
            Ok(value) => {
                let result = ToolResult::success(call, &value);
                info!(tool = %result.name, content = %result.content, "tool result");
                result
            }
            Err(error) => {
                // Stop any work the tool left running on a timeout.
                cancel.cancel();
                warn!(tool = %call.function_name, error = %error, "tool invocation failed");
                ToolResult::failure(call, error)
            }
        }
    }
}
