//! Name-indexed tool registry with per-entry dispatch control.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::arguments::ToolArguments;
use super::tool::{Tool, ToolExecutionContext};
use crate::error::ToolchatError;
use crate::provider::ToolDefinition;

/// A registered tool plus whether the agent may dispatch it.
#[derive(Clone)]
pub struct RegisteredTool {
    pub tool: Arc<dyn Tool>,
    /// `false` for tools that are declared (discoverable, directly
    /// invocable) but never run on behalf of the model.
    pub dispatchable: bool,
}

impl RegisteredTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.tool.name().to_string(),
            description: self.tool.description().to_string(),
            parameters: self.tool.parameters().schema.clone(),
        }
    }
}

impl std::fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("name", &self.tool.name())
            .field("dispatchable", &self.dispatchable)
            .finish()
    }
}

/// Tools available to a chat session, kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    entries: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool the model may call. A tool with the same name
    /// replaces the earlier entry in place.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> &mut Self {
        self.insert(RegisteredTool {
            tool,
            dispatchable: true,
        })
    }

    /// Register a tool that is declared but never dispatched for the model.
    pub fn register_excluded(&mut self, tool: Arc<dyn Tool>) -> &mut Self {
        self.insert(RegisteredTool {
            tool,
            dispatchable: false,
        })
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    /// Builder-style [`register_excluded`](Self::register_excluded).
    pub fn with_excluded_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register_excluded(tool);
        self
    }

    fn insert(&mut self, entry: RegisteredTool) -> &mut Self {
        let name = entry.tool.name().to_string();
        debug!(tool = %name, dispatchable = entry.dispatchable, "registering tool");
        match self.index.get(&name) {
            Some(&slot) => self.entries[slot] = entry,
            None => {
                self.index.insert(name, self.entries.len());
                self.entries.push(entry);
            }
        }
        self
    }

    /// Look up any entry, dispatchable or not.
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    /// Resolve a tool for dispatch on behalf of the model.
    ///
    /// Unknown names and excluded entries both fail with
    /// [`ToolchatError::UnknownTool`].
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Tool>, ToolchatError> {
        match self.get(name) {
            Some(entry) if entry.dispatchable => Ok(entry.tool.clone()),
            _ => Err(ToolchatError::UnknownTool(name.to_string())),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn is_dispatchable(&self, name: &str) -> bool {
        self.get(name).is_some_and(|entry| entry.dispatchable)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.tool.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Schemas of the dispatchable tools, for provider requests.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.entries
            .iter()
            .filter(|e| e.dispatchable)
            .map(RegisteredTool::definition)
            .collect()
    }

    /// Schemas of every registered tool, including excluded ones.
    pub fn all_definitions(&self) -> Vec<ToolDefinition> {
        self.entries.iter().map(RegisteredTool::definition).collect()
    }

    /// Invoke a tool directly, outside the agent loop. Excluded tools are
    /// allowed here.
    pub async fn invoke_direct(
        &self,
        name: &str,
        args: ToolArguments,
    ) -> Result<serde_json::Value, ToolchatError> {
        let entry = self
            .get(name)
            .ok_or_else(|| ToolchatError::UnknownTool(name.to_string()))?;
        let ctx = ToolExecutionContext {
            tool_name: Some(name.to_string()),
            ..Default::default()
        };
        entry.tool.execute(&args, &ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{FnTool, ToolParameters};
    use serde_json::json;

    fn constant_tool(name: &str, value: serde_json::Value) -> Arc<dyn Tool> {
        Arc::new(FnTool::new(
            name,
            format!("returns {value}"),
            ToolParameters::empty(),
            move |_args, _ctx| {
                let value = value.clone();
                async move { Ok(value) }
            },
        ))
    }

    fn analyst_registry() -> ToolRegistry {
        ToolRegistry::new()
            .with_tool(constant_tool("get_sales_data", json!([1, 2, 3])))
            .with_excluded_tool(constant_tool("plot_chart", json!("chart.png")))
    }

    #[test]
    fn resolve_rejects_unknown_and_excluded_names() {
        let registry = analyst_registry();

        assert!(registry.resolve("get_sales_data").is_ok());
        assert!(matches!(
            registry.resolve("plot_chart"),
            Err(ToolchatError::UnknownTool(name)) if name == "plot_chart"
        ));
        assert!(matches!(
            registry.resolve("drop_tables"),
            Err(ToolchatError::UnknownTool(_))
        ));
    }

    #[test]
    fn definitions_hide_excluded_tools_from_the_model() {
        let registry = analyst_registry();

        let sent: Vec<_> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(sent, vec!["get_sales_data"]);

        let all: Vec<_> = registry.all_definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(all, vec!["get_sales_data", "plot_chart"]);
        assert!(registry.contains("plot_chart"));
        assert!(!registry.is_dispatchable("plot_chart"));
    }

    #[test]
    fn re_registering_replaces_in_place() {
        let mut registry = analyst_registry();
        registry.register_excluded(constant_tool("get_sales_data", json!(0)));

        assert_eq!(registry.names(), vec!["get_sales_data", "plot_chart"]);
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_dispatchable("get_sales_data"));
    }

    #[tokio::test]
    async fn invoke_direct_runs_excluded_tools() {
        let registry = analyst_registry();
        let value = registry
            .invoke_direct("plot_chart", ToolArguments::new(json!({})))
            .await
            .expect("direct invocation should succeed");
        assert_eq!(value, json!("chart.png"));
    }
}
