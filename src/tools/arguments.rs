//! Typed access to tool call arguments.

use crate::error::ToolchatError;

/// Decoded tool call arguments: a JSON object of parameter name to value.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// Decode the wire form of a call's arguments.
    ///
    /// An empty string decodes to `{}`; anything that is not a JSON object
    /// is rejected.
    pub fn decode(tool_name: &str, raw: &str) -> Result<Self, ToolchatError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::new(serde_json::json!({})));
        }
        let value: serde_json::Value = serde_json::from_str(trimmed)
            .map_err(|e| ToolchatError::argument_decode(tool_name, e.to_string()))?;
        if !value.is_object() {
            return Err(ToolchatError::argument_decode(
                tool_name,
                format!("expected a JSON object, got {value}"),
            ));
        }
        Ok(Self::new(value))
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, ToolchatError> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolchatError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get an optional string argument.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }

    /// Get an integer argument.
    pub fn get_i64(&self, key: &str) -> Result<i64, ToolchatError> {
        self.value
            .get(key)
            .and_then(|v| v.as_i64())
            .ok_or_else(|| ToolchatError::InvalidArgument(format!("Missing integer argument: {key}")))
    }

    /// Get a float argument.
    pub fn get_f64(&self, key: &str) -> Result<f64, ToolchatError> {
        self.value
            .get(key)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| ToolchatError::InvalidArgument(format!("Missing float argument: {key}")))
    }

    /// Get a boolean argument.
    pub fn get_bool(&self, key: &str) -> Result<bool, ToolchatError> {
        self.value
            .get(key)
            .and_then(|v| v.as_bool())
            .ok_or_else(|| ToolchatError::InvalidArgument(format!("Missing boolean argument: {key}")))
    }

    /// Get an array argument.
    pub fn get_array(&self, key: &str) -> Result<&Vec<serde_json::Value>, ToolchatError> {
        self.value
            .get(key)
            .and_then(|v| v.as_array())
            .ok_or_else(|| ToolchatError::InvalidArgument(format!("Missing array argument: {key}")))
    }

    /// Deserialize the entire arguments into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, ToolchatError> {
        serde_json::from_value(self.value.clone()).map_err(|e| {
            ToolchatError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}
