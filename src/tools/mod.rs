//! Tool system for function calling.

pub mod arguments;
pub mod registry;
pub mod tool;
pub mod types;

pub use arguments::ToolArguments;
pub use registry::{RegisteredTool, ToolRegistry};
pub use tool::{FnTool, Tool, ToolExecutionContext};
pub use types::ToolParameters;
