//! toolchat: a conversational agent wrapper with parallel tool calls.
//!
//! A [`ChatBot`](agent::ChatBot) keeps an append-only message history, sends
//! it to a [`CompletionProvider`](provider::CompletionProvider), and runs the
//! tool calls the model asks for concurrently, feeding their results back in
//! request order.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use toolchat::prelude::*;
//!
//! # async fn example() -> toolchat::error::Result<()> {
//! let config = ToolchatConfig::load()?;
//! let registry = ToolRegistry::new().with_tool(Arc::new(FnTool::new(
//!     "get_sales_data",
//!     "Quarterly sales figures",
//!     ToolParameters::empty(),
//!     |_args, _ctx| async move { Ok(serde_json::json!([120, 135, 150, 160])) },
//! )));
//!
//! let mut bot = ChatBot::from_config(
//!     &config,
//!     Arc::new(registry),
//!     Some("You are a data analyst.".into()),
//! )?;
//!
//! let reply = bot.handle_turn("How did sales trend this year?").await?;
//! if reply.requests_tools() {
//!     let round = bot.handle_tool_calls(&reply.tool_calls).await?;
//!     println!("{}", round.follow_up.content);
//! } else {
//!     println!("{}", reply.content);
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod tools;
pub mod types;
pub mod util;
