//! Data analyst agent: one tool round over an OpenAI-compatible endpoint.
//!
//! Reads `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `TOOLCHAT_MODEL` from the
//! environment (or `.env`). The follow-up request carries tool messages
//! without call ids, so `OPENAI_BASE_URL` should name a server that accepts
//! them, such as vLLM.

use std::sync::Arc;

use serde_json::json;
use toolchat::prelude::*;

const QUARTERLY_SALES: [(&str, u32); 4] = [("Q1", 120), ("Q2", 135), ("Q3", 150), ("Q4", 160)];

fn registry() -> ToolRegistry {
    let sales = FnTool::new(
        "get_sales_data",
        "Quarterly sales totals, optionally for one quarter",
        ToolParameters::object()
            .string_enum("quarter", "Quarter to report", &["Q1", "Q2", "Q3", "Q4"], false)
            .build(),
        |args, _ctx| async move {
            let rows: Vec<_> = QUARTERLY_SALES
                .iter()
                .filter(|(q, _)| args.get_str_opt("quarter").map_or(true, |want| want == *q))
                .map(|(q, total)| json!({ "quarter": q, "total": total }))
                .collect();
            Ok(json!(rows))
        },
    );

    // Charts are rendered by the host application, never on the model's behalf.
    let chart = FnTool::new(
        "plot_chart",
        "Render a bar chart of quarterly sales",
        ToolParameters::empty(),
        |_args, _ctx| async move { Ok(json!("sales_chart.png")) },
    );

    ToolRegistry::new()
        .with_tool(Arc::new(sales))
        .with_excluded_tool(Arc::new(chart))
}

#[tokio::main]
async fn main() -> toolchat::error::Result<()> {
    let config = ToolchatConfig::load()?;
    let mut bot = ChatBot::from_config(
        &config,
        Arc::new(registry()),
        Some("You are a data analyst.".into()),
    )?;

    let reply = bot.handle_turn("How did sales develop over the year?").await?;
    let answer = if reply.requests_tools() {
        let round = bot.handle_tool_calls(&reply.tool_calls).await?;
        for result in &round.tool_results {
            println!("[{}] {}", result.name, result.content);
        }
        round.follow_up.content
    } else {
        reply.content
    };
    println!("{answer}");

    let chart = bot
        .registry()
        .invoke_direct("plot_chart", ToolArguments::new(json!({})))
        .await?;
    println!("chart: {chart}");

    Ok(())
}
