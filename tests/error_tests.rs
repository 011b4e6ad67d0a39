//! Tests for the error system.

use toolchat::error::*;

#[test]
fn error_api_creation() {
    let err = ToolchatError::api(404, "Not found");
    assert!(matches!(&err, ToolchatError::Api { status: 404, .. }));
    assert_eq!(err.to_string(), "API error (status 404): Not found");
}

#[test]
fn error_display_names_the_tool() {
    let err = ToolchatError::UnknownTool("plot_chart".into());
    assert_eq!(err.to_string(), "Unknown tool: plot_chart");

    let err = ToolchatError::argument_decode("get_sales_data", "expected value at line 1");
    assert_eq!(
        err.to_string(),
        "Invalid arguments for get_sales_data: expected value at line 1"
    );
}

#[test]
fn error_categories_are_stable_for_major_variants() {
    struct Case {
        error: ToolchatError,
        expected_category: ErrorCategory,
        expected_provider: bool,
    }

    let network_error = reqwest::Client::new()
        .get("http://[::1")
        .build()
        .unwrap_err();
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk");
    let serde_error = serde_json::from_str::<serde_json::Value>("{not-json}").unwrap_err();

    let cases = vec![
        Case {
            error: ToolchatError::Authentication("bad-key".to_string()),
            expected_category: ErrorCategory::Provider,
            expected_provider: true,
        },
        Case {
            error: ToolchatError::Network(network_error),
            expected_category: ErrorCategory::Provider,
            expected_provider: true,
        },
        Case {
            error: ToolchatError::api(503, "Server unavailable"),
            expected_category: ErrorCategory::Provider,
            expected_provider: true,
        },
        Case {
            error: ToolchatError::provider("openai", "No choices in response"),
            expected_category: ErrorCategory::Provider,
            expected_provider: true,
        },
        Case {
            error: ToolchatError::Serialization(serde_error),
            expected_category: ErrorCategory::Provider,
            expected_provider: true,
        },
        Case {
            error: ToolchatError::UnknownTool("missing".to_string()),
            expected_category: ErrorCategory::Tool,
            expected_provider: false,
        },
        Case {
            error: ToolchatError::argument_decode("tool-a", "bad json"),
            expected_category: ErrorCategory::Tool,
            expected_provider: false,
        },
        Case {
            error: ToolchatError::ToolExecution {
                tool_name: "tool-a".to_string(),
                message: "failed".to_string(),
            },
            expected_category: ErrorCategory::Tool,
            expected_provider: false,
        },
        Case {
            error: ToolchatError::Configuration("bad-config".to_string()),
            expected_category: ErrorCategory::Configuration,
            expected_provider: false,
        },
        Case {
            error: ToolchatError::Io(io_error),
            expected_category: ErrorCategory::Configuration,
            expected_provider: false,
        },
        Case {
            error: ToolchatError::Timeout(5000),
            expected_category: ErrorCategory::Timeout,
            expected_provider: false,
        },
        Case {
            error: ToolchatError::Canceled,
            expected_category: ErrorCategory::Timeout,
            expected_provider: false,
        },
        Case {
            error: ToolchatError::InvalidState("no tool calls".to_string()),
            expected_category: ErrorCategory::Usage,
            expected_provider: false,
        },
    ];

    for case in cases {
        assert_eq!(case.error.category(), case.expected_category);
        assert_eq!(case.error.is_provider_error(), case.expected_provider);
    }
}
