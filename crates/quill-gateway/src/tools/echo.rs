use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Tool, ToolResult};

/// Echo tool for connectivity testing.
pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo_test"
    }

    fn description(&self) -> &str {
        "Echo back a message"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "message": { "type": "string", "description": "Text to echo back." }
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let msg = args.get("message").and_then(|v| v.as_str()).unwrap_or("");
        ToolResult::success(format!("Echo: {msg}"))
    }
}
