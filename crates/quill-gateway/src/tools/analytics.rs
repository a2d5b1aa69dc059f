use std::sync::Arc;

use async_trait::async_trait;
use quill_analytics::AnalyticsService;
use serde_json::{json, Value};

use super::{account_from, Tool, ToolResult};

/// Most frequent hashtags on the account's timeline.
pub struct TopHashtagsTool {
    analytics: Arc<AnalyticsService>,
    default_account: String,
}

impl TopHashtagsTool {
    pub fn new(analytics: Arc<AnalyticsService>, default_account: &str) -> Self {
        Self {
            analytics,
            default_account: default_account.to_string(),
        }
    }
}

#[async_trait]
impl Tool for TopHashtagsTool {
    fn name(&self) -> &str {
        "top_hashtags"
    }

    fn description(&self) -> &str {
        "Most frequent hashtags on the account's timeline"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "n": {
                    "type": "integer",
                    "description": "How many hashtags to return (default 5)."
                },
                "accountId": {
                    "type": "string",
                    "description": "Account to analyse. Defaults to the configured account."
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let n = args.get("n").and_then(|v| v.as_u64()).unwrap_or(0) as usize;
        let account = account_from(&args, &self.default_account);

        let tags = self.analytics.top_hashtags(&account, n).await;
        if tags.is_empty() {
            return ToolResult::success("no hashtags found");
        }
        ToolResult::success(tags.join("\n"))
    }
}

/// Roll-up summary: post volume, top hashtags, busiest hour.
pub struct AnalyticsSummaryTool {
    analytics: Arc<AnalyticsService>,
    default_account: String,
}

impl AnalyticsSummaryTool {
    pub fn new(analytics: Arc<AnalyticsService>, default_account: &str) -> Self {
        Self {
            analytics,
            default_account: default_account.to_string(),
        }
    }
}

#[async_trait]
impl Tool for AnalyticsSummaryTool {
    fn name(&self) -> &str {
        "analytics_summary"
    }

    fn description(&self) -> &str {
        "Timeline summary: post volume, top hashtags, busiest hour (UTC)"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "accountId": {
                    "type": "string",
                    "description": "Account to analyse. Defaults to the configured account."
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let account = account_from(&args, &self.default_account);
        let summary = self.analytics.summary(&account).await;
        match serde_json::to_string_pretty(&summary) {
            Ok(body) => ToolResult::success(body),
            Err(e) => ToolResult::error(format!("failed to render summary: {e}")),
        }
    }
}
