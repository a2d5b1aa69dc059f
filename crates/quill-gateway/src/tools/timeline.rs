use std::sync::Arc;

use async_trait::async_trait;
use quill_client::{Post, TimelineService};
use serde_json::{json, Value};

use super::{account_from, Tool, ToolResult};

/// Default number of posts when the caller does not specify a count.
const DEFAULT_COUNT: usize = 20;

/// Read the caller's home timeline.
pub struct GetHomeTimelineTool {
    timeline: Arc<TimelineService>,
    default_account: String,
}

impl GetHomeTimelineTool {
    pub fn new(timeline: Arc<TimelineService>, default_account: &str) -> Self {
        Self {
            timeline,
            default_account: default_account.to_string(),
        }
    }
}

#[async_trait]
impl Tool for GetHomeTimelineTool {
    fn name(&self) -> &str {
        "get_home_timeline"
    }

    fn description(&self) -> &str {
        "Return recent posts from the account's home timeline"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "count": {
                    "type": "integer",
                    "description": "How many posts to return (clamped to 1..=50, default 20)."
                },
                "accountId": {
                    "type": "string",
                    "description": "Account to read. Defaults to the configured account."
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let count = args
            .get("count")
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_COUNT);
        let account = account_from(&args, &self.default_account);

        match self.timeline.home_timeline(&account, count).await {
            Ok(posts) => ToolResult::success(render_posts(&posts)),
            Err(e) => ToolResult::error(format!("failed to fetch home timeline: {e}")),
        }
    }
}

/// Compact text rows: `id | author | text`, one post per line.
pub(crate) fn render_posts(posts: &[Post]) -> String {
    if posts.is_empty() {
        return "no posts".to_string();
    }
    posts
        .iter()
        .map(|p| format!("{} | {} | {}", p.id, p.author, p.text))
        .collect::<Vec<_>>()
        .join("\n")
}
