use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quill_scheduler::{SchedulerError, SchedulingService};
use serde_json::{json, Value};

use super::{account_from, Tool, ToolResult};

/// Schedule a post for future publication.
///
/// The core validates content and account; this tool owns the "time is
/// present and parseable" half of the contract because the typed service
/// API cannot express an absent timestamp.
pub struct SchedulePostTool {
    scheduling: Arc<SchedulingService>,
    default_account: String,
}

impl SchedulePostTool {
    pub fn new(scheduling: Arc<SchedulingService>, default_account: &str) -> Self {
        Self {
            scheduling,
            default_account: default_account.to_string(),
        }
    }
}

#[async_trait]
impl Tool for SchedulePostTool {
    fn name(&self) -> &str {
        "schedule_post"
    }

    fn description(&self) -> &str {
        "Schedule a post for publication at a future time"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Post content to publish."
                },
                "time": {
                    "type": "string",
                    "description": "RFC 3339 UTC instant to publish at (e.g. '2025-10-01T12:05:00Z'). Must be in the future."
                },
                "accountId": {
                    "type": "string",
                    "description": "Publishing account. Defaults to the configured account."
                }
            },
            "required": ["text", "time"]
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let text = args.get("text").and_then(|v| v.as_str()).unwrap_or("");
        let run_at: DateTime<Utc> = match args.get("time").and_then(|v| v.as_str()) {
            None => return ToolResult::error("time is required"),
            Some(raw) => match DateTime::parse_from_rfc3339(raw) {
                Ok(dt) => dt.with_timezone(&Utc),
                Err(e) => return ToolResult::error(format!("invalid time '{raw}': {e}")),
            },
        };
        let account = account_from(&args, &self.default_account);

        match self.scheduling.schedule(text, run_at, &account) {
            Ok(id) => ToolResult::success(format!(
                "Post scheduled!\n- Id: {id}\n- Account: {account}\n- Publishes at: {}",
                run_at.to_rfc3339(),
            )),
            Err(SchedulerError::InvalidArgument(msg)) => ToolResult::error(msg),
            Err(e) => ToolResult::error(format!("failed to schedule post: {e}")),
        }
    }
}

/// Look up a scheduled post by the id `schedule_post` returned.
pub struct CheckPostTool {
    scheduling: Arc<SchedulingService>,
}

impl CheckPostTool {
    pub fn new(scheduling: Arc<SchedulingService>) -> Self {
        Self { scheduling }
    }
}

#[async_trait]
impl Tool for CheckPostTool {
    fn name(&self) -> &str {
        "check_post"
    }

    fn description(&self) -> &str {
        "Check the status of a scheduled post by id"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "Id returned by schedule_post."
                }
            },
            "required": ["id"]
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        // Accept both the string form schedule_post hands out and a bare number.
        let id: i64 = match args.get("id") {
            Some(Value::String(s)) => match s.parse() {
                Ok(n) => n,
                Err(_) => return ToolResult::error(format!("invalid id '{s}'")),
            },
            Some(Value::Number(n)) => match n.as_i64() {
                Some(n) => n,
                None => return ToolResult::error("invalid id"),
            },
            _ => return ToolResult::error("'id' is required"),
        };

        match self.scheduling.status(id) {
            Ok(Some(post)) => {
                let mut out = format!(
                    "Post {}: status={}, publishes at {}",
                    post.id,
                    post.status,
                    post.run_at.to_rfc3339(),
                );
                if let Some(platform_id) = &post.platform_post_id {
                    out.push_str(&format!(", platform id {platform_id}"));
                }
                ToolResult::success(out)
            }
            Ok(None) => ToolResult::error(format!("no scheduled post with id {id}")),
            Err(e) => ToolResult::error(format!("lookup failed: {e}")),
        }
    }
}
