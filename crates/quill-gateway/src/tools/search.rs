use std::sync::Arc;

use async_trait::async_trait;
use quill_search::SearchService;
use serde_json::{json, Value};

use super::timeline::render_posts;
use super::{account_from, Tool, ToolResult};

/// Search timeline posts with AND/OR and phrase support.
pub struct SearchPostsTool {
    search: Arc<SearchService>,
    default_account: String,
}

impl SearchPostsTool {
    pub fn new(search: Arc<SearchService>, default_account: &str) -> Self {
        Self {
            search,
            default_account: default_account.to_string(),
        }
    }
}

#[async_trait]
impl Tool for SearchPostsTool {
    fn name(&self) -> &str {
        "search_posts"
    }

    fn description(&self) -> &str {
        "Search timeline posts with AND/OR and phrase support"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "q": {
                    "type": "string",
                    "description": "Query: bare terms AND within a clause, literal OR between clauses, double quotes for phrases."
                },
                "offset": {
                    "type": "integer",
                    "description": "Skip this many results (default 0)."
                },
                "limit": {
                    "type": "integer",
                    "description": "Max results (default 20, capped at 100)."
                },
                "accountId": {
                    "type": "string",
                    "description": "Account whose timeline to search. Defaults to the configured account."
                }
            },
            "required": ["q"]
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let query = match args.get("q").and_then(|v| v.as_str()) {
            Some(q) if !q.trim().is_empty() => q,
            _ => return ToolResult::error("'q' is required"),
        };
        let offset = args
            .get("offset")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as usize;
        let limit = args.get("limit").and_then(|v| v.as_u64()).unwrap_or(0) as usize;
        let account = account_from(&args, &self.default_account);

        let results = self.search.search(&account, query, offset, limit).await;
        if results.is_empty() {
            return ToolResult::success("no matches");
        }
        ToolResult::success(render_posts(&results))
    }
}
