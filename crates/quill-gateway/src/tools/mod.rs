//! Tool system for the JSON-RPC dispatcher.
//!
//! Defines the `Tool` trait all tools implement plus the explicitly
//! constructed registry. No discovery: [`build_registry`] wires every tool
//! by hand and the list it returns is the whole tool surface.

pub mod analytics;
pub mod echo;
pub mod registry;
pub mod schedule;
pub mod search;
pub mod timeline;

use std::sync::Arc;

use async_trait::async_trait;
use quill_analytics::AnalyticsService;
use quill_client::TimelineService;
use quill_scheduler::SchedulingService;
use quill_search::SearchService;
use serde_json::Value;

pub use registry::ToolRegistry;

/// Result of executing a tool.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Text content returned to the caller.
    pub content: String,
    /// Whether the tool execution failed.
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            is_error: true,
        }
    }
}

/// Trait that all tools must implement.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name as exposed via `tools/list` (e.g. "schedule_post").
    fn name(&self) -> &str;
    /// Human-readable description for `tools/list`.
    fn description(&self) -> &str;
    /// JSON Schema for the tool's input parameters.
    fn input_schema(&self) -> Value;
    /// Execute the tool with the given arguments.
    async fn execute(&self, args: Value) -> ToolResult;
}

/// Resolve the account a tool call acts on: explicit `accountId` argument
/// first, the configured default otherwise.
pub(crate) fn account_from(args: &Value, default_account: &str) -> String {
    args.get("accountId")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_account)
        .to_string()
}

/// Wire up the full tool surface.
pub fn build_registry(
    scheduling: Arc<SchedulingService>,
    timeline: Arc<TimelineService>,
    search: Arc<SearchService>,
    analytics: Arc<AnalyticsService>,
    default_account: &str,
) -> ToolRegistry {
    ToolRegistry::new(vec![
        Box::new(echo::EchoTool),
        Box::new(timeline::GetHomeTimelineTool::new(
            timeline,
            default_account,
        )),
        Box::new(schedule::SchedulePostTool::new(
            scheduling.clone(),
            default_account,
        )),
        Box::new(schedule::CheckPostTool::new(scheduling)),
        Box::new(search::SearchPostsTool::new(search, default_account)),
        Box::new(analytics::TopHashtagsTool::new(
            analytics.clone(),
            default_account,
        )),
        Box::new(analytics::AnalyticsSummaryTool::new(
            analytics,
            default_account,
        )),
    ])
}
