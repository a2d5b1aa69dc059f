use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::Json;
use quill_protocol::rpc::{
    RpcRequest, RpcResponse, ERR_INVALID_PARAMS, ERR_INVALID_REQUEST, ERR_METHOD_NOT_FOUND,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::app::AppState;

/// MCP protocol revision the gateway implements.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// `POST /mcp` entry point.
///
/// The body is parsed by hand so a malformed request still gets a JSON-RPC
/// error frame instead of a bare 400.
pub async fn handle_http(State(state): State<Arc<AppState>>, body: String) -> Json<RpcResponse> {
    let req: RpcRequest = match serde_json::from_str(&body) {
        Ok(req) => req,
        Err(e) => {
            warn!("unparseable JSON-RPC request: {e}");
            return Json(RpcResponse::error(
                None,
                ERR_INVALID_REQUEST,
                "Invalid Request",
            ));
        }
    };
    Json(dispatch(&state, req).await)
}

/// Route a JSON-RPC request to the protocol handler or a tool.
pub async fn dispatch(state: &AppState, req: RpcRequest) -> RpcResponse {
    let id = req.id.clone();
    match req.method.as_str() {
        "initialize" => RpcResponse::result(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "serverInfo": {
                    "name": "quill-gateway",
                    "version": env!("CARGO_PKG_VERSION"),
                },
                "capabilities": { "tools": {} },
            }),
        ),

        "tools/list" => RpcResponse::result(id, json!({ "tools": state.registry.descriptors() })),

        "tools/call" => tools_call(state, req.params.as_ref(), id).await,

        _ => RpcResponse::error(id, ERR_METHOD_NOT_FOUND, "Method not found"),
    }
}

async fn tools_call(state: &AppState, params: Option<&Value>, id: Option<Value>) -> RpcResponse {
    let started = Instant::now();

    let Some(params) = params else {
        record_audit(state, None, None, false, started, Some(ERR_INVALID_PARAMS), Some("Missing params"));
        return RpcResponse::error(id, ERR_INVALID_PARAMS, "Missing params");
    };
    let Some(name) = params.get("name").and_then(|v| v.as_str()) else {
        record_audit(state, None, None, false, started, Some(ERR_INVALID_PARAMS), Some("Param 'name' required"));
        return RpcResponse::error(id, ERR_INVALID_PARAMS, "Param 'name' required");
    };

    let args = params
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| json!({}));
    let account = args
        .get("accountId")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let Some(tool) = state.registry.get(name) else {
        record_audit(state, Some(name), account.as_deref(), false, started, Some(ERR_INVALID_PARAMS), Some("Unknown tool"));
        return RpcResponse::error(id, ERR_INVALID_PARAMS, format!("Unknown tool: {name}"));
    };

    info!(tool = name, "executing tool");
    let outcome = tool.execute(args).await;
    record_audit(
        state,
        Some(name),
        account.as_deref(),
        !outcome.is_error,
        started,
        None,
        outcome.is_error.then_some(outcome.content.as_str()),
    );

    // Tool failures are in-band: the RPC call itself succeeded.
    RpcResponse::result(
        id,
        json!({
            "content": [{ "type": "text", "text": outcome.content }],
            "isError": outcome.is_error,
        }),
    )
}

#[allow(clippy::too_many_arguments)]
fn record_audit(
    state: &AppState,
    tool: Option<&str>,
    account: Option<&str>,
    ok: bool,
    started: Instant,
    err_code: Option<i64>,
    err_msg: Option<&str>,
) {
    let duration_ms = started.elapsed().as_millis() as u64;
    if let Err(e) = state
        .audit
        .record("tools/call", tool, account, ok, duration_ms, err_code, err_msg)
    {
        warn!("audit write failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use quill_analytics::AnalyticsService;
    use quill_client::{FakePlatformClient, PlatformClient, TimelineService};
    use quill_scheduler::{FixedClock, SchedulingService, SqlitePostStore};
    use quill_search::SearchService;
    use rusqlite::Connection;

    use super::*;
    use crate::audit::AuditLog;
    use crate::tools::build_registry;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    /// Full dispatcher state on in-memory SQLite, clock frozen at
    /// 2025-10-01T12:00:00Z.
    fn state() -> Arc<AppState> {
        let client: Arc<dyn PlatformClient> = Arc::new(FakePlatformClient::new());
        let store = Arc::new(SqlitePostStore::new(Connection::open_in_memory().unwrap()).unwrap());
        let scheduling = Arc::new(SchedulingService::new(
            store,
            client.clone(),
            Arc::new(FixedClock(ts("2025-10-01T12:00:00Z"))),
            50,
        ));
        let timeline = Arc::new(TimelineService::new(client.clone()));
        let search = Arc::new(SearchService::new(client.clone()));
        let analytics = Arc::new(AnalyticsService::new(client));

        Arc::new(AppState {
            registry: build_registry(scheduling, timeline, search, analytics, "demo-account"),
            audit: AuditLog::new(Connection::open_in_memory().unwrap()).unwrap(),
        })
    }

    async fn call(state: &AppState, method: &str, params: Option<Value>) -> RpcResponse {
        dispatch(
            state,
            RpcRequest {
                jsonrpc: "2.0".to_string(),
                method: method.to_string(),
                params,
                id: Some(json!(1)),
            },
        )
        .await
    }

    fn tool_text(res: &RpcResponse) -> String {
        res.result.as_ref().unwrap()["content"][0]["text"]
            .as_str()
            .unwrap()
            .to_string()
    }

    fn tool_is_error(res: &RpcResponse) -> bool {
        res.result.as_ref().unwrap()["isError"].as_bool().unwrap()
    }

    #[tokio::test]
    async fn initialize_reports_protocol_and_tools() {
        let state = state();
        let res = call(&state, "initialize", None).await;
        let result = res.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "quill-gateway");
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn tools_list_names_the_whole_surface() {
        let state = state();
        let res = call(&state, "tools/list", None).await;
        let tools = res.result.unwrap()["tools"].clone();
        let names: Vec<&str> = tools
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "echo_test",
                "get_home_timeline",
                "schedule_post",
                "check_post",
                "search_posts",
                "top_hashtags",
                "analytics_summary",
            ]
        );
    }

    #[tokio::test]
    async fn unknown_method_is_minus_32601() {
        let state = state();
        let res = call(&state, "tools/nope", None).await;
        assert_eq!(res.error.unwrap().code, ERR_METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_params_and_name_are_minus_32602() {
        let state = state();

        let res = call(&state, "tools/call", None).await;
        assert_eq!(res.error.unwrap().code, ERR_INVALID_PARAMS);

        let res = call(&state, "tools/call", Some(json!({"arguments": {}}))).await;
        assert_eq!(res.error.unwrap().code, ERR_INVALID_PARAMS);
    }

    #[tokio::test]
    async fn unknown_tool_is_minus_32602() {
        let state = state();
        let res = call(
            &state,
            "tools/call",
            Some(json!({"name": "does_not_exist"})),
        )
        .await;
        let err = res.error.unwrap();
        assert_eq!(err.code, ERR_INVALID_PARAMS);
        assert!(err.message.contains("does_not_exist"));
    }

    #[tokio::test]
    async fn echo_round_trip_writes_an_audit_row() {
        let state = state();
        let res = call(
            &state,
            "tools/call",
            Some(json!({"name": "echo_test", "arguments": {"message": "hi"}})),
        )
        .await;
        assert_eq!(tool_text(&res), "Echo: hi");
        assert!(!tool_is_error(&res));
        assert_eq!(state.audit.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn schedule_then_check_status() {
        let state = state();
        let res = call(
            &state,
            "tools/call",
            Some(json!({
                "name": "schedule_post",
                "arguments": {"text": "Hello world", "time": "2025-10-01T12:05:00Z"},
            })),
        )
        .await;
        assert!(!tool_is_error(&res));
        assert!(tool_text(&res).contains("Id: 1"));

        let res = call(
            &state,
            "tools/call",
            Some(json!({"name": "check_post", "arguments": {"id": "1"}})),
        )
        .await;
        assert!(tool_text(&res).contains("status=pending"));
    }

    #[tokio::test]
    async fn schedule_in_the_past_is_an_in_band_tool_error() {
        let state = state();
        let res = call(
            &state,
            "tools/call",
            Some(json!({
                "name": "schedule_post",
                "arguments": {"text": "Hi", "time": "2025-09-30T12:00:00Z"},
            })),
        )
        .await;
        // The RPC layer reports success; the failure lives in the tool outcome.
        assert!(res.error.is_none());
        assert!(tool_is_error(&res));
        assert!(tool_text(&res).contains("future"));
    }

    #[tokio::test]
    async fn schedule_without_time_is_rejected() {
        let state = state();
        let res = call(
            &state,
            "tools/call",
            Some(json!({"name": "schedule_post", "arguments": {"text": "Hi"}})),
        )
        .await;
        assert!(tool_is_error(&res));
        assert!(tool_text(&res).contains("time is required"));
    }

    #[tokio::test]
    async fn timeline_defaults_to_twenty_rows() {
        let state = state();
        let res = call(
            &state,
            "tools/call",
            Some(json!({"name": "get_home_timeline", "arguments": {}})),
        )
        .await;
        assert_eq!(tool_text(&res).lines().count(), 20);
    }

    #[tokio::test]
    async fn search_finds_seeded_hashtags() {
        let state = state();
        let res = call(
            &state,
            "tools/call",
            Some(json!({"name": "search_posts", "arguments": {"q": "#rust", "limit": 5}})),
        )
        .await;
        assert!(!tool_is_error(&res));
        assert!(tool_text(&res).contains("#rust"));
    }

    #[tokio::test]
    async fn every_call_lands_in_the_audit_log() {
        let state = state();
        for _ in 0..3 {
            call(
                &state,
                "tools/call",
                Some(json!({"name": "echo_test", "arguments": {}})),
            )
            .await;
        }
        // A failing lookup is audited too.
        call(&state, "tools/call", Some(json!({"name": "nope"}))).await;
        assert_eq!(state.audit.count().unwrap(), 4);
    }
}
