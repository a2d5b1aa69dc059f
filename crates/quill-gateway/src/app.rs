use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::audit::AuditLog;
use crate::tools::ToolRegistry;

/// Shared state for the HTTP handlers.
pub struct AppState {
    pub registry: ToolRegistry,
    pub audit: AuditLog,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/mcp", post(crate::rpc::handle_http))
        .route("/healthz", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
