use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use quill_analytics::AnalyticsService;
use quill_client::{FakePlatformClient, PlatformClient, TimelineService};
use quill_core::QuillConfig;
use quill_scheduler::{PublisherRunner, SchedulingService, SqlitePostStore, SystemClock};
use quill_search::SearchService;
use tracing::{info, warn};

mod app;
mod audit;
mod rpc;
mod tools;

#[derive(Parser)]
#[command(name = "quill-gateway", about = "Quill social posting gateway")]
struct Args {
    /// Path to quill.toml (default: ~/.quill/quill.toml).
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill_gateway=info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();
    let config = QuillConfig::load(args.config.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        QuillConfig::default()
    });

    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = rusqlite::Connection::open(db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    // run all schema migrations (idempotent)
    quill_scheduler::db::init_db(&db)?;
    audit::init_db(&db)?;
    info!("database migrations complete");

    if !config.platform.fake {
        warn!("no real platform client ships in this build; using the fake client");
    }
    let client: Arc<dyn PlatformClient> = Arc::new(FakePlatformClient::new());

    // build subsystems — each store gets its own connection for thread safety
    let store = Arc::new(SqlitePostStore::new(rusqlite::Connection::open(db_path)?)?);
    let scheduling = Arc::new(SchedulingService::new(
        store,
        client.clone(),
        Arc::new(SystemClock),
        config.publisher.batch_size,
    ));
    let timeline = Arc::new(TimelineService::new(client.clone()));
    let search = Arc::new(SearchService::new(client.clone()));
    let analytics = Arc::new(AnalyticsService::new(client));

    let registry = tools::build_registry(
        scheduling.clone(),
        timeline,
        search,
        analytics,
        &config.platform.default_account,
    );
    let audit_log = audit::AuditLog::new(rusqlite::Connection::open(db_path)?)?;

    let state = Arc::new(app::AppState {
        registry,
        audit: audit_log,
    });
    let router = app::build_router(state);

    // spawn the publisher loop in the background; it runs one tick at a time
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let runner = PublisherRunner::new(
        scheduling,
        Duration::from_millis(config.publisher.interval_ms),
    );
    tokio::spawn(async move { runner.run(shutdown_rx).await });

    let addr: SocketAddr = format!("{}:{}", config.gateway.bind, config.gateway.port).parse()?;
    info!("Quill gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    // signal the publisher loop to stop
    let _ = shutdown_tx.send(true);
    Ok(())
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
