use clap::Parser;
use clockins_core::{Clock, ClockinsConfig, SystemClock};
use clockins_query::QueryService;
use clockins_reconciler::Reconciler;
use clockins_store::ShiftStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

mod app;
mod http;
mod presence;

use presence::PresenceRegistry;

/// Shift clock-in tracker: reconciles player job state into shift rows and
/// serves hours and leaderboard reports.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to clockins.toml (falls back to CLOCKINS_CONFIG, then ~/.clockins/clockins.toml).
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "clockins_gateway=info,clockins_reconciler=info,tower_http=debug".into()
            }),
        )
        .init();

    let cli = Cli::parse();

    // load config: --config > CLOCKINS_CONFIG env > ~/.clockins/clockins.toml
    let config_path = cli.config.or_else(|| std::env::var("CLOCKINS_CONFIG").ok());
    let config = ClockinsConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!(code = e.code(), "Config load failed ({}), using defaults", e);
        ClockinsConfig::default()
    });

    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, table = %config.database.table, "opening SQLite database");

    let db = rusqlite::Connection::open(db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL;")?;

    // schema bootstrap is idempotent; the query service shares this connection
    let store = Arc::new(ShiftStore::new(db, &config.database.table)?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let queries = QueryService::new(
        store.connection(),
        store.table(),
        &config.shifts,
        Arc::clone(&clock),
    )?;

    let registry = Arc::new(PresenceRegistry::new());
    let reconciler = Arc::new(Reconciler::new(
        registry.clone(),
        Arc::clone(&store),
        clock,
        &config.shifts,
        &config.reconciler,
    ));

    let addr: SocketAddr = format!("{}:{}", config.gateway.bind, config.gateway.port).parse()?;
    let state = Arc::new(app::AppState::new(
        config,
        registry,
        store,
        queries,
        Arc::clone(&reconciler),
    ));
    let router = app::build_router(state);

    // reconciler loop in background: restart clock-out, then poll every interval
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let engine = tokio::spawn(reconciler.run(shutdown_rx));

    info!("Clock-in tracker listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // signal reconciler to stop and wait for the in-flight tick
    let _ = shutdown_tx.send(true);
    if let Err(e) = engine.await {
        warn!("reconciler task ended abnormally: {e}");
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!(path = %parent.display(), "could not create database directory: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_dir_is_created_for_database_path() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested/state/clockins.db");
        ensure_parent_dir(db.to_str().unwrap());
        assert!(dir.path().join("nested/state").is_dir());
    }

    #[test]
    fn uncreatable_parent_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, b"").unwrap();
        // parent path runs through a regular file
        ensure_parent_dir(file.join("sub/clockins.db").to_str().unwrap());
        assert!(file.is_file());
    }
}
