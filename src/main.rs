//! Listsync daemon - headless sync session for shared lists

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use listsync::{config::Args, logging, notify::TracingNotifier, SyncSession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    logging::init(&args.log_level);

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Listsync - shared list sync engine");
    info!("======================================");
    info!("Session ID: {}", args.session_id);
    info!("Server: {}", args.api_url);
    info!("View: {:?}", args.view());
    info!("Poll interval: {}ms", args.poll_interval_ms);
    info!("======================================");

    let notifier = Arc::new(TracingNotifier);
    let session = SyncSession::start(&args, notifier).await?;

    let mut updates = session.subscribe();
    let watcher = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            info!(
                pending = snapshot.pending.len(),
                incomplete = snapshot.incomplete.len(),
                completed = snapshot.completed.len(),
                "collections updated"
            );
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    session.shutdown().await;
    watcher.abort();

    Ok(())
}
