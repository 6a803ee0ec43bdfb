use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use tasklist_db::SqliteDatabase;
use tasklist_server::config::ServerConfig;
use tasklist_server::InnerAppState;
use tasklist_service::LocalService;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::parse();

    let db = Arc::new(SqliteDatabase::open(&config.db_config())?);
    let store = tasklist_store::create_store(&config.store_config())?;
    let service =
        LocalService::new(db, store).with_cascade_attachments(config.cascade_attachments);

    let state = Arc::new(InnerAppState {
        service,
        uploads_dir: config.uploads_dir.clone(),
        max_upload_bytes: config.max_upload_bytes,
    });

    let addr = config.addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        uploads = %config.uploads_dir.display(),
        cascade_attachments = config.cascade_attachments,
        "tasklist-server listening on http://{addr}"
    );

    tasklist_server::serve(listener, state).await
}
