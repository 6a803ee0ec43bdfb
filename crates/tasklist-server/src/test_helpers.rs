use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tasklist_service::LocalService;
use tasklist_store::StoreConfig;
use tokio::net::TcpListener;

use crate::config::DEFAULT_MAX_UPLOAD_BYTES;
use crate::routes::{AppState, InnerAppState};

/// App state over in-memory SQLite and a fresh temp uploads directory.
pub fn test_state() -> AppState {
    build_state(false)
}

/// Same as [`test_state`], with task deletion cascading to attachments.
pub fn cascading_test_state() -> AppState {
    build_state(true)
}

fn build_state(cascade_attachments: bool) -> AppState {
    let db = Arc::new(tasklist_db::SqliteDatabase::open_in_memory().unwrap());
    let uploads_dir = tempfile::tempdir().unwrap().keep();
    let store = tasklist_store::create_store(&StoreConfig {
        uploads_dir: uploads_dir.clone(),
    })
    .unwrap();
    let service = LocalService::new(db, store).with_cascade_attachments(cascade_attachments);
    Arc::new(InnerAppState {
        service,
        uploads_dir,
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
    })
}

/// Build a test router over [`test_state`].
pub async fn test_router() -> Router {
    crate::routes::build_router(test_state())
}

/// A running test server with base_url and background task handle.
pub struct TestServer {
    pub base_url: String,
    pub uploads_dir: PathBuf,
    _handle: tokio::task::JoinHandle<()>,
}

/// Spawn an axum test server on a random port. Returns the TestServer
/// with the `base_url` (e.g. "http://127.0.0.1:12345").
pub async fn spawn_test_server() -> TestServer {
    spawn_with_state(test_state()).await
}

pub async fn spawn_cascading_test_server() -> TestServer {
    spawn_with_state(cascading_test_state()).await
}

async fn spawn_with_state(state: AppState) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let uploads_dir = state.uploads_dir.clone();
    let app = crate::routes::build_router(state);
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base_url,
        uploads_dir,
        _handle: handle,
    }
}
