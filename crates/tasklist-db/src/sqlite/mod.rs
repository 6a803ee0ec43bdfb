pub mod queries;

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;

use tasklist_core::attachment::Attachment;
use tasklist_core::task::{Task, UpdateTask};

use crate::{Database, DbConfig, DbError};

/// Extension trait that converts `rusqlite::Result<T>` into `Result<T, DbError>`.
pub(crate) trait SqliteResultExt<T> {
    fn to_db(self) -> Result<T, DbError>;
}

impl<T> SqliteResultExt<T> for rusqlite::Result<T> {
    fn to_db(self) -> Result<T, DbError> {
        self.map_err(map_sqlite_err)
    }
}

/// Single shared connection, opened once at startup and cloned into handlers.
#[derive(Clone)]
pub struct SqliteDatabase {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDatabase {
    pub fn open(config: &DbConfig) -> Result<Self, DbError> {
        let path = config
            .sqlite_path
            .clone()
            .unwrap_or_else(|| crate::data_dir().join("tasklist.db"));
        std::fs::create_dir_all(path.parent().unwrap_or(Path::new(".")))?;
        Self::open_path(&path)
    }

    pub fn open_path(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path).to_db()?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout=5000;",
        )
        .to_db()?;
        tracing::debug!("opened sqlite database at {}", path.display());
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory().to_db()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, DbError> {
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    pub(crate) fn with_conn<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Connection) -> Result<T, DbError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| DbError::Internal("lock poisoned".into()))?;
        f(&conn)
    }

    fn run_migrations(&self) -> Result<(), DbError> {
        self.with_conn(crate::migrations::run)
    }
}

/// Map a `rusqlite::Error` into a `DbError::Internal`.
pub(crate) fn map_sqlite_err(e: rusqlite::Error) -> DbError {
    DbError::Internal(e.to_string())
}

/// Map "no rows" to `NotFound` for the given entity, everything else to `Internal`.
pub(crate) fn not_found_or(
    what: impl FnOnce() -> String,
) -> impl FnOnce(rusqlite::Error) -> DbError {
    move |e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(what()),
        other => map_sqlite_err(other),
    }
}

fn join_err(e: tokio::task::JoinError) -> DbError {
    DbError::Internal(e.to_string())
}

#[async_trait]
impl Database for SqliteDatabase {
    // -- Tasks --
    async fn list_tasks(&self) -> Result<Vec<Task>, DbError> {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.list_tasks_sync())
            .await
            .map_err(join_err)?
    }
    async fn get_task(&self, id: &str) -> Result<Task, DbError> {
        let db = self.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || db.get_task_sync(&id))
            .await
            .map_err(join_err)?
    }
    async fn create_task(&self, title: &str, list_type: &str) -> Result<Task, DbError> {
        let db = self.clone();
        let title = title.to_string();
        let list_type = list_type.to_string();
        tokio::task::spawn_blocking(move || db.create_task_sync(&title, &list_type))
            .await
            .map_err(join_err)?
    }
    async fn update_task(&self, id: &str, update: &UpdateTask) -> Result<(), DbError> {
        let db = self.clone();
        let id = id.to_string();
        let update = update.clone();
        tokio::task::spawn_blocking(move || db.update_task_sync(&id, &update))
            .await
            .map_err(join_err)?
    }
    async fn delete_task(&self, id: &str) -> Result<(), DbError> {
        let db = self.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || db.delete_task_sync(&id))
            .await
            .map_err(join_err)?
    }

    // -- Attachments --
    async fn create_attachment(
        &self,
        task_id: &str,
        file_url: &str,
    ) -> Result<Attachment, DbError> {
        let db = self.clone();
        let task_id = task_id.to_string();
        let file_url = file_url.to_string();
        tokio::task::spawn_blocking(move || db.create_attachment_sync(&task_id, &file_url))
            .await
            .map_err(join_err)?
    }
    async fn list_attachments(&self, task_id: &str) -> Result<Vec<Attachment>, DbError> {
        let db = self.clone();
        let task_id = task_id.to_string();
        tokio::task::spawn_blocking(move || db.list_attachments_sync(&task_id))
            .await
            .map_err(join_err)?
    }
    async fn delete_attachment(
        &self,
        task_id: &str,
        attachment_id: &str,
    ) -> Result<Attachment, DbError> {
        let db = self.clone();
        let task_id = task_id.to_string();
        let attachment_id = attachment_id.to_string();
        tokio::task::spawn_blocking(move || db.delete_attachment_sync(&task_id, &attachment_id))
            .await
            .map_err(join_err)?
    }
    async fn delete_task_attachments(&self, task_id: &str) -> Result<Vec<Attachment>, DbError> {
        let db = self.clone();
        let task_id = task_id.to_string();
        tokio::task::spawn_blocking(move || db.delete_task_attachments_sync(&task_id))
            .await
            .map_err(join_err)?
    }
}
