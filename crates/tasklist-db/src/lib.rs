mod migrations;
pub mod sqlite;

pub use sqlite::SqliteDatabase;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use tasklist_core::attachment::Attachment;
use tasklist_core::task::{Task, UpdateTask};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Internal(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage configuration.
#[derive(Debug, Clone, Default)]
pub struct DbConfig {
    /// SQLite database file. Defaults to `<data_dir>/tasklist.db`.
    pub sqlite_path: Option<PathBuf>,
}

/// Relational storage for tasks and their attachment rows.
///
/// Attachment rows reference tasks by `task_id` only; deleting a task never
/// touches its attachments at this layer.
#[async_trait]
pub trait Database: Send + Sync {
    // -- Tasks --

    /// All tasks, newest first.
    async fn list_tasks(&self) -> Result<Vec<Task>, DbError>;
    async fn get_task(&self, id: &str) -> Result<Task, DbError>;
    async fn create_task(&self, title: &str, list_type: &str) -> Result<Task, DbError>;
    /// Apply only the fields present in `update`. An empty patch issues no
    /// write and only checks that the task exists.
    async fn update_task(&self, id: &str, update: &UpdateTask) -> Result<(), DbError>;
    async fn delete_task(&self, id: &str) -> Result<(), DbError>;

    // -- Attachments --
    async fn create_attachment(&self, task_id: &str, file_url: &str)
        -> Result<Attachment, DbError>;
    async fn list_attachments(&self, task_id: &str) -> Result<Vec<Attachment>, DbError>;
    /// Delete the row matching both ids and return it.
    async fn delete_attachment(
        &self,
        task_id: &str,
        attachment_id: &str,
    ) -> Result<Attachment, DbError>;
    /// Delete every attachment row of a task and return the removed rows.
    async fn delete_task_attachments(&self, task_id: &str) -> Result<Vec<Attachment>, DbError>;
}

/// Default directory for persistent data.
pub fn data_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local/share")
    } else {
        PathBuf::from(".")
    };
    base.join("tasklist")
}
