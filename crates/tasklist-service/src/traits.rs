use async_trait::async_trait;
use bytes::Bytes;
use tasklist_core::attachment::Attachment;
use tasklist_core::task::{CreateTask, Task, UpdateTask};
use tasklist_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for ServiceError {
    fn from(e: CoreError) -> Self {
        ServiceError::InvalidInput(e.to_string())
    }
}

impl From<tasklist_db::DbError> for ServiceError {
    fn from(e: tasklist_db::DbError) -> Self {
        match e {
            tasklist_db::DbError::NotFound(msg) => ServiceError::NotFound(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<tasklist_store::StoreError> for ServiceError {
    fn from(e: tasklist_store::StoreError) -> Self {
        match e {
            tasklist_store::StoreError::NotFound(msg) => ServiceError::NotFound(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

/// One uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Name the client gave the file; only its extension is kept.
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Task and attachment operations.
///
/// `LocalService` owns the storage handles and the ordering rules between
/// rows and blobs. `HttpService` speaks the same contract over HTTP.
#[async_trait]
pub trait TaskService: Send + Sync {
    // -- Tasks --
    async fn list_tasks(&self) -> Result<Vec<Task>, ServiceError>;
    async fn get_task(&self, id: &str) -> Result<Task, ServiceError>;
    async fn create_task(&self, input: &CreateTask) -> Result<Task, ServiceError>;
    async fn update_task(&self, id: &str, update: &UpdateTask) -> Result<(), ServiceError>;
    async fn delete_task(&self, id: &str) -> Result<(), ServiceError>;

    // -- Attachments --
    async fn upload_attachment(
        &self,
        task_id: &str,
        file: UploadFile,
    ) -> Result<Attachment, ServiceError>;
    async fn list_attachments(&self, task_id: &str) -> Result<Vec<Attachment>, ServiceError>;
    async fn delete_attachment(
        &self,
        task_id: &str,
        attachment_id: &str,
    ) -> Result<(), ServiceError>;
}
