use std::sync::Arc;

use async_trait::async_trait;
use tasklist_core::attachment::{check_content_type, Attachment, ImageType};
use tasklist_core::task::{CreateTask, Task, UpdateTask};
use tasklist_db::Database;
use tasklist_store::{blob_name, file_url, key_from_file_url, ObjectStore, StoreError};
use tracing::{error, info, warn};

use crate::{ServiceError, TaskService, UploadFile};

/// Generated names collide only if two uploads share a millisecond and a
/// random suffix; a couple of retries is plenty.
const MAX_NAME_ATTEMPTS: usize = 3;

/// Local implementation backed by the database and blob store directly.
#[derive(Clone)]
pub struct LocalService {
    db: Arc<dyn Database>,
    store: Arc<dyn ObjectStore>,
    cascade_attachments: bool,
}

impl LocalService {
    pub fn new(db: Arc<dyn Database>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            db,
            store,
            cascade_attachments: false,
        }
    }

    /// When enabled, deleting a task also removes its attachment rows and blobs.
    pub fn with_cascade_attachments(mut self, enabled: bool) -> Self {
        self.cascade_attachments = enabled;
        self
    }

    /// Write the blob under a fresh name whose extension matches `image`
    /// and return that name.
    async fn put_blob(&self, file: &UploadFile, image: ImageType) -> Result<String, ServiceError> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let key = blob_name(&file.file_name, image.extensions());
            match self.store.put(&key, file.data.clone()).await {
                Ok(()) => return Ok(key),
                Err(StoreError::AlreadyExists(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(ServiceError::Internal(
            "could not allocate a unique upload name".into(),
        ))
    }

    /// Best-effort blob removal. A blob that cannot be removed is logged and
    /// left behind; the row it belonged to is already gone.
    async fn discard_blob(&self, attachment: &Attachment) {
        let Some(key) = key_from_file_url(&attachment.file_url) else {
            warn!(
                "attachment {} has file_url {:?} outside the upload area, leaving it",
                attachment.id, attachment.file_url
            );
            return;
        };
        match self.store.delete(key).await {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => {
                warn!("blob {key} for attachment {} was already missing", attachment.id)
            }
            Err(e) => warn!("failed to remove blob {key} for attachment {}: {e}", attachment.id),
        }
    }
}

#[async_trait]
impl TaskService for LocalService {
    async fn list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        Ok(self.db.list_tasks().await?)
    }

    async fn get_task(&self, id: &str) -> Result<Task, ServiceError> {
        Ok(self.db.get_task(id).await?)
    }

    async fn create_task(&self, input: &CreateTask) -> Result<Task, ServiceError> {
        let (title, list_type) = input.resolve()?;
        let task = self.db.create_task(title, list_type).await?;
        info!("created task {} in {}", task.id, task.list_type);
        Ok(task)
    }

    async fn update_task(&self, id: &str, update: &UpdateTask) -> Result<(), ServiceError> {
        update.validate()?;
        Ok(self.db.update_task(id, update).await?)
    }

    async fn delete_task(&self, id: &str) -> Result<(), ServiceError> {
        self.db.delete_task(id).await?;
        info!("deleted task {id}");

        if self.cascade_attachments {
            // The task is gone either way; a failed purge only leaves orphans.
            match self.db.delete_task_attachments(id).await {
                Ok(removed) => {
                    for attachment in &removed {
                        self.discard_blob(attachment).await;
                    }
                    if !removed.is_empty() {
                        info!("removed {} attachment(s) of task {id}", removed.len());
                    }
                }
                Err(e) => error!("failed to remove attachments of deleted task {id}: {e}"),
            }
        }
        Ok(())
    }

    async fn upload_attachment(
        &self,
        task_id: &str,
        file: UploadFile,
    ) -> Result<Attachment, ServiceError> {
        let image = check_content_type(&file.content_type)?;
        self.db.get_task(task_id).await?;

        // Blob first, row second: a row must never point at a missing file.
        let key = self.put_blob(&file, image).await?;
        let url = file_url(&key);
        match self.db.create_attachment(task_id, &url).await {
            Ok(attachment) => {
                info!(
                    "stored attachment {} for task {task_id} ({} bytes)",
                    attachment.id,
                    file.data.len()
                );
                Ok(attachment)
            }
            Err(e) => {
                if let Err(cleanup) = self.store.delete(&key).await {
                    warn!("failed to remove unrecorded blob {key}: {cleanup}");
                }
                Err(e.into())
            }
        }
    }

    async fn list_attachments(&self, task_id: &str) -> Result<Vec<Attachment>, ServiceError> {
        Ok(self.db.list_attachments(task_id).await?)
    }

    async fn delete_attachment(
        &self,
        task_id: &str,
        attachment_id: &str,
    ) -> Result<(), ServiceError> {
        // Row first, then blob: a leftover blob is harmless, a row pointing
        // at nothing is not.
        let attachment = self.db.delete_attachment(task_id, attachment_id).await?;
        self.discard_blob(&attachment).await;
        info!("deleted attachment {attachment_id} of task {task_id}");
        Ok(())
    }
}
