use chrono::Utc;
use rusqlite::{params, Row};

use tasklist_core::attachment::Attachment;

use super::super::{not_found_or, SqliteDatabase, SqliteResultExt};
use crate::DbError;

fn row_to_attachment(row: &Row) -> rusqlite::Result<Attachment> {
    Ok(Attachment {
        id: row.get("id")?,
        task_id: row.get("task_id")?,
        file_url: row.get("file_url")?,
        created_at: row.get("created_at")?,
    })
}

impl SqliteDatabase {
    pub fn create_attachment_sync(
        &self,
        task_id: &str,
        file_url: &str,
    ) -> Result<Attachment, DbError> {
        self.with_conn(|conn| {
            let id = uuid::Uuid::new_v4().to_string();
            let now = Utc::now();
            conn.execute(
                "INSERT INTO task_attachment (id, task_id, file_url, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![id, task_id, file_url, now],
            )
            .to_db()?;
            conn.query_row(
                "SELECT * FROM task_attachment WHERE id = ?1",
                params![id],
                row_to_attachment,
            )
            .to_db()
        })
    }

    /// Attachments of a task in upload order.
    pub fn list_attachments_sync(&self, task_id: &str) -> Result<Vec<Attachment>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT * FROM task_attachment WHERE task_id = ?1
                     ORDER BY created_at ASC, rowid ASC",
                )
                .to_db()?;
            let attachments = stmt
                .query_map(params![task_id], row_to_attachment)
                .to_db()?
                .collect::<Result<Vec<_>, _>>()
                .to_db()?;
            Ok(attachments)
        })
    }

    pub fn delete_attachment_sync(
        &self,
        task_id: &str,
        attachment_id: &str,
    ) -> Result<Attachment, DbError> {
        self.with_conn(|conn| {
            let attachment = conn
                .query_row(
                    "SELECT * FROM task_attachment WHERE id = ?1 AND task_id = ?2",
                    params![attachment_id, task_id],
                    row_to_attachment,
                )
                .map_err(not_found_or(|| {
                    format!("attachment {attachment_id} of task {task_id}")
                }))?;
            conn.execute(
                "DELETE FROM task_attachment WHERE id = ?1 AND task_id = ?2",
                params![attachment_id, task_id],
            )
            .to_db()?;
            Ok(attachment)
        })
    }

    pub fn delete_task_attachments_sync(&self, task_id: &str) -> Result<Vec<Attachment>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM task_attachment WHERE task_id = ?1")
                .to_db()?;
            let attachments = stmt
                .query_map(params![task_id], row_to_attachment)
                .to_db()?
                .collect::<Result<Vec<_>, _>>()
                .to_db()?;
            conn.execute(
                "DELETE FROM task_attachment WHERE task_id = ?1",
                params![task_id],
            )
            .to_db()?;
            Ok(attachments)
        })
    }
}
