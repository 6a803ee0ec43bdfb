use chrono::Utc;
use rusqlite::{params, Row};

use tasklist_core::task::{Task, UpdateTask};

use super::super::{not_found_or, SqliteDatabase, SqliteResultExt};
use crate::DbError;

fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    let notes: Option<String> = row.get("notes")?;
    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        list_type: row.get("list_type")?,
        completed: row.get("completed")?,
        priority: row.get("priority")?,
        notes: notes.unwrap_or_default(),
        reminder_date: row.get("reminder_date")?,
        reminder_time: row.get("reminder_time")?,
        due_date: row.get("due_date")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

impl SqliteDatabase {
    pub fn list_tasks_sync(&self) -> Result<Vec<Task>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM task ORDER BY created_at DESC, rowid DESC")
                .to_db()?;
            let tasks = stmt
                .query_map([], row_to_task)
                .to_db()?
                .collect::<Result<Vec<_>, _>>()
                .to_db()?;
            Ok(tasks)
        })
    }

    pub fn get_task_sync(&self, id: &str) -> Result<Task, DbError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT * FROM task WHERE id = ?1", params![id], row_to_task)
                .map_err(not_found_or(|| format!("task {id}")))
        })
    }

    pub fn create_task_sync(&self, title: &str, list_type: &str) -> Result<Task, DbError> {
        self.with_conn(|conn| {
            let id = uuid::Uuid::new_v4().to_string();
            let now = Utc::now();
            conn.execute(
                "INSERT INTO task
                     (id, title, list_type, completed, priority, notes, created_at, updated_at)
                 VALUES (?1, ?2, ?3, 0, 0, '', ?4, ?5)",
                params![id, title, list_type, now, now],
            )
            .to_db()?;

            conn.query_row("SELECT * FROM task WHERE id = ?1", params![id], row_to_task)
                .to_db()
        })
    }

    pub fn update_task_sync(&self, id: &str, update: &UpdateTask) -> Result<(), DbError> {
        self.with_conn(|conn| {
            if update.is_empty() {
                let exists: bool = conn
                    .query_row(
                        "SELECT EXISTS(SELECT 1 FROM task WHERE id = ?1)",
                        params![id],
                        |row| row.get(0),
                    )
                    .to_db()?;
                return if exists {
                    Ok(())
                } else {
                    Err(DbError::NotFound(format!("task {id}")))
                };
            }

            let now = Utc::now();
            let mut sets = vec!["updated_at = ?1".to_string()];
            let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(now)];

            if let Some(completed) = update.completed {
                param_values.push(Box::new(completed));
                sets.push(format!("completed = ?{}", param_values.len()));
            }
            if let Some(reminder_date) = update.reminder_date {
                param_values.push(Box::new(reminder_date));
                sets.push(format!("reminder_date = ?{}", param_values.len()));
            }
            if let Some(reminder_time) = update.reminder_time {
                param_values.push(Box::new(reminder_time));
                sets.push(format!("reminder_time = ?{}", param_values.len()));
            }
            if let Some(ref title) = update.title {
                param_values.push(Box::new(title.clone()));
                sets.push(format!("title = ?{}", param_values.len()));
            }
            if let Some(ref notes) = update.notes {
                param_values.push(Box::new(notes.clone()));
                sets.push(format!("notes = ?{}", param_values.len()));
            }
            if let Some(priority) = update.priority {
                param_values.push(Box::new(priority));
                sets.push(format!("priority = ?{}", param_values.len()));
            }
            if let Some(ref list_type) = update.list_type {
                param_values.push(Box::new(list_type.clone()));
                sets.push(format!("list_type = ?{}", param_values.len()));
            }
            if let Some(due_date) = update.due_date {
                param_values.push(Box::new(due_date));
                sets.push(format!("due_date = ?{}", param_values.len()));
            }

            param_values.push(Box::new(id.to_string()));
            let id_param = param_values.len();

            let sql = format!(
                "UPDATE task SET {} WHERE id = ?{}",
                sets.join(", "),
                id_param
            );

            let params_ref: Vec<&dyn rusqlite::types::ToSql> =
                param_values.iter().map(|p| p.as_ref()).collect();

            let changed = conn.execute(&sql, params_ref.as_slice()).to_db()?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("task {id}")));
            }
            Ok(())
        })
    }

    pub fn delete_task_sync(&self, id: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            let changed = conn
                .execute("DELETE FROM task WHERE id = ?1", params![id])
                .to_db()?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("task {id}")));
            }
            Ok(())
        })
    }
}
