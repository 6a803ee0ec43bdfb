use rusqlite::Connection;

use crate::sqlite::SqliteResultExt;
use crate::DbError;

pub fn run(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )
    .to_db()?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )
        .to_db()?;

    if current_version < 1 {
        // task_attachment.task_id is deliberately not a declared foreign key:
        // deleting a task must succeed while its attachment rows remain.
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS task (
                id            TEXT PRIMARY KEY,
                title         TEXT NOT NULL,
                list_type     TEXT NOT NULL DEFAULT 'Personal',
                completed     INTEGER NOT NULL DEFAULT 0,
                priority      INTEGER NOT NULL DEFAULT 0,
                notes         TEXT DEFAULT '',
                reminder_date TEXT,
                reminder_time TEXT,
                due_date      TEXT,
                created_at    TEXT NOT NULL,
                updated_at    TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_task_created ON task(created_at);

            CREATE TABLE IF NOT EXISTS task_attachment (
                id          TEXT PRIMARY KEY,
                task_id     TEXT NOT NULL,
                file_url    TEXT NOT NULL UNIQUE,
                created_at  TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_task_attachment_task
                ON task_attachment(task_id);",
        )
        .to_db()?;

        conn.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (1, datetime('now'))",
            [],
        )
        .to_db()?;
        tracing::info!("applied schema migration v1");
    }

    Ok(())
}
