// Backend-agnostic integration tests for the Database trait.
//
// Each public async function accepts `&dyn Database` so the same assertions
// can run against any storage backend.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tasklist_core::task::UpdateTask;
use tasklist_db::{Database, DbError};

// ---------------------------------------------------------------------------
// Task tests
// ---------------------------------------------------------------------------

/// Create, get, patch, delete.
pub async fn test_task_crud(db: &dyn Database) {
    let task = db.create_task("Buy milk", "Personal").await.unwrap();
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.list_type, "Personal");
    assert!(!task.completed);
    assert!(!task.priority);
    assert_eq!(task.notes, "");
    assert!(task.reminder_date.is_none());
    assert!(task.reminder_time.is_none());

    let fetched = db.get_task(&task.id).await.unwrap();
    assert_eq!(fetched.id, task.id);

    let all = db.list_tasks().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], task);

    db.update_task(
        &task.id,
        &UpdateTask {
            completed: Some(Some(true)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let after = db.get_task(&task.id).await.unwrap();
    assert!(after.completed);
    assert_eq!(after.title, "Buy milk");

    db.delete_task(&task.id).await.unwrap();
    assert!(matches!(
        db.get_task(&task.id).await,
        Err(DbError::NotFound(_))
    ));
}

/// Listing is newest first.
pub async fn test_task_ordering(db: &dyn Database) {
    let mut created = Vec::new();
    for i in 0..5 {
        created.push(db.create_task(&format!("task {i}"), "Work").await.unwrap().id);
    }
    created.reverse();
    let listed: Vec<String> = db
        .list_tasks()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(listed, created);
}

/// Fields not in the patch stay put; present fields, including nulls, land exactly.
pub async fn test_sparse_patch(db: &dyn Database) {
    let task = db.create_task("Dentist", "Personal").await.unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 11, 2).unwrap();
    let time = NaiveTime::from_hms_opt(8, 15, 0).unwrap();

    db.update_task(
        &task.id,
        &UpdateTask {
            reminder_date: Some(Some(date)),
            reminder_time: Some(Some(time)),
            notes: Some(Some("bring insurance card".into())),
            priority: Some(Some(true)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let t = db.get_task(&task.id).await.unwrap();
    assert_eq!(t.title, "Dentist");
    assert_eq!(t.list_type, "Personal");
    assert!(!t.completed);
    assert!(t.priority);
    assert_eq!(t.notes, "bring insurance card");
    assert_eq!(t.reminder_date, Some(date));
    assert_eq!(t.reminder_time, Some(time));

    db.update_task(
        &task.id,
        &UpdateTask {
            reminder_date: Some(None),
            reminder_time: Some(None),
            list_type: Some(Some("Work".into())),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let t = db.get_task(&task.id).await.unwrap();
    assert_eq!(t.reminder_date, None);
    assert_eq!(t.reminder_time, None);
    assert_eq!(t.list_type, "Work");
    assert_eq!(t.notes, "bring insurance card");
    assert!(t.priority);
}

/// An empty patch succeeds without touching the row and still reports missing tasks.
pub async fn test_empty_patch(db: &dyn Database) {
    let task = db.create_task("Stable", "Personal").await.unwrap();
    db.update_task(&task.id, &UpdateTask::default()).await.unwrap();
    assert_eq!(db.get_task(&task.id).await.unwrap(), task);

    assert!(matches!(
        db.update_task("no-such-task", &UpdateTask::default()).await,
        Err(DbError::NotFound(_))
    ));
}

pub async fn test_double_delete(db: &dyn Database) {
    let task = db.create_task("Once", "Personal").await.unwrap();
    db.delete_task(&task.id).await.unwrap();
    assert!(matches!(
        db.delete_task(&task.id).await,
        Err(DbError::NotFound(_))
    ));
}

// ---------------------------------------------------------------------------
// Attachment tests
// ---------------------------------------------------------------------------

pub async fn test_attachments(db: &dyn Database) {
    let task = db.create_task("Photos", "Personal").await.unwrap();
    assert!(db.list_attachments(&task.id).await.unwrap().is_empty());

    let a = db
        .create_attachment(&task.id, "/uploads/1700000000000-a.png")
        .await
        .unwrap();
    let b = db
        .create_attachment(&task.id, "/uploads/1700000000001-b.jpg")
        .await
        .unwrap();

    let listed = db.list_attachments(&task.id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, a.id);
    assert_eq!(listed[1].id, b.id);

    let removed = db.delete_attachment(&task.id, &a.id).await.unwrap();
    assert_eq!(removed.file_url, "/uploads/1700000000000-a.png");
    assert!(matches!(
        db.delete_attachment(&task.id, &a.id).await,
        Err(DbError::NotFound(_))
    ));

    let purged = db.delete_task_attachments(&task.id).await.unwrap();
    assert_eq!(purged.len(), 1);
    assert_eq!(purged[0].id, b.id);
    assert!(db.list_attachments(&task.id).await.unwrap().is_empty());
}

pub async fn test_attachment_compound_key(db: &dyn Database) {
    let mine = db.create_task("mine", "Personal").await.unwrap();
    let theirs = db.create_task("theirs", "Personal").await.unwrap();
    let att = db
        .create_attachment(&mine.id, "/uploads/mine.png")
        .await
        .unwrap();

    assert!(matches!(
        db.delete_attachment(&theirs.id, &att.id).await,
        Err(DbError::NotFound(_))
    ));
    assert_eq!(db.list_attachments(&mine.id).await.unwrap(), vec![att]);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

/// Two patches racing on different fields of the same task both land.
pub async fn test_concurrent_disjoint_patches(db: Arc<dyn Database>) {
    let task = db.create_task("Race", "Personal").await.unwrap();

    let db1 = db.clone();
    let id1 = task.id.clone();
    let first = tokio::spawn(async move {
        db1.update_task(
            &id1,
            &UpdateTask {
                completed: Some(Some(true)),
                ..Default::default()
            },
        )
        .await
    });
    let db2 = db.clone();
    let id2 = task.id.clone();
    let second = tokio::spawn(async move {
        db2.update_task(
            &id2,
            &UpdateTask {
                notes: Some(Some("from the other tab".into())),
                ..Default::default()
            },
        )
        .await
    });
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let t = db.get_task(&task.id).await.unwrap();
    assert!(t.completed);
    assert_eq!(t.notes, "from the other tab");
}
