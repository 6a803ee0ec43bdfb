//! Integration tests for HttpService against a real server.
//!
//! Each test spawns an in-process axum server on 127.0.0.1:0 with in-memory SQLite
//! and a temp uploads directory, then exercises the HTTP client layer through the
//! full request/response cycle.

use bytes::Bytes;
use tasklist_core::task::{CreateTask, UpdateTask};
use tasklist_server::test_helpers::{spawn_cascading_test_server, spawn_test_server, TestServer};
use tasklist_service::{HttpService, ServiceError, TaskService, UploadFile};

fn png(name: &str) -> UploadFile {
    UploadFile {
        file_name: name.into(),
        content_type: "image/png".into(),
        data: Bytes::from_static(b"\x89PNG\r\n\x1a\nfake image body"),
    }
}

fn blob_count(server: &TestServer) -> usize {
    std::fs::read_dir(&server.uploads_dir).unwrap().count()
}

#[tokio::test]
async fn health_check_via_http() {
    let server = spawn_test_server().await;
    let svc = HttpService::new(&server.base_url);
    svc.health_check().await.unwrap();
}

#[tokio::test]
async fn task_crud_via_http() {
    let server = spawn_test_server().await;
    let svc = HttpService::new(&server.base_url);

    let task = svc.create_task(&CreateTask::new("Buy milk")).await.unwrap();
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.list_type, "Personal");
    assert!(!task.completed);

    svc.update_task(
        &task.id,
        &UpdateTask {
            completed: Some(Some(true)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let all = svc.list_tasks().await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].completed);
    assert_eq!(all[0].title, "Buy milk");

    svc.delete_task(&task.id).await.unwrap();
    assert!(svc.list_tasks().await.unwrap().is_empty());
    assert!(matches!(
        svc.delete_task(&task.id).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn list_is_newest_first() {
    let server = spawn_test_server().await;
    let svc = HttpService::new(&server.base_url);

    let first = svc.create_task(&CreateTask::new("first")).await.unwrap();
    let second = svc
        .create_task(&CreateTask::new("second").with_list_type("Work"))
        .await
        .unwrap();

    let ids: Vec<String> = svc
        .list_tasks()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn patch_moves_task_between_lists() {
    let server = spawn_test_server().await;
    let svc = HttpService::new(&server.base_url);

    let task = svc.create_task(&CreateTask::new("Report")).await.unwrap();
    svc.update_task(
        &task.id,
        &UpdateTask {
            list_type: Some(Some("Work".into())),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let t = svc.get_task(&task.id).await.unwrap();
    assert_eq!(t.list_type, "Work");
    assert_eq!(t.title, "Report");
}

#[tokio::test]
async fn validation_errors_via_http() {
    let server = spawn_test_server().await;
    let svc = HttpService::new(&server.base_url);

    assert!(matches!(
        svc.create_task(&CreateTask::default()).await,
        Err(ServiceError::InvalidInput(_))
    ));

    let task = svc.create_task(&CreateTask::new("x")).await.unwrap();
    assert!(matches!(
        svc.update_task(
            &task.id,
            &UpdateTask {
                completed: Some(None),
                ..Default::default()
            },
        )
        .await,
        Err(ServiceError::InvalidInput(_))
    ));
    assert!(matches!(
        svc.get_task("missing").await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn attachment_lifecycle_via_http() {
    let server = spawn_test_server().await;
    let svc = HttpService::new(&server.base_url);
    let task = svc.create_task(&CreateTask::new("Photos")).await.unwrap();

    let att = svc.upload_attachment(&task.id, png("cat.png")).await.unwrap();
    assert_eq!(att.task_id, task.id);
    assert!(att.file_url.starts_with("/uploads/"));

    let bytes = svc.fetch_upload(&att.file_url).await.unwrap();
    assert_eq!(&bytes[..], b"\x89PNG\r\n\x1a\nfake image body");

    let listed = svc.list_attachments(&task.id).await.unwrap();
    assert_eq!(listed, vec![att.clone()]);

    svc.delete_attachment(&task.id, &att.id).await.unwrap();
    assert!(svc.list_attachments(&task.id).await.unwrap().is_empty());
    assert!(matches!(
        svc.fetch_upload(&att.file_url).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        svc.delete_attachment(&task.id, &att.id).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn disallowed_type_leaves_nothing_behind() {
    let server = spawn_test_server().await;
    let svc = HttpService::new(&server.base_url);
    let task = svc.create_task(&CreateTask::new("Notes")).await.unwrap();

    let txt = UploadFile {
        file_name: "notes.txt".into(),
        content_type: "text/plain".into(),
        data: Bytes::from_static(b"plain text"),
    };
    assert!(matches!(
        svc.upload_attachment(&task.id, txt).await,
        Err(ServiceError::InvalidInput(_))
    ));
    assert!(svc.list_attachments(&task.id).await.unwrap().is_empty());
    assert_eq!(blob_count(&server), 0);
}

#[tokio::test]
async fn concurrent_uploads_get_distinct_names() {
    let server = spawn_test_server().await;
    let svc = HttpService::new(&server.base_url);
    let task = svc.create_task(&CreateTask::new("Burst")).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let svc = svc.clone();
        let task_id = task.id.clone();
        handles.push(tokio::spawn(async move {
            svc.upload_attachment(&task_id, png("same.png")).await
        }));
    }
    let mut urls = Vec::new();
    for h in handles {
        urls.push(h.await.unwrap().unwrap().file_url);
    }
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 8);
    assert_eq!(blob_count(&server), 8);
}

#[tokio::test]
async fn mismatched_pair_keeps_other_tasks_blob() {
    let server = spawn_test_server().await;
    let svc = HttpService::new(&server.base_url);
    let owner = svc.create_task(&CreateTask::new("owner")).await.unwrap();
    let other = svc.create_task(&CreateTask::new("other")).await.unwrap();
    let att = svc.upload_attachment(&owner.id, png("mine.gif")).await.unwrap();

    assert!(matches!(
        svc.delete_attachment(&other.id, &att.id).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(svc.fetch_upload(&att.file_url).await.is_ok());
    assert_eq!(svc.list_attachments(&owner.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn task_delete_does_not_cascade_by_default() {
    let server = spawn_test_server().await;
    let svc = HttpService::new(&server.base_url);
    let task = svc.create_task(&CreateTask::new("Orphans")).await.unwrap();
    let att = svc.upload_attachment(&task.id, png("o.png")).await.unwrap();

    svc.delete_task(&task.id).await.unwrap();
    assert_eq!(svc.list_attachments(&task.id).await.unwrap(), vec![att.clone()]);
    assert!(svc.fetch_upload(&att.file_url).await.is_ok());
}

#[tokio::test]
async fn task_delete_cascades_when_configured() {
    let server = spawn_cascading_test_server().await;
    let svc = HttpService::new(&server.base_url);
    let task = svc.create_task(&CreateTask::new("Tidy")).await.unwrap();
    let att = svc.upload_attachment(&task.id, png("t.png")).await.unwrap();

    svc.delete_task(&task.id).await.unwrap();
    assert!(svc.list_attachments(&task.id).await.unwrap().is_empty());
    assert!(matches!(
        svc.fetch_upload(&att.file_url).await,
        Err(ServiceError::NotFound(_))
    ));
    assert_eq!(blob_count(&server), 0);
}
