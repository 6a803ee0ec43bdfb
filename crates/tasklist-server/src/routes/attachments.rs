use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};
use tasklist_service::{TaskService, UploadFile};

use super::AppState;
use crate::error::ApiError;

/// Multipart field carrying the file. `images` is the older client's name.
const FILE_FIELDS: &[&str] = &["file", "images"];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/tasks/{task_id}/attachments",
            get(list_attachments).post(upload_attachment),
        )
        .route(
            "/api/tasks/{task_id}/attachments/{attachment_id}",
            delete(delete_attachment),
        )
}

async fn upload_attachment(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let multipart = multipart.map_err(ApiError::from_multipart_rejection)?;
    let file = read_single_file(multipart).await?;
    let attachment = state.service.upload_attachment(&task_id, file).await?;
    Ok(Json(json!(attachment)))
}

/// Pull exactly one file out of the form. Non-file fields are ignored.
async fn read_single_file(mut multipart: Multipart) -> Result<UploadFile, ApiError> {
    let mut upload: Option<UploadFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(ApiError::from_multipart)?
    {
        let name = field.name().unwrap_or("").to_string();
        if !FILE_FIELDS.contains(&name.as_str()) {
            continue;
        }
        if upload.is_some() {
            return Err(ApiError::BadRequest(
                "only one file may be uploaded per request".into(),
            ));
        }

        let file_name = field.file_name().unwrap_or("").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(ApiError::from_multipart)?;
        upload = Some(UploadFile {
            file_name,
            content_type,
            data,
        });
    }

    upload.ok_or_else(|| ApiError::BadRequest("no file uploaded".into()))
}

async fn list_attachments(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let attachments = state.service.list_attachments(&task_id).await?;
    Ok(Json(json!(attachments)))
}

async fn delete_attachment(
    State(state): State<AppState>,
    Path((task_id, attachment_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    state
        .service
        .delete_attachment(&task_id, &attachment_id)
        .await?;
    Ok(Json(json!({ "message": "Attachment deleted successfully" })))
}
