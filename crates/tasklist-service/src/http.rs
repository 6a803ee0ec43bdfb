use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use tasklist_core::attachment::Attachment;
use tasklist_core::task::{CreateTask, Task, UpdateTask};

use crate::{ServiceError, TaskService, UploadFile};

/// Async HTTP client implementation of TaskService.
/// Connects to a running tasklist-server.
#[derive(Clone)]
pub struct HttpService {
    base_url: String,
    client: Client,
}

impl HttpService {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
        }
    }

    /// Check if the server is reachable.
    pub async fn health_check(&self) -> Result<(), ServiceError> {
        let resp = self
            .client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await
            .map_err(|e| ServiceError::Internal(format!("connection failed: {e}")))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ServiceError::Internal(format!(
                "health check failed: {}",
                resp.status()
            )))
        }
    }

    /// Download a stored attachment by its `file_url`.
    pub async fn fetch_upload(&self, file_url: &str) -> Result<Bytes, ServiceError> {
        let resp = send(self.client.get(format!("{}{file_url}", self.base_url))).await?;
        let status = resp.status();
        if status.is_success() {
            resp.bytes()
                .await
                .map_err(|e| ServiceError::Internal(format!("read body: {e}")))
        } else {
            Err(parse_error_with_status(status, resp).await)
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ServiceError> {
        let resp = send(self.client.get(format!("{}{path}", self.base_url))).await?;
        handle_response(resp).await
    }

    async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let builder = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body);
        handle_response(send(builder).await?).await
    }

    async fn patch_json<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ServiceError> {
        let builder = self
            .client
            .patch(format!("{}{path}", self.base_url))
            .json(body);
        expect_success(send(builder).await?).await
    }

    async fn delete_req(&self, path: &str) -> Result<(), ServiceError> {
        let resp = send(self.client.delete(format!("{}{path}", self.base_url))).await?;
        expect_success(resp).await
    }
}

async fn send(builder: RequestBuilder) -> Result<reqwest::Response, ServiceError> {
    builder
        .send()
        .await
        .map_err(|e| ServiceError::Internal(e.to_string()))
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Internal(format!("json decode: {e}")))
    } else {
        Err(parse_error_with_status(status, resp).await)
    }
}

// Success bodies for PATCH and DELETE only carry a confirmation message.
async fn expect_success(resp: reqwest::Response) -> Result<(), ServiceError> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(parse_error_with_status(status, resp).await)
    }
}

async fn parse_error_with_status(
    status: StatusCode,
    resp: reqwest::Response,
) -> ServiceError {
    let body = resp.text().await.unwrap_or_default();
    let msg = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"].as_str().map(String::from))
        .unwrap_or(body);

    if status == StatusCode::NOT_FOUND {
        ServiceError::NotFound(msg)
    } else if status == StatusCode::BAD_REQUEST || status == StatusCode::PAYLOAD_TOO_LARGE {
        ServiceError::InvalidInput(msg)
    } else {
        ServiceError::Internal(msg)
    }
}

#[async_trait]
impl TaskService for HttpService {
    async fn list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        self.get_json("/api/tasks").await
    }

    async fn get_task(&self, id: &str) -> Result<Task, ServiceError> {
        self.get_json(&format!("/api/tasks/{id}")).await
    }

    async fn create_task(&self, input: &CreateTask) -> Result<Task, ServiceError> {
        self.post_json("/api/tasks", input).await
    }

    async fn update_task(&self, id: &str, update: &UpdateTask) -> Result<(), ServiceError> {
        self.patch_json(&format!("/api/tasks/{id}"), update).await
    }

    async fn delete_task(&self, id: &str) -> Result<(), ServiceError> {
        self.delete_req(&format!("/api/tasks/{id}")).await
    }

    async fn upload_attachment(
        &self,
        task_id: &str,
        file: UploadFile,
    ) -> Result<Attachment, ServiceError> {
        let part = Part::bytes(file.data.to_vec())
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| ServiceError::InvalidInput(format!("content type: {e}")))?;
        let builder = self
            .client
            .post(format!("{}/api/tasks/{task_id}/attachments", self.base_url))
            .multipart(Form::new().part("file", part));
        handle_response(send(builder).await?).await
    }

    async fn list_attachments(&self, task_id: &str) -> Result<Vec<Attachment>, ServiceError> {
        self.get_json(&format!("/api/tasks/{task_id}/attachments"))
            .await
    }

    async fn delete_attachment(
        &self,
        task_id: &str,
        attachment_id: &str,
    ) -> Result<(), ServiceError> {
        self.delete_req(&format!(
            "/api/tasks/{task_id}/attachments/{attachment_id}"
        ))
        .await
    }
}
