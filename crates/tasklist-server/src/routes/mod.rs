pub mod attachments;
pub mod health;
pub mod tasks;

use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::response::{IntoResponse, Response};
use axum::Router;
use tasklist_service::LocalService;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::error::ApiError;

pub struct InnerAppState {
    pub service: LocalService,
    /// Blob directory served read-only under `/uploads`.
    pub uploads_dir: PathBuf,
    pub max_upload_bytes: usize,
}

pub type AppState = Arc<InnerAppState>;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(health::routes())
        .merge(tasks::routes())
        .merge(attachments::routes());
    with_middleware(api, state)
}

/// Static uploads, fallback and the middleware stack around `api`.
fn with_middleware(api: Router<AppState>, state: AppState) -> Router {
    let uploads = ServeDir::new(&state.uploads_dir);
    let body_limit = state.max_upload_bytes;

    api.nest_service("/uploads", uploads)
        .fallback(unknown_route)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn unknown_route() -> ApiError {
    ApiError::not_found("route")
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    ApiError::Service(tasklist_service::ServiceError::Internal(format!(
        "handler panicked: {detail}"
    )))
    .into_response()
}
