//! Request handlers, one per user-facing workflow event

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::codec::{CodecError, RawFile};
use crate::error::{AppError, Result};
use crate::prompt::RenderingStyle;
use crate::workflow::{Transition, WorkflowView};
use crate::AppState;

/// Reply to any event: whether it changed anything, plus the new state
#[derive(Serialize)]
pub struct EventResponse {
    pub accepted: bool,
    pub state: WorkflowView,
}

impl EventResponse {
    fn new(transition: Transition, state: WorkflowView) -> Json<Self> {
        Json(Self {
            accepted: transition.is_applied(),
            state,
        })
    }
}

#[derive(Serialize)]
pub struct StyleInfo {
    pub id: RenderingStyle,
    pub label: &'static str,
}

#[derive(Deserialize)]
pub struct StyleRequest {
    pub style: String,
}

#[derive(Deserialize)]
pub struct InstructionsRequest {
    #[serde(default)]
    pub instructions: String,
}

#[derive(Serialize)]
pub struct ExportResponse {
    pub filename: String,
    pub path: String,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn list_styles() -> Json<Vec<StyleInfo>> {
    Json(
        RenderingStyle::ALL
            .iter()
            .map(|style| StyleInfo {
                id: *style,
                label: style.label(),
            })
            .collect(),
    )
}

pub async fn get_workflow(State(state): State<Arc<AppState>>) -> Json<WorkflowView> {
    Json(state.controller.view())
}

/// Multipart batch upload; every file part becomes one candidate image
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<EventResponse>> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Invalid multipart body: {}", e)))?
    {
        // Plain form fields carry no file name and are not candidates
        let Some(name) = field.file_name().map(String::from) else {
            continue;
        };
        let declared_type = field.content_type().map(String::from);

        match field.bytes().await {
            Ok(bytes) => files.push(RawFile::new(name, declared_type, bytes.to_vec())),
            Err(e) => {
                let transition = state.controller.record_read_failure(CodecError::Read {
                    name,
                    reason: e.to_string(),
                });
                return Ok(EventResponse::new(transition, state.controller.view()));
            }
        }
    }

    debug!(count = files.len(), "Received upload batch");

    let transition = state.controller.upload_files(files);
    Ok(EventResponse::new(transition, state.controller.view()))
}

pub async fn remove_image(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Json<EventResponse> {
    let transition = state.controller.remove_image(index);
    EventResponse::new(transition, state.controller.view())
}

pub async fn set_style(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StyleRequest>,
) -> Json<EventResponse> {
    state.controller.set_style(RenderingStyle::from_name(&request.style));
    EventResponse::new(Transition::Applied, state.controller.view())
}

pub async fn set_instructions(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InstructionsRequest>,
) -> Json<EventResponse> {
    state.controller.set_instructions(request.instructions);
    EventResponse::new(Transition::Applied, state.controller.view())
}

pub async fn generate(State(state): State<Arc<AppState>>) -> Json<EventResponse> {
    let transition = state.controller.generate().await;
    EventResponse::new(transition, state.controller.view())
}

pub async fn upscale(State(state): State<Arc<AppState>>) -> Json<EventResponse> {
    let transition = state.controller.upscale().await;
    EventResponse::new(transition, state.controller.view())
}

pub async fn reset(State(state): State<Arc<AppState>>) -> Json<EventResponse> {
    let transition = state.controller.reset();
    EventResponse::new(transition, state.controller.view())
}

pub async fn download(State(state): State<Arc<AppState>>) -> Result<Response> {
    let artifact = state
        .controller
        .download()?
        .ok_or_else(|| AppError::NotFound("No rendering available".to_string()))?;

    let disposition = format!("attachment; filename=\"{}\"", artifact.filename);

    Ok((
        [
            (header::CONTENT_TYPE, artifact.mime_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response())
}

pub async fn export(State(state): State<Arc<AppState>>) -> Result<Json<ExportResponse>> {
    let artifact = state
        .controller
        .download()?
        .ok_or_else(|| AppError::NotFound("No rendering available".to_string()))?;

    let path = state.export_store.save(&artifact).await?;

    Ok(Json(ExportResponse {
        filename: artifact.filename,
        path: path.to_string_lossy().to_string(),
    }))
}
