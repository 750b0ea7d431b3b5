// SPDX-License-Identifier: MIT

//! Gamification task routes: catalog listing, direct completion, and
//! proof-gated verification.

use crate::catalog::{self, TaskId};
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::AppState;
use axum::{
    extract::{Multipart, Path, State},
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;

/// List the task catalog.
pub async fn list_tasks() -> Json<&'static [catalog::Task]> {
    Json(catalog::TASKS)
}

#[derive(Serialize)]
pub struct CompleteTaskResponse {
    /// False when the task was already completed and is not repeatable.
    pub awarded: bool,
    pub points_delta: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_total: Option<u32>,
}

/// Complete a task that needs no proof.
pub async fn complete_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<CompleteTaskResponse>> {
    let task_id = parse_task_id(&id)?;
    if task_id.task().require_proof {
        return Err(AppError::BadRequest(
            "This task requires photo proof".to_string(),
        ));
    }

    let outcome = state.ledger.award(&user.subject, task_id, true).await?;

    Ok(Json(match outcome {
        Some(o) => CompleteTaskResponse {
            awarded: true,
            points_delta: o.points_delta,
            new_total: Some(o.new_total),
        },
        None => CompleteTaskResponse {
            awarded: false,
            points_delta: 0,
            new_total: None,
        },
    }))
}

#[derive(Serialize)]
pub struct VerifyTaskResponse {
    /// The classifier's verdict on the proof image.
    pub valid: bool,
    /// Whether points were awarded (false on invalid proof or on an
    /// already-completed non-repeatable task).
    pub awarded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_total: Option<u32>,
}

/// Verify a proof-gated task: classify the uploaded image against the
/// task's prompt and award points when the verdict is positive.
pub async fn verify_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<VerifyTaskResponse>> {
    let task_id = parse_task_id(&id)?;
    let task = task_id.task();
    let prompt = task.proof_prompt.ok_or_else(|| {
        AppError::BadRequest("This task does not take photo proof".to_string())
    })?;

    let (image, content_type) = read_image_field(multipart).await?;

    // A non-repeatable task already in the log would be a no-op award;
    // skip the classifier call entirely.
    if !task.repeatable {
        let profile = state
            .db
            .get_user(&user.subject)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.subject)))?;
        if profile.completed_tasks.iter().any(|t| t == task_id.as_str()) {
            return Ok(Json(VerifyTaskResponse {
                valid: true,
                awarded: false,
                new_total: None,
            }));
        }
    }

    let valid = state
        .classifier
        .verify_image(&image, &content_type, prompt)
        .await?;

    if !valid {
        tracing::info!(subject = %user.subject, task = task_id.as_str(), "Proof rejected");
        return Ok(Json(VerifyTaskResponse {
            valid: false,
            awarded: false,
            new_total: None,
        }));
    }

    let outcome = state.ledger.award(&user.subject, task_id, true).await?;

    Ok(Json(VerifyTaskResponse {
        valid: true,
        awarded: outcome.is_some(),
        new_total: outcome.map(|o| o.new_total),
    }))
}

fn parse_task_id(raw: &str) -> Result<TaskId> {
    TaskId::parse(raw).ok_or_else(|| AppError::BadRequest(format!("Unknown task id: {}", raw)))
}

/// Pull the `file` field out of a multipart body.
async fn read_image_field(mut multipart: Multipart) -> Result<(Vec<u8>, String)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::BadRequest("Invalid multipart body".to_string()))?
    {
        if field.name() == Some("file") {
            let content_type = field
                .content_type()
                .unwrap_or("image/jpeg")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|_| AppError::BadRequest("Failed to read uploaded file".to_string()))?;
            return Ok((bytes.to_vec(), content_type));
        }
    }

    Err(AppError::BadRequest("Missing 'file' field".to_string()))
}
