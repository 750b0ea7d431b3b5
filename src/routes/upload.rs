// SPDX-License-Identifier: MIT

//! File upload passthrough to object storage.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;

const MAX_FILENAME_LEN: usize = 40;

#[derive(Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Upload a file and return its public URL.
///
/// Objects land under `task-proofs/{subject}/{timestamp}-{name}` so a
/// user's proofs stay grouped and names never collide.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::BadRequest("Invalid multipart body".to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = sanitize_file_name(field.file_name().unwrap_or("upload"));
        let content_type = field
            .content_type()
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| AppError::BadRequest("Failed to read uploaded file".to_string()))?;

        let path = format!(
            "task-proofs/{}/{}-{}",
            user.subject,
            chrono::Utc::now().timestamp_millis(),
            file_name
        );

        let url = state
            .storage
            .upload(&path, bytes.to_vec(), &content_type)
            .await?;

        return Ok(Json(UploadResponse { url }));
    }

    Err(AppError::BadRequest("No file uploaded".to_string()))
}

/// Strip path separators and exotic characters from a client filename and
/// cap its length.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .take(MAX_FILENAME_LEN)
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("beach.jpg"), "beach.jpg");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "....etcpasswd");
        assert_eq!(sanitize_file_name("🪩🪩🪩"), "upload");
        assert_eq!(sanitize_file_name(&"a".repeat(100)).len(), MAX_FILENAME_LEN);
    }
}
