// SPDX-License-Identifier: MIT

//! Object storage client: thin upload passthrough returning a public URL.

use crate::error::AppError;

/// Object storage API client.
#[derive(Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
    api_key: String,
}

impl StorageClient {
    /// Create a new storage client for a bucket.
    pub fn new(base_url: String, bucket: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            bucket,
            api_key,
        }
    }

    /// Upload a byte buffer under the given object path and return the
    /// publicly resolvable URL.
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let encoded_path = encode_object_path(path);
        let upload_url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, encoded_path
        );

        let response = self
            .http
            .post(&upload_url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Storage upload failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Storage returned {}: {}",
                status, text
            )));
        }

        let public_url = format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, encoded_path
        );

        tracing::info!(path, "Uploaded object");

        Ok(public_url)
    }
}

/// Percent-encode each segment of an object path, preserving the slashes.
fn encode_object_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_object_path_preserves_slashes() {
        assert_eq!(
            encode_object_path("task-proofs/did:ex:1/photo.jpg"),
            "task-proofs/did%3Aex%3A1/photo.jpg"
        );
    }
}
