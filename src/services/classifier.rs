// SPDX-License-Identifier: MIT

//! Image classification client for proof-gated task verification.
//!
//! Sends the uploaded proof image together with the task's prompt to a
//! vision model and reduces the textual verdict to a boolean. One call per
//! verification, no retry or backoff: a failed call surfaces as an
//! upstream error and the caller decides whether to try again.

use crate::error::AppError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

const MODEL: &str = "gpt-4o";
const MAX_TOKENS: u32 = 50;

/// Classifier API client.
#[derive(Clone)]
pub struct ClassifierClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ClassifierClient {
    /// Create a new classifier client.
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key,
        }
    }

    /// Verify a proof image against a task prompt.
    ///
    /// The prompt instructs the model to answer with just 'true' or
    /// 'false'; any verdict containing "true" counts as valid.
    pub async fn verify_image(
        &self,
        image: &[u8],
        content_type: &str,
        prompt: &str,
    ) -> Result<bool, AppError> {
        let data_url = format!("data:{};base64,{}", content_type, STANDARD.encode(image));

        let body = serde_json::json!({
            "model": MODEL,
            "messages": [
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": prompt },
                        { "type": "image_url", "image_url": { "url": data_url } }
                    ]
                }
            ],
            "max_tokens": MAX_TOKENS,
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Classifier request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Classifier returned {}: {}",
                status, text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid classifier response: {}", e)))?;

        let verdict = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .unwrap_or_default()
            .to_lowercase();

        tracing::debug!(verdict = %verdict, "Classifier verdict");

        Ok(verdict.contains("true"))
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}
