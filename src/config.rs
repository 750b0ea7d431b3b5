//! Application configuration loaded from environment variables.
//!
//! Secrets are read once at startup and cached in memory. In production
//! (Cloud Run) the secret bindings inject them as environment variables.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Object storage bucket for uploads
    pub storage_bucket: String,
    /// Object storage base URL
    pub storage_url: String,

    // --- Secrets ---
    /// Signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// API key for the image classification model
    pub openai_api_key: String,
    /// Service key for the object storage API
    pub storage_api_key: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            // Non-sensitive config from env
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            storage_bucket: env::var("STORAGE_BUCKET").unwrap_or_else(|_| "uploads".to_string()),
            storage_url: env::var("STORAGE_URL").map_err(|_| ConfigError::Missing("STORAGE_URL"))?,

            // Secrets - from env for local dev, secret bindings in prod
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            openai_api_key: env::var("OPENAI_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("OPENAI_API_KEY"))?,
            storage_api_key: env::var("STORAGE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STORAGE_API_KEY"))?,
        })
    }

    /// Default config for tests only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            storage_bucket: "uploads".to_string(),
            storage_url: "http://localhost:54321".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            openai_api_key: "test_openai_key".to_string(),
            storage_api_key: "test_storage_key".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("STORAGE_URL", "http://localhost:54321");
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("OPENAI_API_KEY", "test_openai_key");
        env::set_var("STORAGE_API_KEY", "test_storage_key");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.openai_api_key, "test_openai_key");
        assert_eq!(config.storage_bucket, "uploads");
        assert_eq!(config.port, 8080);
    }
}
