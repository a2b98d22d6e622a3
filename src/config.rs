//! Application configuration loaded from environment variables.
//!
//! Secrets (JWT signing key, GitHub OAuth credentials) are injected via
//! the environment at startup and cached in memory for the process
//! lifetime. Nothing sensitive ever appears in request URLs.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// GitHub OAuth app client ID (raises the API rate limit)
    pub github_client_id: Option<String>,
    /// GitHub OAuth app client secret
    pub github_client_secret: Option<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            github_client_id: None,
            github_client_secret: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// For local development a `.env` file is honored. GitHub credentials
    /// are optional; without them repo lookups run unauthenticated at the
    /// lower shared rate limit.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            github_client_id: env::var("GITHUB_CLIENT_ID")
                .ok()
                .map(|v| v.trim().to_string()),
            github_client_secret: env::var("GITHUB_CLIENT_SECRET")
                .ok()
                .map(|v| v.trim().to_string()),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
