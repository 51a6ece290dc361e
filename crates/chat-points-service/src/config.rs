//! Service configuration.

use serde::Deserialize;
use std::path::Path;

/// Default delay between chat page fetches, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 10;

/// Default delay before retrying a failed fetch, in seconds.
pub const DEFAULT_ERROR_BACKOFF_SECONDS: u64 = 30;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Path to the `RocksDB` data directory (default: "/data/chat-points").
    pub data_dir: String,

    /// Data API base URL.
    pub api_base_url: String,

    /// Bearer token from the credential provider, if configured.
    pub api_token: Option<String>,

    /// Channel handle or ID to monitor.
    pub channel_handle: String,

    /// Keyword identifying the correct live stream by title.
    pub stream_keyword: String,

    /// Delay between chat page fetches, in seconds.
    pub poll_interval_seconds: u64,

    /// Delay before retrying a failed fetch, in seconds.
    pub error_backoff_seconds: u64,
}

/// Token secrets file structure.
#[derive(Debug, Deserialize)]
struct TokenSecrets {
    access_token: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables and the token secrets
    /// file.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/chat-points".into()),
            api_base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| "https://www.googleapis.com/youtube/v3".into()),
            api_token: load_api_token(),
            channel_handle: std::env::var("CHANNEL_HANDLE").unwrap_or_default(),
            stream_keyword: std::env::var("STREAM_KEYWORD").unwrap_or_else(|_| "Live".into()),
            poll_interval_seconds: std::env::var("POLL_INTERVAL_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECONDS),
            error_backoff_seconds: std::env::var("ERROR_BACKOFF_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_ERROR_BACKOFF_SECONDS),
        }
    }
}

/// Load the API bearer token from a secrets file or environment.
fn load_api_token() -> Option<String> {
    // The credential provider writes the exchanged token here
    let secret_paths = [".secrets/token.json", "token.json"];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<TokenSecrets>(path) {
            tracing::info!(path = %path, "Loaded API token from file");
            return Some(secrets.access_token);
        }
    }

    tracing::debug!("Token file not found, using environment variable");
    std::env::var("API_TOKEN").ok()
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: "/data/chat-points".into(),
            api_base_url: "https://www.googleapis.com/youtube/v3".into(),
            api_token: None,
            channel_handle: String::new(),
            stream_keyword: "Live".into(),
            poll_interval_seconds: DEFAULT_POLL_INTERVAL_SECONDS,
            error_backoff_seconds: DEFAULT_ERROR_BACKOFF_SECONDS,
        }
    }
}
