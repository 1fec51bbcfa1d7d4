use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON5 parse error: {0}")]
    Json5(#[from] json5::Error),
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Config directory not found")]
    NoDirFound,
}

/// Upstream generation API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Key sent as `api_key` in every request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Per-request timeout in seconds. Video generation is slow.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://darkv1.onrender.com".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Join an endpoint path (e.g. "/api/voice") onto the base URL.
    pub fn endpoint(&self, path: &str) -> Result<url::Url, ConfigError> {
        let joined = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        url::Url::parse(&joined).map_err(|source| ConfigError::InvalidUrl {
            url: joined,
            source,
        })
    }
}

/// File upload service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Multipart upload endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Bearer token for the upload endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Largest file accepted before any request is made.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
}

fn default_max_bytes() -> u64 {
    10 * 1024 * 1024
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            max_bytes: default_max_bytes(),
        }
    }
}

/// Top-level darkai configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DarkAiConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

impl DarkAiConfig {
    /// Apply `DARKAI_*` overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = lookup("DARKAI_BASE_URL") {
            self.api.base_url = v;
        }
        if let Some(v) = lookup("DARKAI_API_KEY") {
            self.api.api_key = Some(v);
        }
        if let Some(v) = lookup("DARKAI_UPLOAD_URL") {
            self.upload.url = Some(v);
        }
        if let Some(v) = lookup("DARKAI_UPLOAD_TOKEN") {
            self.upload.token = Some(v);
        }
    }
}

/// Resolve the darkai config directory (~/.darkai/).
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|h| h.join(".darkai"))
        .ok_or(ConfigError::NoDirFound)
}

/// Resolve the config file path (~/.darkai/config.json5).
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.json5"))
}

/// Load `path` (defaults if missing) and apply `.env` / process environment overrides.
pub fn load_config_with_env(path: &Path) -> Result<DarkAiConfig, ConfigError> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let mut config = load_config_from(path)?;
    config.apply_overrides(|key| std::env::var(key).ok());
    Ok(config)
}

/// Load configuration from a specific path, falling back to defaults if not found.
pub fn load_config_from(path: &Path) -> Result<DarkAiConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("Config file not found at {}, using defaults", path.display());
        return Ok(DarkAiConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: DarkAiConfig = json5::from_str(&content)?;
    Ok(config)
}

/// Save configuration to `path`, creating its directory if needed.
pub fn save_config_to(config: &DarkAiConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| ConfigError::Io(std::io::Error::other(e)))?;
    std::fs::write(path, content)?;
    Ok(())
}
