use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

use darkai_config::ConfigError;

/// User-facing action an upstream call belongs to. Named in every error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    GenerateText,
    GenerateSpeech,
    GenerateVideo,
    GenerateMusic,
    DownloadContent,
    RemoveBackground,
    GenerateImage,
    MergeImages,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::GenerateText => "generate text",
            Action::GenerateSpeech => "generate speech",
            Action::GenerateVideo => "generate video",
            Action::GenerateMusic => "generate music",
            Action::DownloadContent => "download content",
            Action::RemoveBackground => "remove background",
            Action::GenerateImage => "generate image",
            Action::MergeImages => "merge images",
        })
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to {action}: {message}")]
    InvalidInput { action: Action, message: String },
    #[error("Failed to {action}: HTTP error! status: {status}")]
    Http {
        action: Action,
        status: StatusCode,
        body: String,
    },
    #[error("Failed to {action}: {source}")]
    Transport {
        action: Action,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to {action}: invalid JSON response: {source}")]
    Decode {
        action: Action,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownIdentifier {
        kind: &'static str,
        value: String,
        expected: String,
    },
    #[error("API key not configured (set DARKAI_API_KEY or api.api_key)")]
    MissingApiKey,
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    pub(crate) fn invalid(action: Action, message: impl Into<String>) -> Self {
        ClientError::InvalidInput {
            action,
            message: message.into(),
        }
    }

    /// The action that failed, if the error belongs to one.
    pub fn action(&self) -> Option<Action> {
        match self {
            ClientError::InvalidInput { action, .. }
            | ClientError::Http { action, .. }
            | ClientError::Transport { action, .. }
            | ClientError::Decode { action, .. } => Some(*action),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please select an image file (got {0})")]
    NotAnImage(String),
    #[error("Please select an image smaller than {max} bytes (got {size})")]
    TooLarge { size: u64, max: u64 },
    #[error("Upload not configured: missing {0}")]
    NotConfigured(&'static str),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Upload failed: {status}")]
    Http { status: StatusCode, body: String },
    #[error("Upload failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Upload failed: invalid JSON response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("No URL returned from upload service")]
    MissingUrl,
}
