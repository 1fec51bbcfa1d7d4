//! darkai-client: Upstream generation API wrappers and the image upload client.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod upload;

pub use client::{DarkAiClient, MediaResult, MusicRequest, TtsRequest, VideoRequest};
pub use endpoints::{ImageModel, MusicMode, TextModel, VideoMode};
pub use error::{Action, ClientError, UploadError};
pub use upload::{HttpUploader, UploadFile, Uploader};
