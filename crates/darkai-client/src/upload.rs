//! Image upload to the third-party file host.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart;
use serde_json::Value;

use darkai_config::UploadConfig;

use crate::error::UploadError;

/// A file ready to be uploaded.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl UploadFile {
    /// Read a file from disk, guessing its MIME type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self, UploadError> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self {
            mime_type: mime_for_path(path).to_string(),
            file_name,
            data,
        })
    }

    /// Reject anything that is not an image or is larger than `max_bytes`.
    pub fn validate(&self, max_bytes: u64) -> Result<(), UploadError> {
        if !self.mime_type.starts_with("image/") {
            return Err(UploadError::NotAnImage(self.mime_type.clone()));
        }
        let size = self.data.len() as u64;
        if size > max_bytes {
            return Err(UploadError::TooLarge {
                size,
                max: max_bytes,
            });
        }
        Ok(())
    }
}

/// Something that can host a file and hand back its public URL.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, file: UploadFile) -> Result<String, UploadError>;
}

/// Multipart upload with a bearer token.
pub struct HttpUploader {
    url: String,
    token: String,
    max_bytes: u64,
    client: reqwest::Client,
}

impl HttpUploader {
    pub fn new(url: String, token: String, max_bytes: u64) -> Self {
        Self {
            url,
            token,
            max_bytes,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &UploadConfig) -> Result<Self, UploadError> {
        let url = config
            .url
            .clone()
            .ok_or(UploadError::NotConfigured("upload.url"))?;
        let token = config
            .token
            .clone()
            .ok_or(UploadError::NotConfigured("upload.token"))?;
        Ok(Self::new(url, token, config.max_bytes))
    }
}

#[async_trait]
impl Uploader for HttpUploader {
    async fn upload(&self, file: UploadFile) -> Result<String, UploadError> {
        file.validate(self.max_bytes)?;

        let part = multipart::Part::bytes(file.data)
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)?;
        let form = multipart::Form::new().part("file", part);

        let resp = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.token))
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%status, "Image upload failed");
            return Err(UploadError::Http { status, body });
        }

        let json: Value = serde_json::from_slice(&resp.bytes().await?)?;
        let url = hosted_url(&json).ok_or(UploadError::MissingUrl)?;
        tracing::info!(file = %file.file_name, %url, "Image uploaded");
        Ok(url)
    }
}

/// First non-empty of `url`, `file_url`, `link`.
pub fn hosted_url(response: &Value) -> Option<String> {
    ["url", "file_url", "link"].iter().find_map(|key| {
        response
            .get(*key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Multipart;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    async fn spawn_host(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/upload")
    }

    fn png(name: &str, size: usize) -> UploadFile {
        UploadFile {
            file_name: name.into(),
            mime_type: "image/png".into(),
            data: vec![0u8; size],
        }
    }

    #[test]
    fn test_hosted_url_precedence() {
        assert_eq!(
            hosted_url(&json!({"url": "a", "file_url": "b", "link": "c"})).as_deref(),
            Some("a")
        );
        assert_eq!(
            hosted_url(&json!({"url": "", "file_url": "b", "link": "c"})).as_deref(),
            Some("b")
        );
        assert_eq!(hosted_url(&json!({"link": "c"})).as_deref(), Some("c"));
        assert_eq!(hosted_url(&json!({"ok": true})), None);
    }

    #[test]
    fn test_validate() {
        assert!(png("a.png", 10).validate(1024).is_ok());
        assert!(matches!(
            png("a.png", 2048).validate(1024),
            Err(UploadError::TooLarge { size: 2048, max: 1024 })
        ));
        let pdf = UploadFile {
            file_name: "a.pdf".into(),
            mime_type: "application/pdf".into(),
            data: vec![1],
        };
        assert!(matches!(pdf.validate(1024), Err(UploadError::NotAnImage(_))));
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("photo.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("x.webp")), "image/webp");
        assert_eq!(mime_for_path(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn test_from_config_requires_url_and_token() {
        let config = UploadConfig {
            url: Some("https://upload.example.com".into()),
            ..Default::default()
        };
        assert!(matches!(
            HttpUploader::from_config(&config),
            Err(UploadError::NotConfigured("upload.token"))
        ));
    }

    #[tokio::test]
    async fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name, "cat.png");
        assert_eq!(file.mime_type, "image/png");
        assert_eq!(file.data.len(), 4);
    }

    #[tokio::test]
    async fn test_upload_sends_file_and_token() {
        let router = Router::new().route(
            "/upload",
            post(|headers: HeaderMap, mut multipart: Multipart| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                if auth != "Bearer secret" {
                    return (StatusCode::UNAUTHORIZED, Json(json!({})));
                }
                let field = multipart.next_field().await.unwrap().unwrap();
                assert_eq!(field.name(), Some("file"));
                let name = field.file_name().unwrap_or_default().to_string();
                (
                    StatusCode::OK,
                    Json(json!({ "file_url": format!("https://cdn.example.com/{name}") })),
                )
            }),
        );
        let url = spawn_host(router).await;

        let uploader = HttpUploader::new(url.clone(), "secret".into(), 1024);
        let hosted = uploader.upload(png("cat.png", 16)).await.unwrap();
        assert_eq!(hosted, "https://cdn.example.com/cat.png");

        let wrong_token = HttpUploader::new(url, "nope".into(), 1024);
        let err = wrong_token.upload(png("cat.png", 16)).await.unwrap_err();
        assert!(matches!(err, UploadError::Http { .. }));
    }

    #[tokio::test]
    async fn test_upload_without_url_fails() {
        let router = Router::new().route("/upload", post(|| async { Json(json!({ "ok": true })) }));
        let uploader = HttpUploader::new(spawn_host(router).await, "t".into(), 1024);

        let err = uploader.upload(png("a.png", 1)).await.unwrap_err();
        assert!(matches!(err, UploadError::MissingUrl));
        assert_eq!(err.to_string(), "No URL returned from upload service");
    }

    #[tokio::test]
    async fn test_oversized_file_is_rejected_before_request() {
        let uploader = HttpUploader::new("http://127.0.0.1:9/upload".into(), "t".into(), 8);
        let err = uploader.upload(png("big.png", 9)).await.unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { .. }));
    }
}
