//! Upstream generation API client.
//!
//! Every user-facing action is exactly one JSON `POST` to a fixed endpoint.
//! Failures are returned once, named after the action; nothing is retried.

use std::time::Duration;

use reqwest::Client;
use serde_json::{Map, Value, json};

use darkai_config::ApiConfig;
use darkai_media::normalize::classify;
use darkai_types::{ImageReply, MediaDescriptor};

use crate::endpoints::{
    IMAGE_MERGE_PATH, ImageModel, MusicMode, REMOVE_BG_PATH, SOCIAL_DOWNLOAD_PATH, TTS_CUSTOM_PATH,
    TTS_PATH, TextModel, VideoMode,
};
use crate::error::{Action, ClientError};

/// Raw upstream response plus its normalized media, if any.
#[derive(Debug, Clone)]
pub struct MediaResult {
    pub raw: Value,
    /// Normalized media, `None` when the response carries nothing to display.
    pub media: Option<MediaDescriptor>,
}

impl MediaResult {
    fn from_response(raw: Value) -> Self {
        let media = classify(&raw).into_descriptor();
        Self { raw, media }
    }

    /// Video endpoints answer `{date, video, dev}`; the generated URL in
    /// `video` is used when no other shape matched.
    fn from_video_response(raw: Value) -> Self {
        let mut result = Self::from_response(raw);
        if result.media.is_none() {
            if let Some(video) = result.raw.get("video").and_then(Value::as_str) {
                result.media = classify(&json!({ "video_url": video })).into_descriptor();
            }
        }
        result
    }

    /// The free-text `response` field some endpoints answer with.
    pub fn reply(&self) -> Option<&str> {
        self.raw
            .get("response")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Text-to-speech request.
#[derive(Debug, Clone, Default)]
pub struct TtsRequest {
    pub text: String,
    pub voice: Option<String>,
    pub style: Option<String>,
}

impl TtsRequest {
    fn is_custom(&self) -> bool {
        non_blank(self.voice.as_deref()).is_some() || non_blank(self.style.as_deref()).is_some()
    }
}

/// Video generation request.
#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub mode: VideoMode,
    pub prompt: String,
    /// Source image, required for image-to-video.
    pub image_url: Option<String>,
}

/// Music generation request.
#[derive(Debug, Clone)]
pub struct MusicRequest {
    pub mode: MusicMode,
    /// Description for instrumentals, lyrics for full songs.
    pub text: String,
    /// Genre tags for full songs. Defaults to "pop".
    pub tags: Option<String>,
}

/// HTTP client for the DarkAI generation API.
pub struct DarkAiClient {
    api: ApiConfig,
    api_key: String,
    client: Client,
}

impl DarkAiClient {
    /// Create a client from configuration. Requires an API key.
    pub fn new(api: ApiConfig) -> Result<Self, ClientError> {
        let api_key = non_blank(api.api_key.as_deref())
            .ok_or(ClientError::MissingApiKey)?
            .to_string();
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .map_err(ClientError::ClientBuild)?;
        Ok(Self {
            api,
            api_key,
            client,
        })
    }

    /// Generate text with a chat model. Returns the `response` field, or the
    /// whole response pretty-printed when it has none.
    pub async fn generate_text(&self, model: TextModel, prompt: &str) -> Result<String, ClientError> {
        let action = Action::GenerateText;
        let prompt = non_blank(Some(prompt))
            .ok_or_else(|| ClientError::invalid(action, "Please select a model and enter a prompt"))?;

        let result = self
            .post(action, model.path(), json!({ "text": prompt }))
            .await?;
        Ok(match result.get("response").and_then(Value::as_str) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => serde_json::to_string_pretty(&result).unwrap_or_default(),
        })
    }

    /// Convert text to speech. A voice or style selects the custom endpoint.
    pub async fn text_to_speech(&self, req: &TtsRequest) -> Result<MediaResult, ClientError> {
        let action = Action::GenerateSpeech;
        let text = non_blank(Some(&req.text))
            .ok_or_else(|| ClientError::invalid(action, "Please enter text to convert"))?;

        let mut body = json!({ "text": text });
        let path = if req.is_custom() {
            if let Some(voice) = non_blank(req.voice.as_deref()) {
                body["voice"] = json!(voice);
            }
            if let Some(style) = non_blank(req.style.as_deref()) {
                body["style"] = json!(style);
            }
            TTS_CUSTOM_PATH
        } else {
            TTS_PATH
        };

        self.post(action, path, body).await.map(MediaResult::from_response)
    }

    /// Generate a video from a prompt, optionally animating a source image.
    pub async fn generate_video(&self, req: &VideoRequest) -> Result<MediaResult, ClientError> {
        let action = Action::GenerateVideo;
        let prompt = non_blank(Some(&req.prompt))
            .ok_or_else(|| ClientError::invalid(action, "Please select type and enter a prompt"))?;

        let mut body = json!({ "text": prompt });
        if req.mode == VideoMode::ImageToVideo {
            let image_url = non_blank(req.image_url.as_deref()).ok_or_else(|| {
                ClientError::invalid(action, "Image is required for image-to-video conversion")
            })?;
            body["link"] = json!(image_url);
        }

        let raw = self.post(action, req.mode.path(), body).await?;
        Ok(MediaResult::from_video_response(raw))
    }

    /// Generate a 15 second instrumental or a full song from lyrics.
    pub async fn create_music(&self, req: &MusicRequest) -> Result<MediaResult, ClientError> {
        let action = Action::GenerateMusic;
        let text = non_blank(Some(&req.text)).ok_or_else(|| {
            ClientError::invalid(action, "Please select type and enter lyrics/description")
        })?;

        let body = match req.mode {
            MusicMode::Instrumental15s => json!({ "text": text }),
            MusicMode::FullSong => json!({
                "lyrics": text,
                "tags": non_blank(req.tags.as_deref()).unwrap_or("pop"),
            }),
        };

        self.post(action, req.mode.path(), body)
            .await
            .map(MediaResult::from_response)
    }

    /// Resolve download options for a social media post. Surrounding
    /// whitespace is stripped before the scheme check and the request.
    pub async fn social_download(&self, url: &str) -> Result<MediaResult, ClientError> {
        let action = Action::DownloadContent;
        let url = non_blank(Some(url))
            .ok_or_else(|| ClientError::invalid(action, "Please enter a valid URL"))?;
        require_http(action, url, "URL must start with http:// or https://")?;

        let result = self
            .post(action, SOCIAL_DOWNLOAD_PATH, json!({ "url": url }))
            .await?;
        let found = result
            .get("links")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        tracing::info!("Found {found} download options");
        Ok(MediaResult::from_response(result))
    }

    /// Remove the background of an image. The processed image URL comes
    /// back in the `response` field.
    pub async fn remove_background(&self, image_url: &str) -> Result<MediaResult, ClientError> {
        let action = Action::RemoveBackground;
        let image_url = non_blank(Some(image_url)).ok_or_else(|| {
            ClientError::invalid(action, "Please upload an image or enter an image URL")
        })?;
        require_http(action, image_url, "Image URL must start with http:// or https://")?;

        self.post(action, REMOVE_BG_PATH, json!({ "url": image_url }))
            .await
            .map(MediaResult::from_response)
    }

    /// Generate (or edit, for models that support it) an image.
    pub async fn generate_image(
        &self,
        model: ImageModel,
        prompt: &str,
        source_image: Option<&str>,
    ) -> Result<Option<String>, ClientError> {
        let action = Action::GenerateImage;
        let prompt = non_blank(Some(prompt))
            .ok_or_else(|| ClientError::invalid(action, "Please enter a prompt"))?;

        let mut body = json!({ "text": prompt });
        match non_blank(source_image) {
            Some(link) if model.supports_source_image() => body["link"] = json!(link),
            Some(_) => tracing::warn!(model = %model, "Model does not edit images, ignoring source image"),
            None => {}
        }

        let result = self.post(action, model.path(), body).await?;
        Ok(image_url(result))
    }

    /// Merge several images according to a prompt.
    pub async fn merge_images(
        &self,
        prompt: &str,
        image_urls: &[String],
    ) -> Result<Option<String>, ClientError> {
        let action = Action::MergeImages;
        let prompt = non_blank(Some(prompt))
            .ok_or_else(|| ClientError::invalid(action, "Please enter a prompt"))?;
        if image_urls.is_empty() {
            return Err(ClientError::invalid(action, "Please provide at least one image URL"));
        }

        let result = self
            .post(
                action,
                IMAGE_MERGE_PATH,
                json!({ "text": prompt, "links": image_urls.join(",") }),
            )
            .await?;
        Ok(image_url(result))
    }

    /// POST `fields` plus the API key as JSON and parse the JSON reply.
    async fn post(&self, action: Action, path: &str, fields: Value) -> Result<Value, ClientError> {
        let url = self.api.endpoint(path)?;

        let mut body = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        body.insert("api_key".into(), json!(self.api_key));

        tracing::debug!(%action, %url, "Sending upstream request");
        let resp = self
            .client
            .post(url)
            .header("accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|source| ClientError::Transport { action, source })?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|source| ClientError::Transport { action, source })?;

        if !status.is_success() {
            return Err(ClientError::Http {
                action,
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let json: Value =
            serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode { action, source })?;
        tracing::info!(%action, %status, "Upstream request succeeded");
        Ok(json)
    }
}

fn image_url(result: Value) -> Option<String> {
    serde_json::from_value::<ImageReply>(result)
        .ok()
        .and_then(|reply| reply.image_url().map(str::to_string))
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn require_http(action: Action, url: &str, message: &str) -> Result<(), ClientError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ClientError::invalid(action, message))
    }
}
