use std::fmt;

use serde::{Deserialize, Serialize};

// ──────────────────── Media Types ────────────────────

/// What a media URL points at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
    Audio,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An additional download option offered alongside the primary URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DownloadLink {
    pub url: String,
    /// Human readable label (e.g. "hd", "Download Option 2").
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

/// Optional details picked up from whatever the upstream response carried.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MediaMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_label: Option<String>,
}

impl MediaMetadata {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.duration_seconds.is_none()
            && self.size_label.is_none()
            && self.style_label.is_none()
    }
}

/// Normalized description of one playable/downloadable asset.
///
/// Built only through [`MediaDescriptor::new`], which rejects an empty
/// primary URL, so a descriptor always has a kind and something to play.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaDescriptor {
    pub kind: MediaKind,
    pub primary_url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternate_links: Vec<DownloadLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MediaMetadata>,
}

impl MediaDescriptor {
    /// Returns `None` if `primary_url` is empty.
    pub fn new(kind: MediaKind, primary_url: impl Into<String>) -> Option<Self> {
        let primary_url = primary_url.into();
        if primary_url.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            primary_url,
            alternate_links: Vec::new(),
            metadata: None,
        })
    }

    pub fn with_links(mut self, links: Vec<DownloadLink>) -> Self {
        self.alternate_links = links;
        self
    }

    /// Attach metadata; an all-empty record is dropped.
    pub fn with_metadata(mut self, metadata: MediaMetadata) -> Self {
        self.metadata = if metadata.is_empty() {
            None
        } else {
            Some(metadata)
        };
        self
    }
}

// ──────────────────── Upstream Payloads ────────────────────

/// One entry of a social-media download response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SocialLink {
    pub url: String,
    #[serde(default)]
    pub quality: String,
    /// "video" or "audio".
    #[serde(rename = "type", default)]
    pub link_type: String,
    #[serde(default)]
    pub ext: String,
}

/// Social downloader response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialDownload {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub links: Vec<SocialLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev: Option<String>,
}

/// Image generation/edit response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resp: Option<String>,
}

impl ImageReply {
    /// `url`, falling back to `resp`. Empty strings count as absent.
    pub fn image_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| self.resp.as_deref().filter(|r| !r.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_serde() {
        let json = serde_json::to_string(&MediaKind::Audio).unwrap();
        assert_eq!(json, "\"audio\"");
        let parsed: MediaKind = serde_json::from_str("\"video\"").unwrap();
        assert_eq!(parsed, MediaKind::Video);
        assert_eq!(MediaKind::Image.to_string(), "image");
    }

    #[test]
    fn test_descriptor_rejects_empty_url() {
        assert!(MediaDescriptor::new(MediaKind::Image, "").is_none());
        assert!(MediaDescriptor::new(MediaKind::Image, "https://x.com/a.png").is_some());
    }

    #[test]
    fn test_descriptor_drops_empty_metadata() {
        let d = MediaDescriptor::new(MediaKind::Video, "a.mp4")
            .unwrap()
            .with_metadata(MediaMetadata::default());
        assert!(d.metadata.is_none());
    }

    #[test]
    fn test_descriptor_serde_skips_empty() {
        let d = MediaDescriptor::new(MediaKind::Video, "https://x.com/a.mp4").unwrap();
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "video", "primary_url": "https://x.com/a.mp4"})
        );
    }

    #[test]
    fn test_social_download_parse() {
        let json = r#"{
            "date": "2025-01-01",
            "title": "clip",
            "links": [{"url": "https://cdn/x.mp4", "quality": "hd_no_watermark", "type": "video", "ext": "mp4"}],
            "dev": "someone"
        }"#;
        let parsed: SocialDownload = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.links.len(), 1);
        assert_eq!(parsed.links[0].link_type, "video");
    }

    #[test]
    fn test_image_reply_fallback() {
        let reply: ImageReply = serde_json::from_str(r#"{"url": "", "resp": "https://x/y.png"}"#).unwrap();
        assert_eq!(reply.image_url(), Some("https://x/y.png"));
        assert_eq!(ImageReply::default().image_url(), None);
    }
}
