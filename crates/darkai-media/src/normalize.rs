//! Upstream API response normalization.
//!
//! Generation and download endpoints answer in many shapes. [`classify`]
//! walks a fixed, priority-ordered rule table and turns the first shape it
//! recognizes into a [`MediaDescriptor`]. A response nobody recognizes is
//! not an error: it simply has nothing to display.

use serde_json::Value;
use thiserror::Error;

use darkai_types::{DownloadLink, MediaDescriptor, MediaKind, MediaMetadata};

use crate::sniff::detect_media_kind;

/// Internal failure while building a descriptor from a recognized shape.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("{rule}: first entry has no url")]
    MissingPrimaryUrl { rule: &'static str },
    #[error("{rule}: empty primary url")]
    EmptyUrl { rule: &'static str },
}

/// Outcome of classifying one response.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Recognized(MediaDescriptor),
    NotRecognized,
}

impl Classification {
    pub fn into_descriptor(self) -> Option<MediaDescriptor> {
        match self {
            Classification::Recognized(d) => Some(d),
            Classification::NotRecognized => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Classification::Recognized(_))
    }
}

type RuleResult = Result<Option<MediaDescriptor>, ClassifyError>;

/// One recognized response shape. `Ok(None)` means "not this shape".
struct Rule {
    name: &'static str,
    apply: fn(&Value) -> RuleResult,
}

/// Checked top to bottom; the first rule returning a descriptor (or an error) wins.
const RULES: &[Rule] = &[
    Rule { name: "url", apply: single_url },
    Rule { name: "video_url", apply: video_url },
    Rule { name: "audio_url", apply: audio_url },
    Rule { name: "voice", apply: voice },
    Rule { name: "image_url", apply: image_url },
    Rule { name: "download_links", apply: download_links },
    Rule { name: "links", apply: links },
    Rule { name: "bare_string", apply: bare_string },
    Rule { name: "data.url", apply: nested_data },
];

/// Classify `response`, reporting internal failures to the caller.
pub fn try_classify(response: &Value) -> Result<Classification, ClassifyError> {
    for rule in RULES {
        if let Some(descriptor) = (rule.apply)(response)? {
            tracing::debug!(
                rule = rule.name,
                kind = %descriptor.kind,
                url = %descriptor.primary_url,
                "Recognized media response"
            );
            return Ok(Classification::Recognized(descriptor));
        }
    }
    tracing::debug!("No media rule matched response");
    Ok(Classification::NotRecognized)
}

/// Classify `response`. Internal failures are logged and reported as
/// [`Classification::NotRecognized`].
pub fn classify(response: &Value) -> Classification {
    match try_classify(response) {
        Ok(classification) => classification,
        Err(e) => {
            tracing::warn!("Error processing media response: {e}");
            Classification::NotRecognized
        }
    }
}

// ──────────────────── Rules ────────────────────

fn single_url(response: &Value) -> RuleResult {
    let Some(url) = str_field(response, "url") else {
        return Ok(None);
    };
    let metadata = MediaMetadata {
        title: string_field(response, "title").or_else(|| string_field(response, "name")),
        size_label: label_field(response, "size"),
        duration_seconds: seconds_field(response, "duration"),
        ..Default::default()
    };
    Ok(Some(
        descriptor("url", detect_media_kind(url), url)?.with_metadata(metadata),
    ))
}

fn video_url(response: &Value) -> RuleResult {
    let Some(url) = str_field(response, "video_url") else {
        return Ok(None);
    };
    Ok(Some(
        descriptor("video_url", MediaKind::Video, url)?.with_metadata(title_and_duration(response)),
    ))
}

fn audio_url(response: &Value) -> RuleResult {
    let Some(url) = str_field(response, "audio_url") else {
        return Ok(None);
    };
    Ok(Some(
        descriptor("audio_url", MediaKind::Audio, url)?.with_metadata(title_and_duration(response)),
    ))
}

/// Text-to-speech responses name the audio field `voice`.
fn voice(response: &Value) -> RuleResult {
    let Some(url) = str_field(response, "voice") else {
        return Ok(None);
    };
    let metadata = MediaMetadata {
        title: string_field(response, "voice_used").or_else(|| string_field(response, "title")),
        style_label: string_field(response, "style_used"),
        ..Default::default()
    };
    Ok(Some(
        descriptor("voice", MediaKind::Audio, url)?.with_metadata(metadata),
    ))
}

fn image_url(response: &Value) -> RuleResult {
    let Some(url) = str_field(response, "image_url") else {
        return Ok(None);
    };
    let metadata = MediaMetadata {
        title: string_field(response, "title"),
        ..Default::default()
    };
    Ok(Some(
        descriptor("image_url", MediaKind::Image, url)?.with_metadata(metadata),
    ))
}

fn download_links(response: &Value) -> RuleResult {
    let Some(entries) = non_empty_array(response, "download_links") else {
        return Ok(None);
    };
    link_list("download_links", response, entries, |entry, _| {
        let url = str_field(entry, "url")?;
        let quality = string_field(entry, "quality");
        let label = quality
            .clone()
            .or_else(|| string_field(entry, "label"))
            .unwrap_or_else(|| format_label(entry));
        Some(DownloadLink {
            url: url.to_string(),
            label,
            quality,
        })
    })
}

/// Like `download_links`, but entries may also be bare URL strings.
fn links(response: &Value) -> RuleResult {
    let Some(entries) = non_empty_array(response, "links") else {
        return Ok(None);
    };
    link_list("links", response, entries, |entry, index| {
        let option_label = || format!("Download Option {}", index + 1);
        if let Some(url) = entry.as_str().filter(|s| !s.is_empty()) {
            return Some(DownloadLink {
                url: url.to_string(),
                label: option_label(),
                quality: None,
            });
        }
        let url = str_field(entry, "url")?;
        let quality = string_field(entry, "quality");
        let label = quality
            .clone()
            .or_else(|| string_field(entry, "label"))
            .or_else(|| string_field(entry, "format").map(|f| format!("Download {f}")))
            .unwrap_or_else(option_label);
        Some(DownloadLink {
            url: url.to_string(),
            label,
            quality,
        })
    })
}

fn bare_string(response: &Value) -> RuleResult {
    let Some(url) = response
        .as_str()
        .filter(|s| s.starts_with("http") || s.starts_with("data:"))
    else {
        return Ok(None);
    };
    Ok(Some(descriptor("bare_string", detect_media_kind(url), url)?))
}

fn nested_data(response: &Value) -> RuleResult {
    let Some(data) = response.get("data").filter(|d| d.is_object()) else {
        return Ok(None);
    };
    let Some(url) = str_field(data, "url") else {
        return Ok(None);
    };
    let metadata = data
        .get("metadata")
        .filter(|m| m.is_object())
        .or_else(|| response.get("metadata").filter(|m| m.is_object()))
        .map(metadata_record)
        .unwrap_or_default();
    Ok(Some(
        descriptor("data.url", detect_media_kind(url), url)?.with_metadata(metadata),
    ))
}

// ──────────────────── Helpers ────────────────────

fn descriptor(rule: &'static str, kind: MediaKind, url: &str) -> Result<MediaDescriptor, ClassifyError> {
    MediaDescriptor::new(kind, url).ok_or(ClassifyError::EmptyUrl { rule })
}

/// Build a descriptor from a list of link entries. The first entry must
/// yield a link; later entries that don't are skipped.
fn link_list<F>(rule: &'static str, response: &Value, entries: &[Value], to_link: F) -> RuleResult
where
    F: Fn(&Value, usize) -> Option<DownloadLink>,
{
    let primary = to_link(&entries[0], 0).ok_or(ClassifyError::MissingPrimaryUrl { rule })?;

    let mut alternates = Vec::with_capacity(entries.len());
    alternates.push(primary);
    for (index, entry) in entries.iter().enumerate().skip(1) {
        match to_link(entry, index) {
            Some(link) => alternates.push(link),
            None => tracing::debug!(rule, index, "Skipping link entry without url"),
        }
    }

    let primary_url = alternates[0].url.clone();
    Ok(Some(
        descriptor(rule, detect_media_kind(&primary_url), &primary_url)?
            .with_links(alternates)
            .with_metadata(title_and_duration(response)),
    ))
}

fn format_label(entry: &Value) -> String {
    match string_field(entry, "format") {
        Some(format) => format!("Download {format}"),
        None => "Download".to_string(),
    }
}

fn title_and_duration(response: &Value) -> MediaMetadata {
    MediaMetadata {
        title: string_field(response, "title"),
        duration_seconds: seconds_field(response, "duration"),
        ..Default::default()
    }
}

/// Read a free-form metadata object.
fn metadata_record(value: &Value) -> MediaMetadata {
    MediaMetadata {
        title: string_field(value, "title").or_else(|| string_field(value, "name")),
        duration_seconds: seconds_field(value, "duration")
            .or_else(|| seconds_field(value, "duration_seconds")),
        size_label: label_field(value, "size").or_else(|| label_field(value, "size_label")),
        style_label: string_field(value, "style").or_else(|| string_field(value, "style_label")),
    }
}

/// Non-empty string field.
fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    str_field(value, key).map(str::to_string)
}

/// String or number, rendered as text.
fn label_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::Number(n) => Some(n.to_string()),
        other => other.as_str().filter(|s| !s.is_empty()).map(str::to_string),
    }
}

/// Number, or a string holding one.
fn seconds_field(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn non_empty_array<'a>(value: &'a Value, key: &str) -> Option<&'a [Value]> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .filter(|entries| !entries.is_empty())
}
