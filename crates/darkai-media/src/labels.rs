//! Labels and file names for social download links.

use std::sync::LazyLock;

use regex::Regex;

use darkai_types::SocialLink;

static NON_ALPHANUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]").unwrap());

const MAX_TITLE_CHARS: usize = 50;

/// Human readable label for a download option.
pub fn format_quality_label(link: &SocialLink) -> String {
    let quality = link.quality.as_str();
    match link.link_type.as_str() {
        "audio" => format!("Audio ({quality})"),
        "video" => match quality {
            "hd_no_watermark" => "HD Video (No Watermark)".to_string(),
            "no_watermark" => "Video (No Watermark)".to_string(),
            "watermark" => "Video (With Watermark)".to_string(),
            other => format!("Video ({other})"),
        },
        _ => quality.to_string(),
    }
}

/// File name to save a download option under, e.g. `My_clip_hd.mp4`.
pub fn download_filename(title: &str, link: &SocialLink) -> String {
    let clean: String = NON_ALPHANUMERIC
        .replace_all(title, "_")
        .chars()
        .take(MAX_TITLE_CHARS)
        .collect();
    let extension = if link.link_type == "audio" { "mp3" } else { "mp4" };
    format!("{clean}_{}.{extension}", link.quality)
}
