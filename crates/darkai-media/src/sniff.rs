//! Media kind detection from URL text.

use darkai_types::MediaKind;

const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".webm", ".ogg", ".avi", ".mov", ".mkv"];
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg"];
// ".ogg" is also listed for video, which is checked first and always wins.
const AUDIO_EXTENSIONS: &[&str] = &[".mp3", ".wav", ".ogg", ".m4a", ".aac", ".flac"];

const VIDEO_KEYWORDS: &[&str] = &["video", "youtube", "vimeo"];
const AUDIO_KEYWORDS: &[&str] = &["audio", "sound", "music"];

/// Guess what a URL (or data URI) points at from its text alone.
///
/// Extensions are matched anywhere in the lower-cased URL, video before
/// image before audio. Without an extension match, keywords decide, and
/// anything left over is assumed to be an image.
pub fn detect_media_kind(url: &str) -> MediaKind {
    let url = url.to_lowercase();
    let contains_any = |needles: &[&str]| needles.iter().any(|n| url.contains(n));

    if contains_any(VIDEO_EXTENSIONS) {
        MediaKind::Video
    } else if contains_any(IMAGE_EXTENSIONS) {
        MediaKind::Image
    } else if contains_any(AUDIO_EXTENSIONS) {
        MediaKind::Audio
    } else if contains_any(VIDEO_KEYWORDS) {
        MediaKind::Video
    } else if contains_any(AUDIO_KEYWORDS) {
        MediaKind::Audio
    } else {
        MediaKind::Image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_extension() {
        assert_eq!(detect_media_kind("https://x.com/clip.mp4"), MediaKind::Video);
        assert_eq!(detect_media_kind("https://x.com/CLIP.MOV?sig=1"), MediaKind::Video);
    }

    #[test]
    fn test_ogg_is_always_video() {
        assert_eq!(detect_media_kind("https://x.com/track.ogg"), MediaKind::Video);
        assert_eq!(
            detect_media_kind("https://x.com/music/track.ogg"),
            MediaKind::Video
        );
    }

    #[test]
    fn test_image_extension_beats_audio() {
        assert_eq!(detect_media_kind("https://x.com/cover.png"), MediaKind::Image);
        assert_eq!(
            detect_media_kind("https://x.com/song.mp3/cover.jpg"),
            MediaKind::Image
        );
    }

    #[test]
    fn test_audio_extension() {
        assert_eq!(detect_media_kind("https://x.com/speech.mp3"), MediaKind::Audio);
        assert_eq!(detect_media_kind("https://x.com/a.FLAC"), MediaKind::Audio);
    }

    #[test]
    fn test_keyword_fallback() {
        assert_eq!(
            detect_media_kind("https://cdn.example.com/music/stream?id=1"),
            MediaKind::Audio
        );
        assert_eq!(
            detect_media_kind("https://www.youtube.com/watch?v=abc"),
            MediaKind::Video
        );
        // video keywords are checked before audio keywords
        assert_eq!(
            detect_media_kind("https://x.com/video/sound/1"),
            MediaKind::Video
        );
    }

    #[test]
    fn test_default_is_image() {
        assert_eq!(detect_media_kind("https://example.com/asset"), MediaKind::Image);
        assert_eq!(detect_media_kind("data:application/octet-stream;base64,AAAA"), MediaKind::Image);
    }
}
