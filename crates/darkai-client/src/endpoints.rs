//! Static endpoint tables keyed by user-selectable identifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

/// Declares a closed identifier enum with its string id and endpoint path.
macro_rules! endpoint_table {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => ($id:literal, $path:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Identifier accepted by [`FromStr`].
            pub fn id(&self) -> &'static str {
                match self {
                    $($name::$variant => $id),+
                }
            }

            /// Endpoint path relative to the API base URL.
            pub fn path(&self) -> &'static str {
                match self {
                    $($name::$variant => $path),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.id())
            }
        }

        impl FromStr for $name {
            type Err = ClientError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.id() == s)
                    .ok_or_else(|| ClientError::UnknownIdentifier {
                        kind: $kind,
                        value: s.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|v| v.id())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

endpoint_table! {
    /// Chat/text generation models.
    TextModel, "text model" {
        Online => ("online", "/api/ai/online"),
        Standard => ("standard", "/api/ai/standard"),
        SuperGenius => ("super-genius", "/api/ai/super-genius"),
        OnlineGenius => ("online-genius", "/api/ai/online-genius"),
        GeminiPro => ("gemini-pro", "/api/gemini/pro"),
        GeminiDeep => ("gemini-deep", "/api/gemini/deep"),
        GeminiFlash => ("gemini-flash", "/api/gemini/flash"),
        Gemma4b => ("gemma-4b", "/api/gemma/4b"),
        Gemma12b => ("gemma-12b", "/api/gemma/12b"),
        Gemma27b => ("gemma-27b", "/api/gemma/27b"),
        WormGpt => ("wormgpt", "/api/wormgpt"),
    }
}

endpoint_table! {
    /// Video generation modes.
    VideoMode, "video type" {
        TextToVideo => ("text-to-video", "/api/veo3/text-to-video"),
        ImageToVideo => ("image-to-video", "/api/veo3/image-to-video"),
    }
}

endpoint_table! {
    /// Music generation modes.
    MusicMode, "music type" {
        Instrumental15s => ("15s-instrumental", "/api/create-music"),
        FullSong => ("full-song", "/api/music"),
    }
}

endpoint_table! {
    /// Image generation models.
    ImageModel, "image model" {
        Gemini => ("gemini", "/api/api/gemini-img/edit"),
        Gpt => ("gpt", "/api/api/gpt-img/edit"),
        FluxPro => ("flux-pro", "/api/api/flux-pro"),
        ImgCv => ("img-cv", "/api/api/img-cv"),
    }
}

impl ImageModel {
    /// Whether the model accepts a source image to edit.
    pub fn supports_source_image(&self) -> bool {
        matches!(self, ImageModel::Gemini | ImageModel::Gpt)
    }
}

pub const TTS_PATH: &str = "/api/voice";
pub const TTS_CUSTOM_PATH: &str = "/api/voice/custom";
pub const SOCIAL_DOWNLOAD_PATH: &str = "/api/social-downloader";
pub const REMOVE_BG_PATH: &str = "/api/remove-bg";
pub const IMAGE_MERGE_PATH: &str = "/api/api/nano-banana";

/// Voices offered by the text-to-speech endpoint.
pub const VOICES: &[&str] = &["nova", "alloy", "verse", "flow", "aria", "lumen"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_model_table() {
        assert_eq!(TextModel::ALL.len(), 11);
        assert_eq!("gemini-deep".parse::<TextModel>().unwrap().path(), "/api/gemini/deep");
        assert_eq!("wormgpt".parse::<TextModel>().unwrap(), TextModel::WormGpt);
        for model in TextModel::ALL {
            assert_eq!(model.id().parse::<TextModel>().unwrap(), *model);
        }
    }

    #[test]
    fn test_unknown_identifier() {
        let err = "gpt-9".parse::<TextModel>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("gpt-9"));
        assert!(msg.contains("gemma-27b"));
    }

    #[test]
    fn test_video_and_music_paths() {
        assert_eq!(VideoMode::ImageToVideo.path(), "/api/veo3/image-to-video");
        assert_eq!(
            "15s-instrumental".parse::<MusicMode>().unwrap().path(),
            "/api/create-music"
        );
        assert_eq!(MusicMode::FullSong.to_string(), "full-song");
    }

    #[test]
    fn test_image_models() {
        assert!(ImageModel::Gpt.supports_source_image());
        assert!(!ImageModel::FluxPro.supports_source_image());
        assert_eq!("img-cv".parse::<ImageModel>().unwrap().path(), "/api/api/img-cv");
    }
}
