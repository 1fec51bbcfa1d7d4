use anyhow::{Context, Result, bail};

use darkai_client::{
    DarkAiClient, HttpUploader, MediaResult, MusicRequest, TtsRequest, UploadFile, Uploader,
    VideoRequest,
};
use darkai_config::DarkAiConfig;
use darkai_media::labels::{download_filename, format_quality_label};
use darkai_media::normalize::classify;
use darkai_types::{MediaDescriptor, SocialDownload};

use crate::{Commands, ImageSource};

/// Run one upstream action (or upload) and print its result.
pub async fn run(command: Commands, config: DarkAiConfig) -> Result<()> {
    let client = || DarkAiClient::new(config.api.clone());

    match command {
        Commands::Upload { path } => {
            let uploader = HttpUploader::from_config(&config.upload)?;
            let file = UploadFile::from_path(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            println!("{}", uploader.upload(file).await?);
        }
        Commands::Text { model, prompt } => {
            println!("{}", client()?.generate_text(model, &prompt).await?);
        }
        Commands::Tts { text, voice, style } => {
            let result = client()?
                .text_to_speech(&TtsRequest { text, voice, style })
                .await?;
            print_media(&result)?;
        }
        Commands::Video {
            mode,
            prompt,
            image,
        } => {
            let image_url = resolve_image(&image, &config).await?;
            let result = client()?
                .generate_video(&VideoRequest {
                    mode,
                    prompt,
                    image_url,
                })
                .await?;
            print_media(&result)?;
        }
        Commands::Music { mode, text, tags } => {
            let result = client()?
                .create_music(&MusicRequest { mode, text, tags })
                .await?;
            print_media(&result)?;
        }
        Commands::Social { url } => {
            let result = client()?.social_download(&url).await?;
            print_social(&result);
            print_media(&result)?;
        }
        Commands::RemoveBg { image } => {
            let Some(image_url) = resolve_image(&image, &config).await? else {
                bail!("Please upload an image or enter an image URL");
            };
            let result = client()?.remove_background(&image_url).await?;
            print_media(&result)?;
        }
        Commands::Image {
            model,
            prompt,
            image,
        } => {
            let source = resolve_image(&image, &config).await?;
            let url = client()?
                .generate_image(model, &prompt, source.as_deref())
                .await?;
            print_image_url(url)?;
        }
        Commands::Merge { prompt, images } => {
            let url = client()?.merge_images(&prompt, &images).await?;
            print_image_url(url)?;
        }
        Commands::Classify { .. } | Commands::Config { .. } => {
            bail!("not an upstream action")
        }
    }

    Ok(())
}

/// Use the given URL, or upload the given file and use its hosted URL.
async fn resolve_image(source: &ImageSource, config: &DarkAiConfig) -> Result<Option<String>> {
    if let Some(url) = &source.image_url {
        return Ok(Some(url.clone()));
    }
    let Some(path) = &source.image_file else {
        return Ok(None);
    };
    let uploader = HttpUploader::from_config(&config.upload)?;
    let file = UploadFile::from_path(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let url = uploader.upload(file).await.context("Failed to upload image")?;
    tracing::info!(%url, "Using uploaded image");
    Ok(Some(url))
}

fn print_media(result: &MediaResult) -> Result<()> {
    match (&result.media, result.reply()) {
        (Some(media), _) => print_descriptor(media)?,
        (None, Some(reply)) => println!("{reply}"),
        (None, None) => println!("Nothing to display"),
    }
    Ok(())
}

fn print_image_url(url: Option<String>) -> Result<()> {
    match url.and_then(|u| classify(&serde_json::Value::String(u)).into_descriptor()) {
        Some(media) => print_descriptor(&media)?,
        None => println!("Nothing to display"),
    }
    Ok(())
}

/// Labelled download options with suggested file names.
fn print_social(result: &MediaResult) {
    let Ok(download) = serde_json::from_value::<SocialDownload>(result.raw.clone()) else {
        return;
    };
    eprintln!("Found {} download options for \"{}\"", download.links.len(), download.title);
    for link in &download.links {
        eprintln!(
            "  {:<28} {}  ->  {}",
            format_quality_label(link),
            link.url,
            download_filename(&download.title, link)
        );
    }
}

pub(crate) fn print_descriptor(media: &MediaDescriptor) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(media)?);
    Ok(())
}
