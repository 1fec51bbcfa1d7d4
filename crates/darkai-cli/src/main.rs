mod classify;
mod generate;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};

use darkai_client::endpoints::VOICES;
use darkai_client::{ImageModel, MusicMode, TextModel, VideoMode};
use darkai_config::DarkAiConfig;

#[derive(Parser)]
#[command(name = "darkai", about = "DarkAI platform client")]
struct Cli {
    /// Config file (defaults to ~/.darkai/config.json5)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Where a source image comes from.
#[derive(clap::Args, Debug)]
#[group(multiple = false)]
struct ImageSource {
    /// Public URL of the source image
    #[arg(long)]
    image_url: Option<String>,

    /// Local image to upload first
    #[arg(long)]
    image_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with a text model
    Text {
        /// Model to use
        #[arg(short, long, default_value = "standard")]
        model: TextModel,

        /// Prompt text
        prompt: String,
    },
    /// Convert text to speech
    Tts {
        /// Text to speak
        text: String,

        /// Voice to use (selects the custom voice endpoint)
        #[arg(long, value_parser = PossibleValuesParser::new(VOICES.iter().copied()))]
        voice: Option<String>,

        /// Speaking style (selects the custom voice endpoint)
        #[arg(long)]
        style: Option<String>,
    },
    /// Generate a video
    Video {
        /// text-to-video or image-to-video
        #[arg(short, long, default_value = "text-to-video")]
        mode: VideoMode,

        /// Prompt text
        prompt: String,

        #[command(flatten)]
        image: ImageSource,
    },
    /// Generate music
    Music {
        /// 15s-instrumental or full-song
        #[arg(short, long, default_value = "15s-instrumental")]
        mode: MusicMode,

        /// Description (instrumental) or lyrics (full song)
        text: String,

        /// Genre tags for full songs
        #[arg(long)]
        tags: Option<String>,
    },
    /// Find download options for a social media post
    Social {
        /// Post URL
        url: String,
    },
    /// Remove the background of an image
    RemoveBg {
        #[command(flatten)]
        image: ImageSource,
    },
    /// Generate or edit an image
    Image {
        /// Model to use
        #[arg(short, long, default_value = "flux-pro")]
        model: ImageModel,

        /// Prompt text
        prompt: String,

        #[command(flatten)]
        image: ImageSource,
    },
    /// Merge several images
    Merge {
        /// Prompt text
        prompt: String,

        /// Image URLs to merge
        #[arg(long = "image", required = true)]
        images: Vec<String>,
    },
    /// Upload an image and print its hosted URL
    Upload {
        /// Image file
        path: PathBuf,
    },
    /// Normalize an API response (JSON file, or stdin when omitted)
    Classify {
        /// JSON document to classify
        path: Option<PathBuf>,
    },
    /// Show or create the configuration file
    Config {
        /// Write the current configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Classify { path } = &cli.command {
        return classify::run_classify(path.as_deref());
    }

    let config_path = match cli.config {
        Some(path) => path,
        None => darkai_config::config_file_path()?,
    };
    let config = darkai_config::load_config_with_env(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if let Commands::Config { init } = cli.command {
        return show_config(&config, init.then_some(config_path.as_path()));
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(generate::run(cli.command, config))
}

/// Print the effective configuration with secrets masked, writing it to
/// `write_to` first when given.
fn show_config(config: &DarkAiConfig, write_to: Option<&Path>) -> anyhow::Result<()> {
    if let Some(path) = write_to {
        darkai_config::save_config_to(config, path)?;
        println!("Wrote {}", path.display());
    }

    let mut shown = config.clone();
    if shown.api.api_key.is_some() {
        shown.api.api_key = Some("***".into());
    }
    if shown.upload.token.is_some() {
        shown.upload.token = Some("***".into());
    }
    println!("{}", serde_json::to_string_pretty(&shown)?);
    Ok(())
}
