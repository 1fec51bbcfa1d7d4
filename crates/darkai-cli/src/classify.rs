use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use darkai_media::MediaProcessor;
use darkai_types::MediaDescriptor;

use crate::generate::print_descriptor;

/// Normalize a saved API response and print the descriptor.
pub fn run_classify(path: Option<&Path>) -> Result<()> {
    let input = match path {
        Some(p) => {
            std::fs::read_to_string(p).with_context(|| format!("Failed to read {}", p.display()))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    match classify_text(&input)? {
        Some(media) => print_descriptor(&media)?,
        None => println!("Nothing to display"),
    }
    Ok(())
}

/// Parse `input` as JSON, treating non-JSON text as a bare string response.
fn classify_text(input: &str) -> Result<Option<MediaDescriptor>> {
    let trimmed = input.trim();
    let response = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => value,
        Err(_) if !trimmed.starts_with(['{', '[']) => Value::String(trimmed.to_string()),
        Err(e) => return Err(e).context("Failed to parse response JSON"),
    };

    let processor = MediaProcessor::new();
    processor.on_processing_change(|processing| {
        tracing::debug!(processing, "Media processor state changed");
    });
    Ok(processor.process(&response))
}
