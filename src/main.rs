//! idcard-ocr - read PAN and Aadhaar cards from photographs
//!
//! Detects text regions, outlines them for review, recognizes their text and
//! pulls the card's identity fields out of the joined transcript.

mod config;
mod dashboard;
mod extract;
mod overlay;
mod pipeline;
mod storage;
mod vision;

use anyhow::{Context, Result};
use clap::Parser;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::AppConfig;
use crate::extract::ExtractedFields;
use crate::pipeline::{load_image, PaddlePipeline};

/// idcard-ocr - PAN and Aadhaar card field extraction
#[derive(Parser, Debug)]
#[command(name = "idcard-ocr")]
#[command(about = "Extract identity fields from photographs of PAN and Aadhaar cards")]
struct Args {
    /// Process this image and print the results instead of opening the viewer
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Write the region overlay to this PNG file (with --image)
    #[arg(long, requires = "image")]
    overlay_out: Option<PathBuf>,

    /// Print extracted fields as JSON (with --image)
    #[arg(long, requires = "image")]
    json: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Never download OCR models
    #[arg(long)]
    offline: bool,
}

fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for results
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => load_or_create_config(),
    };
    if args.offline {
        config.models.offline = true;
    }

    match &args.image {
        Some(image_path) => run_headless(&config, image_path, args.overlay_out.as_deref(), args.json),
        None => run_with_viewer(config),
    }
}

/// Load configuration from the default location, falling back to defaults
fn load_or_create_config() -> AppConfig {
    if let Ok(config_path) = config::default_config_path() {
        if config_path.exists() {
            match config::load_config(&config_path) {
                Ok(config) => {
                    info!("Loaded configuration from {:?}", config_path);
                    return config;
                }
                Err(e) => tracing::warn!("Ignoring configuration: {:#}", e),
            }
        }
    }
    info!("Using default configuration");
    AppConfig::default()
}

/// Process a single image and print the results
fn run_headless(
    config: &AppConfig,
    image_path: &Path,
    overlay_out: Option<&Path>,
    json: bool,
) -> Result<()> {
    let image = load_image(image_path)?;
    let mut pipeline = PaddlePipeline::from_config(config)?;
    let outcome = pipeline.process(&image)?;

    if let Some(path) = overlay_out {
        outcome
            .overlay
            .save_with_format(path, ImageFormat::Png)
            .with_context(|| format!("Failed to write overlay {:?}", path))?;
        info!("Overlay written to {:?}", path);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.fields)?);
    } else {
        print!("{}", format_fields(&outcome.fields));
        println!();
        println!("Raw Detected Text:");
        println!("{}", outcome.transcript);
    }

    Ok(())
}

/// `key: value` lines in display order
fn format_fields(fields: &ExtractedFields) -> String {
    if fields.is_empty() {
        return "No fields extracted\n".to_string();
    }
    fields
        .entries()
        .iter()
        .map(|(key, value)| format!("{}: {}\n", key, value))
        .collect()
}

/// Run with the viewer window
fn run_with_viewer(config: AppConfig) -> Result<()> {
    info!("Starting viewer");

    // Run the viewer (blocking)
    if let Err(e) = dashboard::run_viewer(config) {
        tracing::error!("Viewer error: {}", e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_fields;

    #[test]
    fn test_format_fields_aadhaar() {
        let fields = extract_fields("Government of India,Name John Smith,1234 5678 9012,Male,DOB: 01/01/1990");
        assert_eq!(
            format_fields(&fields),
            "ID Type: Aadhaar\nAadhaar Number: 1234 5678 9012\nName: John Smith\nDate of Birth: 01/01/1990\nSex: Male\n"
        );
    }

    #[test]
    fn test_format_fields_unknown() {
        assert_eq!(format_fields(&ExtractedFields::Unknown), "No fields extracted\n");
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["idcard-ocr", "--image", "card.jpg", "--json", "--offline"]);
        assert_eq!(args.image, Some(PathBuf::from("card.jpg")));
        assert!(args.json);
        assert!(args.offline);
        assert!(args.overlay_out.is_none());
    }

    #[test]
    fn test_json_requires_image() {
        assert!(Args::try_parse_from(["idcard-ocr", "--json"]).is_err());
    }
}
