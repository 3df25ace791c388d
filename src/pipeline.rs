//! Processing pipeline
//!
//! One run takes one photograph through detection, overlay rendering,
//! recognition and field extraction. Runs are independent; nothing carries
//! over between them except the loaded OCR models.

use image::{DynamicImage, ImageFormat, RgbaImage};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::extract::{extract_fields, ExtractedFields};
use crate::overlay::{render_overlay, OverlayStyle};
use crate::vision::{
    init_paddle_ocr, join_transcript, BoundingBox, DetectionConfig, ModelManager, PaddleDetector,
    PaddleRecognizer, Recognition, TextRecognizer, TextRegionProvider,
};

/// Failures surfaced to the presentation layer
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unsupported image format {0:?} (expected JPEG or PNG)")]
    UnsupportedFormat(String),
    #[error("failed to read image {path}")]
    ImageLoad {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("OCR engine initialization failed")]
    Engine(#[source] anyhow::Error),
    #[error("text detection failed")]
    Detection(#[source] anyhow::Error),
    #[error("text recognition failed")]
    Recognition(#[source] anyhow::Error),
}

/// Everything one run produces for display
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// Detected regions, in detection order
    pub boxes: Vec<BoundingBox>,
    /// Source image with the regions outlined
    pub overlay: RgbaImage,
    /// Per-region recognizer output
    pub recognitions: Vec<Recognition>,
    /// Comma-joined recognized text
    pub transcript: String,
    /// Fields pulled from the transcript
    pub fields: ExtractedFields,
}

/// Load a photograph, accepting only JPEG and PNG files
pub fn load_image(path: &Path) -> Result<DynamicImage, PipelineError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let format = match extension.as_str() {
        "jpg" | "jpeg" => ImageFormat::Jpeg,
        "png" => ImageFormat::Png,
        _ => return Err(PipelineError::UnsupportedFormat(extension)),
    };

    let load_error = |source| PipelineError::ImageLoad {
        path: path.display().to_string(),
        source,
    };

    let mut reader = image::ImageReader::open(path)
        .map_err(|e| load_error(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| load_error(image::ImageError::IoError(e)))?;

    // A PNG saved as .jpg still decodes; anything else goes by the extension
    if !matches!(reader.format(), Some(ImageFormat::Jpeg | ImageFormat::Png)) {
        reader.set_format(format);
    }

    reader.decode().map_err(load_error)
}

/// Detector and recognizer plus the settings they run with
pub struct Pipeline<P, R> {
    provider: P,
    recognizer: R,
    detection: DetectionConfig,
    style: OverlayStyle,
}

impl<P: TextRegionProvider, R: TextRecognizer> Pipeline<P, R> {
    pub fn new(provider: P, recognizer: R, config: &AppConfig) -> Self {
        Self {
            provider,
            recognizer,
            detection: config.detection.clone(),
            style: config.overlay.clone(),
        }
    }

    /// Run one image from pixels to extracted fields
    pub fn process(&mut self, image: &DynamicImage) -> Result<ProcessOutcome, PipelineError> {
        debug!("Processing {}x{} image", image.width(), image.height());

        let boxes = self
            .provider
            .detect(image, &self.detection)
            .map_err(PipelineError::Detection)?;
        debug!("{} text regions detected", boxes.len());

        let overlay = render_overlay(image, &boxes, &self.style);

        let recognitions = self
            .recognizer
            .recognize(image, &boxes)
            .map_err(PipelineError::Recognition)?;

        let transcript = join_transcript(&recognitions);
        let fields = extract_fields(&transcript);

        info!(
            "Processed image: {} regions, {} transcript chars, document kind {:?}",
            boxes.len(),
            transcript.len(),
            fields.kind()
        );

        Ok(ProcessOutcome {
            boxes,
            overlay,
            recognitions,
            transcript,
            fields,
        })
    }
}

/// The production pipeline backed by PaddleOCR models
pub type PaddlePipeline = Pipeline<PaddleDetector, PaddleRecognizer>;

impl PaddlePipeline {
    /// Fetch models if needed and load both ONNX sessions
    pub fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        let manager = ModelManager::from_settings(&config.models).map_err(PipelineError::Engine)?;
        let (detector, recognizer) = init_paddle_ocr(&manager).map_err(PipelineError::Engine)?;
        Ok(Self::new(detector, recognizer, config))
    }
}
