//! Vision/OCR Layer
//!
//! Locates text regions on a card photograph and recognizes the text inside
//! them. The rest of the crate only talks to the two traits below; the
//! PaddleOCR backend (ONNX Runtime) is one implementation of each.

pub mod detection;
pub mod models;
pub mod preprocess;
pub mod recognition;

pub use detection::PaddleDetector;
pub use models::{ModelManager, ModelType};
pub use recognition::PaddleRecognizer;

use anyhow::Result;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Quadrilateral text region on the source image.
///
/// Corners are stored clockwise from the top-left: top-left, top-right,
/// bottom-right, bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    corners: [(f32, f32); 4],
}

impl BoundingBox {
    /// Create a box from four corner points
    pub fn new(corners: [(f32, f32); 4]) -> Self {
        Self { corners }
    }

    /// Create an axis-aligned box from its extents
    pub fn from_extents(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            corners: [(left, top), (right, top), (right, bottom), (left, bottom)],
        }
    }

    pub fn corners(&self) -> &[(f32, f32); 4] {
        &self.corners
    }

    pub fn left(&self) -> f32 {
        self.corners.iter().map(|p| p.0).fold(f32::INFINITY, f32::min)
    }

    pub fn right(&self) -> f32 {
        self.corners.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn top(&self) -> f32 {
        self.corners.iter().map(|p| p.1).fold(f32::INFINITY, f32::min)
    }

    pub fn bottom(&self) -> f32 {
        self.corners.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn width(&self) -> f32 {
        self.right() - self.left()
    }

    pub fn height(&self) -> f32 {
        self.bottom() - self.top()
    }

    pub fn center_y(&self) -> f32 {
        (self.top() + self.bottom()) / 2.0
    }

    /// Smallest axis-aligned box containing both boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::from_extents(
            self.left().min(other.left()),
            self.right().max(other.right()),
            self.top().min(other.top()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Axis-aligned pixel rectangle (x, y, width, height) clamped to an image.
    ///
    /// Returns `None` when nothing of the box lies inside the image.
    pub fn pixel_rect(&self, image_width: u32, image_height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.left().floor().clamp(0.0, image_width as f32) as u32;
        let y0 = self.top().floor().clamp(0.0, image_height as f32) as u32;
        let x1 = self.right().ceil().clamp(0.0, image_width as f32) as u32;
        let y1 = self.bottom().ceil().clamp(0.0, image_height as f32) as u32;

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some((x0, y0, x1 - x0, y1 - y0))
    }
}

/// Recognizer output for a single region
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    /// Region the text was read from
    pub bbox: BoundingBox,
    /// Recognized text
    pub text: String,
    /// Recognition confidence (0.0 - 1.0)
    pub confidence: f32,
}

/// Tuning knobs for text region detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Boxes on one line are merged when their gap is below this fraction of the box height
    pub width_threshold: f32,
    /// Image magnification applied before detection
    pub mag_ratio: f32,
    /// Probability above which a map pixel counts as text
    pub text_threshold: f32,
    /// Expansion applied to shrunk DB regions
    pub unclip_ratio: f32,
    /// Minimum box side in source pixels
    pub min_size: f32,
    /// Longest image side allowed after magnification
    pub max_side: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            width_threshold: 0.7,
            mag_ratio: 1.5,
            text_threshold: 0.3,
            unclip_ratio: 1.5,
            min_size: 3.0,
            max_side: 2560,
        }
    }
}

/// Finds regions likely to contain text
pub trait TextRegionProvider {
    fn detect(&mut self, image: &DynamicImage, config: &DetectionConfig) -> Result<Vec<BoundingBox>>;
}

/// Reads the text inside previously detected regions
pub trait TextRecognizer {
    fn recognize(&mut self, image: &DynamicImage, boxes: &[BoundingBox]) -> Result<Vec<Recognition>>;
}

/// Join recognized fragments, in detection order, into a single transcript
pub fn join_transcript(recognitions: &[Recognition]) -> String {
    recognitions
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Make sure the PaddleOCR models are present and load both stages
pub fn init_paddle_ocr(manager: &ModelManager) -> Result<(PaddleDetector, PaddleRecognizer)> {
    info!("Initializing PaddleOCR backend");

    if !manager.are_models_ready() {
        for (model_type, available, size) in manager.get_model_status() {
            debug!("{}: available={} size={:?}", model_type.display_name(), available, size);
        }
        info!("Fetching missing OCR models into {:?}", manager.models_dir());
    }

    let det_path = manager.ensure_model(ModelType::Detection)?;
    let rec_path = manager.ensure_model(ModelType::Recognition)?;
    let dict_path = manager.ensure_model(ModelType::Dictionary)?;

    let detector = PaddleDetector::new(&det_path)?;
    let recognizer = PaddleRecognizer::new(&rec_path, &dict_path)?;

    info!("PaddleOCR initialized successfully");
    Ok((detector, recognizer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extents_corner_order() {
        let bbox = BoundingBox::from_extents(10.0, 50.0, 5.0, 25.0);
        assert_eq!(
            bbox.corners(),
            &[(10.0, 5.0), (50.0, 5.0), (50.0, 25.0), (10.0, 25.0)]
        );
        assert_eq!(bbox.width(), 40.0);
        assert_eq!(bbox.height(), 20.0);
        assert_eq!(bbox.center_y(), 15.0);
    }

    #[test]
    fn test_extents_of_rotated_quad() {
        let bbox = BoundingBox::new([(12.0, 4.0), (40.0, 8.0), (38.0, 20.0), (10.0, 16.0)]);
        assert_eq!(bbox.left(), 10.0);
        assert_eq!(bbox.right(), 40.0);
        assert_eq!(bbox.top(), 4.0);
        assert_eq!(bbox.bottom(), 20.0);
    }

    #[test]
    fn test_pixel_rect_clamps_to_image() {
        let bbox = BoundingBox::from_extents(-5.0, 30.5, 2.2, 200.0);
        assert_eq!(bbox.pixel_rect(20, 100), Some((0, 2, 20, 98)));

        let outside = BoundingBox::from_extents(120.0, 130.0, 0.0, 10.0);
        assert_eq!(outside.pixel_rect(100, 100), None);
    }

    #[test]
    fn test_union() {
        let a = BoundingBox::from_extents(0.0, 10.0, 0.0, 10.0);
        let b = BoundingBox::from_extents(15.0, 30.0, 2.0, 12.0);
        assert_eq!(a.union(&b), BoundingBox::from_extents(0.0, 30.0, 0.0, 12.0));
    }

    #[test]
    fn test_join_transcript_keeps_detection_order() {
        let bbox = BoundingBox::from_extents(0.0, 1.0, 0.0, 1.0);
        let recognitions: Vec<Recognition> = ["GOVERNMENT OF INDIA", "Male", "1234 5678 9012"]
            .iter()
            .map(|text| Recognition {
                bbox,
                text: text.to_string(),
                confidence: 0.9,
            })
            .collect();

        assert_eq!(
            join_transcript(&recognitions),
            "GOVERNMENT OF INDIA,Male,1234 5678 9012"
        );
        assert_eq!(join_transcript(&[]), "");
    }

    #[test]
    fn test_detection_config_defaults() {
        let config = DetectionConfig::default();
        assert!((config.width_threshold - 0.7).abs() < f32::EPSILON);
        assert!((config.mag_ratio - 1.5).abs() < f32::EPSILON);
    }
}
