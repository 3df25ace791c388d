//! PaddleOCR text detection
//!
//! Runs the DB (Differentiable Binarization) detector and turns its
//! probability map into boxes on the source image.

use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use ndarray::{ArrayView2, Axis, Ix2};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use super::models::OnnxSession;
use super::preprocess::{resize_for_detection, to_nchw, PreprocessConfig};
use super::{BoundingBox, DetectionConfig, TextRegionProvider};

/// Vertical-center tolerance for two boxes to share a line, as a fraction of height
const LINE_CENTER_TOLERANCE: f32 = 0.5;

/// Text region provider backed by the PaddleOCR DB detection model
pub struct PaddleDetector {
    session: OnnxSession,
    preprocess: PreprocessConfig,
}

impl PaddleDetector {
    /// Load the detection model from a file
    pub fn new(model_path: &Path) -> Result<Self> {
        let session = OnnxSession::new(model_path).context("Failed to load detection model")?;
        Ok(Self {
            session,
            preprocess: PreprocessConfig::default(),
        })
    }
}

impl TextRegionProvider for PaddleDetector {
    fn detect(&mut self, image: &DynamicImage, config: &DetectionConfig) -> Result<Vec<BoundingBox>> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let input = resize_for_detection(&rgb, config.mag_ratio, config.max_side);
        let tensor = to_nchw(&input.image, &self.preprocess.det_mean, &self.preprocess.det_std);

        let output = self.session.run(tensor).context("Text detection failed")?;
        debug!("Detection output shape: {:?}", output.shape());

        // [1, 1, H, W] or [1, H, W] -> [H, W]
        let mut map = output.view();
        while map.ndim() > 2 {
            map = map.index_axis_move(Axis(0), 0);
        }
        let map = map
            .into_dimensionality::<Ix2>()
            .context("Unexpected detection output shape")?;

        let boxes: Vec<BoundingBox> = extract_regions(map, config.text_threshold)
            .into_iter()
            .map(|region| region.unclip(config.unclip_ratio))
            .map(|region| region.to_source(input.scale_x, input.scale_y, width, height))
            .filter(|bbox| bbox.width() >= config.min_size && bbox.height() >= config.min_size)
            .collect();

        let mut boxes = merge_line_boxes(boxes, config.width_threshold);
        sort_boxes(&mut boxes);

        debug!("Detected {} text regions", boxes.len());
        Ok(boxes)
    }
}

/// Connected text region on the probability map, in map pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRegion {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl MapRegion {
    /// Grow the region to undo the shrinking applied to DB training targets.
    ///
    /// Offset follows the DB paper: area * ratio / perimeter.
    pub fn unclip(self, ratio: f32) -> MapRegion {
        let width = self.right - self.left;
        let height = self.bottom - self.top;
        let perimeter = 2.0 * (width + height);
        if perimeter <= 0.0 {
            return self;
        }

        let offset = width * height * ratio / perimeter;
        MapRegion {
            left: self.left - offset,
            right: self.right + offset,
            top: self.top - offset,
            bottom: self.bottom + offset,
        }
    }

    /// Map back to source-image coordinates, clamped to the image
    pub fn to_source(self, scale_x: f32, scale_y: f32, width: u32, height: u32) -> BoundingBox {
        let clamp_x = |v: f32| (v / scale_x).clamp(0.0, width as f32);
        let clamp_y = |v: f32| (v / scale_y).clamp(0.0, height as f32);

        BoundingBox::from_extents(
            clamp_x(self.left),
            clamp_x(self.right),
            clamp_y(self.top),
            clamp_y(self.bottom),
        )
    }
}

/// Binarize the probability map and return one region per connected component
pub fn extract_regions(map: ArrayView2<f32>, threshold: f32) -> Vec<MapRegion> {
    let (rows, cols) = map.dim();
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    let binary = GrayImage::from_fn(cols as u32, rows as u32, |x, y| {
        if map[[y as usize, x as usize]] > threshold {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    });

    let labels = connected_components(&binary, Connectivity::Four, Luma([0u8]));

    // label -> (min_x, max_x, min_y, max_y)
    let mut extents: BTreeMap<u32, (u32, u32, u32, u32)> = BTreeMap::new();
    for (x, y, label) in labels.enumerate_pixels() {
        let label = label[0];
        if label == 0 {
            continue;
        }
        extents
            .entry(label)
            .and_modify(|e| {
                e.0 = e.0.min(x);
                e.1 = e.1.max(x);
                e.2 = e.2.min(y);
                e.3 = e.3.max(y);
            })
            .or_insert((x, x, y, y));
    }

    extents
        .into_values()
        .map(|(min_x, max_x, min_y, max_y)| MapRegion {
            left: min_x as f32,
            right: (max_x + 1) as f32,
            top: min_y as f32,
            bottom: (max_y + 1) as f32,
        })
        .collect()
}

/// Merge boxes that sit on the same text line and are close horizontally.
///
/// Two boxes share a line when their vertical centers differ by less than
/// half the taller box's height. Neighbors on a line merge when the gap
/// between them is below `width_threshold` times the line height.
pub fn merge_line_boxes(mut boxes: Vec<BoundingBox>, width_threshold: f32) -> Vec<BoundingBox> {
    boxes.sort_by(|a, b| a.center_y().total_cmp(&b.center_y()));

    let mut lines: Vec<Vec<BoundingBox>> = Vec::new();
    for bbox in boxes {
        let line = lines.iter_mut().find(|line| {
            let mean_center = line.iter().map(|b| b.center_y()).sum::<f32>() / line.len() as f32;
            let tallest = line.iter().map(|b| b.height()).fold(bbox.height(), f32::max);
            (bbox.center_y() - mean_center).abs() < LINE_CENTER_TOLERANCE * tallest
        });
        match line {
            Some(line) => line.push(bbox),
            None => lines.push(vec![bbox]),
        }
    }

    let mut merged = Vec::new();
    for mut line in lines {
        line.sort_by(|a, b| a.left().total_cmp(&b.left()));

        let mut current: Option<BoundingBox> = None;
        for bbox in line {
            current = Some(match current {
                Some(cur) => {
                    let gap = bbox.left() - cur.right();
                    let line_height = cur.height().max(bbox.height());
                    if gap < width_threshold * line_height {
                        cur.union(&bbox)
                    } else {
                        merged.push(cur);
                        bbox
                    }
                }
                None => bbox,
            });
        }
        if let Some(cur) = current {
            merged.push(cur);
        }
    }

    merged
}

/// Order boxes top-to-bottom, then left-to-right
pub fn sort_boxes(boxes: &mut [BoundingBox]) {
    boxes.sort_by(|a, b| {
        a.top()
            .total_cmp(&b.top())
            .then_with(|| a.left().total_cmp(&b.left()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn fill(map: &mut Array2<f32>, rows: std::ops::Range<usize>, cols: std::ops::Range<usize>) {
        for y in rows {
            for x in cols.clone() {
                map[[y, x]] = 0.9;
            }
        }
    }

    #[test]
    fn test_extract_regions_finds_components() {
        let mut map = Array2::<f32>::zeros((20, 40));
        fill(&mut map, 2..6, 3..15);
        fill(&mut map, 10..14, 20..35);

        let mut regions = extract_regions(map.view(), 0.3);
        regions.sort_by(|a, b| a.top.total_cmp(&b.top));

        assert_eq!(regions.len(), 2);
        assert_eq!(
            regions[0],
            MapRegion { left: 3.0, right: 15.0, top: 2.0, bottom: 6.0 }
        );
        assert_eq!(
            regions[1],
            MapRegion { left: 20.0, right: 35.0, top: 10.0, bottom: 14.0 }
        );
    }

    #[test]
    fn test_extract_regions_below_threshold_is_empty() {
        let map = Array2::<f32>::from_elem((8, 8), 0.2);
        assert!(extract_regions(map.view(), 0.3).is_empty());
        assert!(extract_regions(Array2::<f32>::zeros((0, 0)).view(), 0.3).is_empty());
    }

    #[test]
    fn test_unclip_grows_region() {
        let region = MapRegion { left: 10.0, right: 30.0, top: 10.0, bottom: 20.0 };
        // area 200 * 1.5 / perimeter 60 = 5
        let grown = region.unclip(1.5);
        assert_eq!(grown, MapRegion { left: 5.0, right: 35.0, top: 5.0, bottom: 25.0 });
    }

    #[test]
    fn test_to_source_scales_and_clamps() {
        let region = MapRegion { left: -3.0, right: 150.0, top: 15.0, bottom: 30.0 };
        let bbox = region.to_source(1.5, 1.5, 90, 60);
        assert_eq!(bbox, BoundingBox::from_extents(0.0, 90.0, 10.0, 20.0));
    }

    #[test]
    fn test_merge_joins_close_boxes_on_a_line() {
        let boxes = vec![
            BoundingBox::from_extents(60.0, 100.0, 10.0, 30.0),
            BoundingBox::from_extents(0.0, 50.0, 10.0, 30.0),
        ];
        // gap 10 < 0.7 * 20
        let merged = merge_line_boxes(boxes, 0.7);
        assert_eq!(merged, vec![BoundingBox::from_extents(0.0, 100.0, 10.0, 30.0)]);
    }

    #[test]
    fn test_merge_keeps_distant_boxes_apart() {
        let boxes = vec![
            BoundingBox::from_extents(0.0, 50.0, 10.0, 30.0),
            BoundingBox::from_extents(80.0, 120.0, 10.0, 30.0),
        ];
        // gap 30 >= 0.7 * 20
        assert_eq!(merge_line_boxes(boxes, 0.7).len(), 2);
    }

    #[test]
    fn test_merge_keeps_lines_apart() {
        let boxes = vec![
            BoundingBox::from_extents(0.0, 50.0, 10.0, 30.0),
            BoundingBox::from_extents(0.0, 50.0, 40.0, 60.0),
        ];
        assert_eq!(merge_line_boxes(boxes, 0.7).len(), 2);
    }

    #[test]
    fn test_sort_boxes_top_then_left() {
        let mut boxes = vec![
            BoundingBox::from_extents(50.0, 60.0, 40.0, 50.0),
            BoundingBox::from_extents(30.0, 40.0, 0.0, 10.0),
            BoundingBox::from_extents(0.0, 10.0, 0.0, 10.0),
        ];
        sort_boxes(&mut boxes);
        assert_eq!(boxes[0].left(), 0.0);
        assert_eq!(boxes[1].left(), 30.0);
        assert_eq!(boxes[2].top(), 40.0);
    }

    #[test]
    fn test_missing_model_errors() {
        assert!(PaddleDetector::new(Path::new("/nonexistent/det.onnx")).is_err());
    }
}
