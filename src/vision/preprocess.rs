//! Image preprocessing for OCR models
//!
//! Handles image resizing, normalization, and tensor conversion for PaddleOCR models.

use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::Array4;

/// Detection inputs must have sides divisible by this
const DET_SIDE_MULTIPLE: u32 = 32;

/// Preprocessing configuration
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Input height of the recognition model
    pub rec_target_height: u32,
    /// Maximum input width for recognition
    pub rec_max_width: u32,
    /// Mean values for detection normalization [R, G, B]
    pub det_mean: [f32; 3],
    /// Std values for detection normalization [R, G, B]
    pub det_std: [f32; 3],
    /// Mean values for recognition normalization [R, G, B]
    pub rec_mean: [f32; 3],
    /// Std values for recognition normalization [R, G, B]
    pub rec_std: [f32; 3],
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            rec_target_height: 48,
            rec_max_width: 1280,
            // DB detector is trained with ImageNet statistics
            det_mean: [0.485, 0.456, 0.406],
            det_std: [0.229, 0.224, 0.225],
            // Recognizer maps [0, 255] -> [-1, 1]
            rec_mean: [0.5, 0.5, 0.5],
            rec_std: [0.5, 0.5, 0.5],
        }
    }
}

/// Detection input plus the factors mapping it back to the source image
#[derive(Debug)]
pub struct DetectionInput {
    /// Magnified image, padded to multiples of 32
    pub image: RgbImage,
    /// Resized width / source width
    pub scale_x: f32,
    /// Resized height / source height
    pub scale_y: f32,
}

/// Magnify an image for detection, cap its longest side and pad it for the model
pub fn resize_for_detection(image: &RgbImage, mag_ratio: f32, max_side: u32) -> DetectionInput {
    let (width, height) = image.dimensions();
    let longest = width.max(height).max(1) as f32;

    let mut ratio = mag_ratio.max(f32::MIN_POSITIVE);
    if longest * ratio > max_side as f32 {
        ratio = max_side as f32 / longest;
    }

    let new_w = ((width as f32 * ratio).round() as u32).max(1);
    let new_h = ((height as f32 * ratio).round() as u32).max(1);
    let resized = imageops::resize(image, new_w, new_h, FilterType::Triangle);

    let padded_w = new_w.div_ceil(DET_SIDE_MULTIPLE) * DET_SIDE_MULTIPLE;
    let padded_h = new_h.div_ceil(DET_SIDE_MULTIPLE) * DET_SIDE_MULTIPLE;
    let mut padded = RgbImage::new(padded_w, padded_h);
    imageops::replace(&mut padded, &resized, 0, 0);

    DetectionInput {
        image: padded,
        scale_x: new_w as f32 / width.max(1) as f32,
        scale_y: new_h as f32 / height.max(1) as f32,
    }
}

/// Resize a text crop to the recognizer's fixed height, keeping its aspect ratio
pub fn resize_for_recognition(image: &RgbImage, target_height: u32, max_width: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let scale = target_height as f32 / height.max(1) as f32;
    let new_w = ((width as f32 * scale).ceil() as u32).clamp(1, max_width);

    imageops::resize(image, new_w, target_height, FilterType::Triangle)
}

/// Convert an RGB image to a normalized NCHW tensor (batch size 1)
pub fn to_nchw(image: &RgbImage, mean: &[f32; 3], std: &[f32; 3]) -> Array4<f32> {
    let (width, height) = image.dimensions();
    let mut tensor = Array4::<f32>::zeros((1, 3, height as usize, width as usize));

    for (x, y, pixel) in image.enumerate_pixels() {
        for c in 0..3 {
            let value = pixel[c] as f32 / 255.0;
            tensor[[0, c, y as usize, x as usize]] = (value - mean[c]) / std[c];
        }
    }

    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_detection_input_is_magnified_and_padded() {
        let image = RgbImage::new(100, 60);
        let input = resize_for_detection(&image, 1.5, 2560);

        // 150x90 padded up to the next multiple of 32
        assert_eq!(input.image.dimensions(), (160, 96));
        assert!((input.scale_x - 1.5).abs() < 1e-6);
        assert!((input.scale_y - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_detection_input_respects_max_side() {
        let image = RgbImage::new(2000, 1000);
        let input = resize_for_detection(&image, 1.5, 1280);

        assert_eq!(input.image.dimensions(), (1280, 640));
        assert!((input.scale_x - 0.64).abs() < 1e-6);
    }

    #[test]
    fn test_recognition_resize_keeps_aspect() {
        let image = RgbImage::new(200, 24);
        let resized = resize_for_recognition(&image, 48, 1280);
        assert_eq!(resized.dimensions(), (400, 48));

        let wide = RgbImage::new(2000, 24);
        assert_eq!(resize_for_recognition(&wide, 48, 1280).dimensions(), (1280, 48));
    }

    #[test]
    fn test_to_nchw_normalizes_channels() {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(0, 0, Rgb([255, 0, 0]));
        image.put_pixel(1, 0, Rgb([0, 255, 0]));

        let tensor = to_nchw(&image, &[0.5, 0.5, 0.5], &[0.5, 0.5, 0.5]);

        assert_eq!(tensor.dim(), (1, 3, 1, 2));
        assert!((tensor[[0, 0, 0, 0]] - 1.0).abs() < 1e-6);
        assert!((tensor[[0, 1, 0, 0]] + 1.0).abs() < 1e-6);
        assert!((tensor[[0, 1, 0, 1]] - 1.0).abs() < 1e-6);
    }
}
