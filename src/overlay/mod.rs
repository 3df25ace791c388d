//! Overlay rendering
//!
//! Draws detected text regions onto a copy of the source photograph so a
//! person can check what the detector found. The output has no bearing on
//! field extraction.

use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;
use serde::{Deserialize, Serialize};

use crate::vision::BoundingBox;

/// Highlight style for region outlines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Outline color [R, G, B]
    pub color: [u8; 3],
    /// Outline width in pixels
    pub stroke_width: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: [255, 0, 0],
            stroke_width: 2,
        }
    }
}

/// Draw every box as a closed four-sided outline on a copy of `image`.
///
/// The source image is left untouched; with no boxes the result is a plain copy.
pub fn render_overlay(image: &DynamicImage, boxes: &[BoundingBox], style: &OverlayStyle) -> RgbaImage {
    let mut canvas = image.to_rgba8();
    let [r, g, b] = style.color;
    let color = Rgba([r, g, b, 255]);

    for bbox in boxes {
        let corners = bbox.corners();
        for i in 0..corners.len() {
            let start = corners[i];
            let end = corners[(i + 1) % corners.len()];
            draw_thick_segment(&mut canvas, start, end, color, style.stroke_width);
        }
    }

    canvas
}

/// Draw a segment `width` pixels thick by stacking parallel one-pixel lines
fn draw_thick_segment(
    canvas: &mut RgbaImage,
    start: (f32, f32),
    end: (f32, f32),
    color: Rgba<u8>,
    width: u32,
) {
    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        draw_line_segment_mut(canvas, start, end, color);
        return;
    }

    // Unit normal to the segment
    let (nx, ny) = (-dy / length, dx / length);
    let width = width.max(1);

    for k in 0..width {
        let offset = k as f32 - (width - 1) as f32 / 2.0;
        draw_line_segment_mut(
            canvas,
            (start.0 + nx * offset, start.1 + ny * offset),
            (end.0 + nx * offset, end.1 + ny * offset),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn blank(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, WHITE))
    }

    #[test]
    fn test_no_boxes_returns_copy() {
        let image = blank(16, 16);
        let overlay = render_overlay(&image, &[], &OverlayStyle::default());
        assert_eq!(overlay, image.to_rgba8());
    }

    #[test]
    fn test_box_outline_is_drawn() {
        let image = blank(40, 40);
        let bbox = BoundingBox::from_extents(10.0, 30.0, 10.0, 30.0);

        let overlay = render_overlay(&image, &[bbox], &OverlayStyle::default());

        // Edges are highlighted
        assert_eq!(*overlay.get_pixel(20, 10), RED);
        assert_eq!(*overlay.get_pixel(20, 30), RED);
        assert_eq!(*overlay.get_pixel(10, 20), RED);
        assert_eq!(*overlay.get_pixel(30, 20), RED);
        // Interior and exterior are not
        assert_eq!(*overlay.get_pixel(20, 20), WHITE);
        assert_eq!(*overlay.get_pixel(2, 2), WHITE);
    }

    #[test]
    fn test_source_is_not_mutated() {
        let image = blank(40, 40);
        let before = image.to_rgba8();
        let bbox = BoundingBox::from_extents(5.0, 35.0, 5.0, 35.0);

        let overlay = render_overlay(&image, &[bbox], &OverlayStyle::default());

        assert_eq!(image.to_rgba8(), before);
        assert_ne!(overlay, before);
    }

    #[test]
    fn test_custom_color() {
        let image = blank(20, 20);
        let style = OverlayStyle {
            color: [0, 255, 0],
            stroke_width: 1,
        };
        let bbox = BoundingBox::from_extents(2.0, 18.0, 2.0, 18.0);

        let overlay = render_overlay(&image, &[bbox], &style);
        assert_eq!(*overlay.get_pixel(10, 2), Rgba([0, 255, 0, 255]));
    }
}
