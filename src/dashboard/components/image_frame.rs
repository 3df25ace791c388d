//! Framed, aspect-preserving image display

use egui::{Rect, Rounding, Sense, TextureHandle, TextureOptions};
use image::RgbaImage;

use crate::dashboard::theme::ThemeColors;

/// Upload an RGBA image as an egui texture
pub fn load_rgba_texture(ctx: &egui::Context, name: &str, image: &RgbaImage) -> TextureHandle {
    let color_image = egui::ColorImage::from_rgba_unmultiplied(
        [image.width() as usize, image.height() as usize],
        image.as_raw(),
    );
    ctx.load_texture(name, color_image, TextureOptions::LINEAR)
}

/// Draw a texture scaled to fit the available width and `max_height`
pub fn show_image(ui: &mut egui::Ui, texture: &TextureHandle, max_height: f32) {
    egui::Frame::none()
        .fill(ThemeColors::BG_DARK)
        .rounding(Rounding::same(4.0))
        .show(ui, |ui| {
            let tex_size = texture.size_vec2();
            let available_width = ui.available_width().max(1.0);
            let scale = (available_width / tex_size.x).min(max_height / tex_size.y).min(1.0);
            let scaled_size = tex_size * scale;

            let (rect, _) = ui.allocate_exact_size(scaled_size, Sense::hover());
            ui.painter().image(
                texture.id(),
                rect,
                Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        });
}
