//! Upload view - choose a card photograph and start a run

use egui::RichText;
use std::path::PathBuf;

use crate::dashboard::components::{load_rgba_texture, show_image};
use crate::dashboard::state::{StatusLine, ViewerState};
use crate::dashboard::theme::ThemeColors;

/// Render the path box, action buttons and status line
pub fn render_upload_controls(ui: &mut egui::Ui, state: &mut ViewerState) {
    ui.horizontal(|ui| {
        ui.label(RichText::new("Image:").size(15.0));

        let response = ui.add(
            egui::TextEdit::singleline(&mut state.path_input)
                .hint_text("Path to a JPG or PNG card photo, or drop a file here")
                .desired_width(ui.available_width() - 260.0),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if ui.button("Load").clicked() || submitted {
            let trimmed = state.path_input.trim();
            if !trimmed.is_empty() {
                state.pending_load = Some(PathBuf::from(trimmed));
            }
        }

        let process = ui.add_enabled(
            state.can_process() && !state.pending_process,
            egui::Button::new(RichText::new("Process Image").strong()),
        );
        if process.clicked() {
            state.pending_process = true;
        }
    });

    ui.add_space(4.0);

    match &state.status {
        StatusLine::Idle => {
            ui.label(
                RichText::new("Choose an image of a PAN or Aadhaar card")
                    .size(14.0)
                    .color(ThemeColors::TEXT_MUTED),
            );
        }
        StatusLine::Info(message) => {
            ui.label(RichText::new(message).size(14.0).color(ThemeColors::TEXT_SECONDARY));
        }
        StatusLine::Error(message) => {
            ui.label(
                RichText::new(format!("Error: {}", message))
                    .size(14.0)
                    .color(ThemeColors::ACCENT_ERROR),
            );
        }
    }
}

/// Render the uploaded photograph
pub fn render_upload_preview(ui: &mut egui::Ui, state: &mut ViewerState, max_height: f32) {
    egui::Frame::none()
        .fill(ThemeColors::BG_MEDIUM)
        .rounding(egui::Rounding::same(8.0))
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.label(RichText::new("Uploaded Image").size(17.0).strong());
            ui.add_space(6.0);

            let Some(upload) = state.upload.as_mut() else {
                ui.label(RichText::new("No image loaded").size(15.0).color(ThemeColors::TEXT_MUTED));
                return;
            };

            let texture = upload.texture.get_or_insert_with(|| {
                load_rgba_texture(ui.ctx(), "uploaded_image", &upload.image.to_rgba8())
            });
            show_image(ui, texture, max_height);

            ui.label(
                RichText::new(upload.path.display().to_string())
                    .size(13.0)
                    .color(ThemeColors::TEXT_MUTED),
            );
        });
}
