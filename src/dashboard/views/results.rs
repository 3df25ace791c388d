//! Results view - overlay, extracted fields and raw transcript

use egui::RichText;

use crate::dashboard::components::{load_rgba_texture, render_fields_table, show_image};
use crate::dashboard::state::ViewerState;
use crate::dashboard::theme::ThemeColors;

/// Render the three result sections of the last run
pub fn render_results_view(ui: &mut egui::Ui, state: &mut ViewerState, max_height: f32) {
    let Some(result) = state.result.as_mut() else {
        section(ui, "Results", |ui| {
            ui.label(
                RichText::new("Press \"Process Image\" to analyze the uploaded card")
                    .size(15.0)
                    .color(ThemeColors::TEXT_MUTED),
            );
        });
        return;
    };

    section(ui, "Detected Text Regions", |ui| {
        let texture = result.overlay_texture.get_or_insert_with(|| {
            load_rgba_texture(ui.ctx(), "detected_regions", &result.outcome.overlay)
        });
        show_image(ui, texture, max_height);

        let recognitions = &result.outcome.recognitions;
        let summary = if recognitions.is_empty() {
            format!("{} regions", result.outcome.boxes.len())
        } else {
            let mean = recognitions.iter().map(|r| r.confidence).sum::<f32>()
                / recognitions.len() as f32;
            format!(
                "{} regions, mean confidence {:.0}%",
                result.outcome.boxes.len(),
                mean * 100.0
            )
        };
        ui.label(RichText::new(summary).size(13.0).color(ThemeColors::TEXT_MUTED));
    });

    ui.add_space(8.0);

    section(ui, "Extracted Information", |ui| {
        render_fields_table(ui, &result.outcome.fields);
    });

    ui.add_space(8.0);

    section(ui, "Raw Detected Text", |ui| {
        let mut transcript = result.outcome.transcript.as_str();
        ui.add(
            egui::TextEdit::multiline(&mut transcript)
                .font(egui::TextStyle::Monospace)
                .desired_width(f32::INFINITY)
                .desired_rows(3),
        );
    });
}

fn section(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .fill(ThemeColors::BG_MEDIUM)
        .rounding(egui::Rounding::same(8.0))
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).size(17.0).strong());
            ui.add_space(6.0);
            add_contents(ui);
        });
}
