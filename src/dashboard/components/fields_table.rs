//! Two-column table of extracted fields

use egui::RichText;
use egui_extras::{Column, TableBuilder};

use crate::dashboard::theme::ThemeColors;
use crate::extract::ExtractedFields;

const ROW_HEIGHT: f32 = 24.0;

/// Render fields as `key: value` rows in display order.
///
/// An unrecognized document shows a placeholder instead of an empty table.
pub fn render_fields_table(ui: &mut egui::Ui, fields: &ExtractedFields) {
    let entries = fields.entries();
    if entries.is_empty() {
        ui.label(RichText::new("No fields extracted").color(ThemeColors::TEXT_MUTED));
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(140.0))
        .column(Column::remainder())
        .body(|mut body| {
            for (key, value) in entries {
                body.row(ROW_HEIGHT, |mut row| {
                    row.col(|ui| {
                        ui.label(RichText::new(format!("{key}:")).color(ThemeColors::TEXT_SECONDARY));
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(value).color(ThemeColors::TEXT_PRIMARY).strong());
                    });
                });
            }
        });
}
