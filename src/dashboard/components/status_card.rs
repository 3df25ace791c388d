//! Status card component for the viewer header

use egui::{Color32, RichText, Rounding, Vec2};

use crate::dashboard::state::EngineStatus;
use crate::dashboard::theme::ThemeColors;
use crate::extract::DocumentKind;

/// A small card with a colored status dot, a title and a value
pub struct StatusCard {
    pub title: String,
    pub value: String,
    pub color: Color32,
}

impl StatusCard {
    pub fn new(title: impl Into<String>, value: impl Into<String>, color: Color32) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            color,
        }
    }

    /// Card describing the OCR engine
    pub fn engine(status: EngineStatus) -> Self {
        let color = match status {
            EngineStatus::NotLoaded => ThemeColors::STATUS_STOPPED,
            EngineStatus::Ready => ThemeColors::STATUS_RUNNING,
            EngineStatus::Failed => ThemeColors::STATUS_ERROR,
        };
        Self::new("OCR Engine", status.label(), color)
    }

    /// Card describing the last classified document
    pub fn document(kind: Option<DocumentKind>) -> Self {
        match kind.map(|kind| kind.label()) {
            Some(Some(label)) => Self::new("Document", label, ThemeColors::ACCENT_SUCCESS),
            Some(None) => Self::new("Document", "Unrecognized", ThemeColors::ACCENT_WARNING),
            None => Self::new("Document", "-", ThemeColors::STATUS_STOPPED),
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(ThemeColors::BG_MEDIUM)
            .rounding(Rounding::same(8.0))
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_min_width(160.0);

                ui.horizontal(|ui| {
                    let dot_center = ui.cursor().left_top() + Vec2::new(6.0, 10.0);
                    ui.painter().circle_filled(dot_center, 4.0, self.color);
                    ui.add_space(16.0);

                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new(&self.title)
                                .size(12.0)
                                .color(ThemeColors::TEXT_MUTED),
                        );
                        ui.add_space(2.0);
                        ui.label(
                            RichText::new(&self.value)
                                .size(16.0)
                                .color(ThemeColors::TEXT_PRIMARY)
                                .strong(),
                        );
                    });
                });
            });
    }
}
