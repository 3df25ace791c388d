//! Viewer theme and styling

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};

/// Dark slate palette
pub struct ThemeColors;

impl ThemeColors {
    // Backgrounds
    pub const BG_DARK: Color32 = Color32::from_rgb(20, 22, 28);
    pub const BG_MEDIUM: Color32 = Color32::from_rgb(30, 33, 41);
    pub const BG_LIGHT: Color32 = Color32::from_rgb(42, 46, 56);
    pub const BG_HOVER: Color32 = Color32::from_rgb(54, 59, 71);

    // Accents
    pub const ACCENT_PRIMARY: Color32 = Color32::from_rgb(86, 156, 214);
    pub const ACCENT_SUCCESS: Color32 = Color32::from_rgb(46, 204, 113);
    pub const ACCENT_WARNING: Color32 = Color32::from_rgb(255, 193, 7);
    pub const ACCENT_ERROR: Color32 = Color32::from_rgb(231, 76, 60);

    // Text
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(236, 238, 242);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(165, 170, 182);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(108, 113, 126);

    pub const BORDER: Color32 = Color32::from_rgb(58, 63, 76);

    // Engine status
    pub const STATUS_RUNNING: Color32 = Self::ACCENT_SUCCESS;
    pub const STATUS_STOPPED: Color32 = Self::TEXT_SECONDARY;
    pub const STATUS_ERROR: Color32 = Self::ACCENT_ERROR;
}

/// Apply the viewer theme to egui
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    let mut visuals = Visuals::dark();

    visuals.window_fill = ThemeColors::BG_MEDIUM;
    visuals.panel_fill = ThemeColors::BG_DARK;
    visuals.faint_bg_color = ThemeColors::BG_LIGHT;
    visuals.extreme_bg_color = ThemeColors::BG_DARK;

    let widget_fills = [
        (&mut visuals.widgets.noninteractive, ThemeColors::BG_MEDIUM, ThemeColors::TEXT_SECONDARY),
        (&mut visuals.widgets.inactive, ThemeColors::BG_LIGHT, ThemeColors::TEXT_PRIMARY),
        (&mut visuals.widgets.hovered, ThemeColors::BG_HOVER, ThemeColors::TEXT_PRIMARY),
        (&mut visuals.widgets.active, ThemeColors::ACCENT_PRIMARY, ThemeColors::TEXT_PRIMARY),
        (&mut visuals.widgets.open, ThemeColors::BG_HOVER, ThemeColors::TEXT_PRIMARY),
    ];
    for (widget, fill, text) in widget_fills {
        widget.bg_fill = fill;
        widget.fg_stroke = Stroke::new(1.0, text);
        widget.rounding = Rounding::same(6.0);
    }

    visuals.selection.bg_fill = color_with_alpha(ThemeColors::ACCENT_PRIMARY, 77);
    visuals.selection.stroke = Stroke::new(1.0, ThemeColors::ACCENT_PRIMARY);
    visuals.hyperlink_color = ThemeColors::ACCENT_PRIMARY;
    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_stroke = Stroke::new(1.0, ThemeColors::BORDER);

    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);

    style.text_styles = [
        (TextStyle::Small, FontId::new(13.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(16.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(15.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(16.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(22.0, FontFamily::Proportional)),
    ]
    .into();

    ctx.set_style(style);
}

/// Helper to create a color with modified alpha
pub fn color_with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}
