//! Palette and visuals.

use eframe::egui::{
    Color32, Stroke, Visuals,
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
};

/// Fixed color palette for the shell.
#[derive(Clone, Copy)]
pub struct Palette {
    /// Window background.
    pub bg_primary: Color32,
    /// Panel background.
    pub bg_secondary: Color32,
    /// Widget background.
    pub bg_widget: Color32,
    /// Primary text.
    pub text_primary: Color32,
    /// De-emphasized text.
    pub text_muted: Color32,
    /// Accent used for headings and the ticket identifier.
    pub accent: Color32,
    /// Validation message color.
    pub error: Color32,
    /// Confirmation color.
    pub success: Color32,
}

/// The shell's palette.
pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(15, 14, 28),
        bg_secondary: Color32::from_rgb(28, 26, 48),
        bg_widget: Color32::from_rgb(44, 41, 70),
        text_primary: Color32::from_rgb(212, 208, 232),
        text_muted: Color32::from_rgb(141, 137, 166),
        accent: Color32::from_rgb(245, 110, 80),
        error: Color32::from_rgb(235, 100, 92),
        success: Color32::from_rgb(106, 186, 142),
    }
}

/// Apply the palette to egui's visuals.
pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_primary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.extreme_bg_color = palette.bg_secondary;
    visuals.faint_bg_color = palette.bg_secondary;
    visuals.error_fg_color = palette.error;
    visuals.warn_fg_color = palette.error;
    visuals.selection.bg_fill = palette.bg_widget;
    visuals.selection.stroke = Stroke::new(1.0, palette.accent);
    visuals.widgets.noninteractive.bg_fill = palette.bg_secondary;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    style_widget(&mut visuals.widgets.inactive, palette);
    style_widget(&mut visuals.widgets.hovered, palette);
    style_widget(&mut visuals.widgets.active, palette);
    style_widget(&mut visuals.widgets.open, palette);
    visuals.window_corner_radius = CornerRadius::same(6);
    visuals.popup_shadow = Shadow::NONE;
    visuals.button_frame = true;
}

fn style_widget(widget: &mut WidgetVisuals, palette: Palette) {
    widget.corner_radius = CornerRadius::same(4);
    widget.bg_fill = palette.bg_widget;
    widget.weak_bg_fill = palette.bg_secondary;
    widget.fg_stroke = Stroke::new(1.0, palette.text_primary);
}
