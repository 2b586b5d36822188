use egui::{Color32, FontId, Rounding, Stroke, Visuals};

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_CHART: Color32 = Color32::WHITE;
pub const BG_PANEL: Color32 = Color32::from_rgb(249, 250, 251);
pub const BG_HEADER: Color32 = Color32::WHITE;

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(229, 231, 235);
pub const ROW_LINE: Color32 = Color32::from_rgb(235, 239, 242);
pub const TICK: Color32 = Color32::from_rgb(224, 224, 224);
pub const TICK_THICK: Color32 = Color32::from_rgb(200, 200, 200);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(23, 23, 23);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(64, 64, 64);
pub const TEXT_DIM: Color32 = Color32::from_rgb(156, 163, 175);

pub const ACCENT: Color32 = Color32::from_rgb(37, 99, 235);
pub const TODAY_LINE: Color32 = Color32::BLACK;
pub const TODAY_BADGE: Color32 = Color32::from_rgb(37, 99, 235);

pub const BAR: Color32 = Color32::from_rgb(229, 231, 235);
pub const BAR_PROGRESS: Color32 = Color32::from_rgba_premultiplied(98, 98, 153, 153);
pub const BAR_HATCH: Color32 = Color32::from_rgb(156, 163, 175);
pub const ARROW: Color32 = Color32::from_rgb(156, 163, 175);

pub const DATE_HIGHLIGHT: Color32 = Color32::from_rgba_premultiplied(132, 151, 138, 153);
pub const POINTER_HIGHLIGHT: Color32 = Color32::from_rgba_premultiplied(122, 122, 123, 128);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const STATUS_BAR_HEIGHT: f32 = 22.0;
pub const HATCH_SPACING: f32 = 4.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_upper() -> FontId {
    FontId::proportional(14.0)
}

pub fn font_lower() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_bar() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_status() -> FontId {
    FontId::proportional(11.0)
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex(color: &str) -> Option<Color32> {
    let hex = color.trim().strip_prefix('#')?;
    let channel = |i: usize, len: usize| u8::from_str_radix(hex.get(i..i + len)?, 16).ok();
    match hex.len() {
        3 => {
            let [r, g, b] = [channel(0, 1)?, channel(1, 1)?, channel(2, 1)?];
            Some(Color32::from_rgb(r * 17, g * 17, b * 17))
        }
        6 => Some(Color32::from_rgb(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
        8 => Some(Color32::from_rgba_unmultiplied(
            channel(0, 2)?,
            channel(2, 2)?,
            channel(4, 2)?,
            channel(6, 2)?,
        )),
        _ => None,
    }
}

/// Holiday and bar colors fall back to `default` when unparseable.
pub fn color_or(color: Option<&str>, default: Color32) -> Color32 {
    color.and_then(parse_hex).unwrap_or(default)
}

// ── Apply custom visuals ─────────────────────────────────────────────────────

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::light();

    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = Color32::WHITE;

    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.widgets.noninteractive.rounding = Rounding::same(4.0);
    visuals.widgets.inactive.rounding = Rounding::same(4.0);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.hovered.rounding = Rounding::same(4.0);
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.active.rounding = Rounding::same(4.0);

    visuals.selection.stroke = Stroke::new(1.0, ACCENT);
    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    ctx.set_style(style);
}
