use egui::Color32;

use crate::models::person::is_official;

pub(crate) fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |c1: u8, c2: u8| -> u8 { ((c1 as f32 * (1.0 - t)) + (c2 as f32 * t)).round() as u8 };
    Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
}

const PERSON_COLORS: [Color32; 8] = [
    Color32::from_rgb(100, 150, 200),
    Color32::from_rgb(120, 180, 130),
    Color32::from_rgb(215, 150, 90),
    Color32::from_rgb(170, 120, 200),
    Color32::from_rgb(210, 110, 130),
    Color32::from_rgb(90, 175, 180),
    Color32::from_rgb(190, 170, 80),
    Color32::from_rgb(140, 140, 210),
];

const OFFICIAL_COLOR: Color32 = Color32::from_rgb(95, 105, 125);

/// Stable block color for a column owner.
pub(crate) fn person_color(name: &str, is_dark: bool) -> Color32 {
    let base = if is_official(name) {
        OFFICIAL_COLOR
    } else {
        let hash = name
            .bytes()
            .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
        PERSON_COLORS[hash % PERSON_COLORS.len()]
    };

    if is_dark {
        blend(base, Color32::BLACK, 0.25)
    } else {
        base
    }
}

#[derive(Clone, Copy)]
pub(crate) struct BoardPalette {
    pub is_dark: bool,
    pub grid_bg: Color32,
    pub header_bg: Color32,
    pub official_header_bg: Color32,
    pub header_text: Color32,
    pub hour_line: Color32,
    pub half_hour_line: Color32,
    pub column_line: Color32,
    pub label_text: Color32,
    pub block_text: Color32,
    pub selection: Color32,
    pub preview_fill: Color32,
    pub preview_stroke: Color32,
    pub invalid_fill: Color32,
    pub delete_fill: Color32,
}

impl BoardPalette {
    pub fn from_visuals(visuals: &egui::Visuals) -> Self {
        let is_dark = visuals.dark_mode;
        let panel = visuals.panel_fill;
        let text = visuals.text_color();
        let accent = visuals.selection.bg_fill;

        Self {
            is_dark,
            grid_bg: visuals.extreme_bg_color,
            header_bg: blend(panel, text, 0.06),
            official_header_bg: blend(panel, OFFICIAL_COLOR, 0.35),
            header_text: text,
            hour_line: with_alpha(text, if is_dark { 70 } else { 60 }),
            half_hour_line: with_alpha(text, if is_dark { 28 } else { 22 }),
            column_line: with_alpha(text, if is_dark { 50 } else { 40 }),
            label_text: visuals.weak_text_color(),
            block_text: if is_dark { Color32::from_gray(235) } else { Color32::WHITE },
            selection: if is_dark { Color32::from_rgb(255, 210, 90) } else { Color32::from_rgb(230, 140, 20) },
            preview_fill: with_alpha(accent, 110),
            preview_stroke: accent,
            invalid_fill: Color32::from_rgba_unmultiplied(220, 70, 70, 110),
            delete_fill: Color32::from_rgb(205, 60, 60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::person::OFFICIAL_SCHEDULE;

    #[test]
    fn test_person_color_is_stable() {
        assert_eq!(person_color("Jinyo", false), person_color("Jinyo", false));
        assert_eq!(person_color(OFFICIAL_SCHEDULE, false), OFFICIAL_COLOR);
    }

    #[test]
    fn test_dark_mode_darkens_blocks() {
        let light = person_color("Friend A", false);
        let dark = person_color("Friend A", true);
        assert!(dark.r() <= light.r() && dark.g() <= light.g() && dark.b() <= light.b());
    }
}
