use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::pipeline::NoticeLevel;

// ---------------------------------------------------------------------------
// Chart series colours
// ---------------------------------------------------------------------------

/// Hue of the first series; later series are spread evenly from here.
const BASE_HUE: f32 = 210.0;

/// `n` visually distinct colours with evenly spaced hues.
pub fn series_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (BASE_HUE + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.70, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0).round() as u8,
                (rgb.green * 255.0).round() as u8,
                (rgb.blue * 255.0).round() as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Message colours
// ---------------------------------------------------------------------------

pub const ERROR: Color32 = Color32::from_rgb(230, 80, 80);

pub fn notice(level: NoticeLevel) -> Color32 {
    match level {
        NoticeLevel::Success => Color32::from_rgb(90, 200, 120),
        NoticeLevel::Warning => Color32::from_rgb(240, 190, 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let colours = series_palette(2);
        assert_eq!(colours.len(), 2);
        assert_ne!(colours[0], colours[1]);
        assert!(series_palette(0).is_empty());
    }
}
