use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Colour of trace `index` out of `count`; a single trace uses the
/// spreadsheet series colour.
pub fn trace_color(index: usize, count: usize) -> Color32 {
    if count <= 1 {
        return Color32::from_rgb(0x00, 0x8E, 0xC0);
    }
    generate_palette(count)
        .get(index)
        .copied()
        .unwrap_or(Color32::GRAY)
}
