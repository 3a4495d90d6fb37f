use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Pie slice colours
// ---------------------------------------------------------------------------

/// Hue of the default histogram blue; the first slice starts there.
const BASE_HUE: f32 = 205.0;
const GOLDEN_ANGLE: f32 = 137.508;

/// `n` slice colours in rank order.
///
/// Hues step by the golden angle so neighbouring slices never sit close on
/// the colour wheel, however many categories the slider asks for. Lightness
/// alternates between two levels for extra contrast between neighbours.
pub fn slice_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (BASE_HUE + i as f32 * GOLDEN_ANGLE) % 360.0;
            let lightness = if i % 2 == 0 { 0.5 } else { 0.62 };
            let rgb: Srgb = Hsl::new(hue, 0.65, lightness).into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Hex colours (config / colour picker round trip)
// ---------------------------------------------------------------------------

/// Parse `#rrggbb` (leading `#` optional).
pub fn parse_hex_color(s: &str) -> Option<Color32> {
    let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Format a colour as `#rrggbb`, dropping alpha.
pub fn to_hex_color(c: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r(), c.g(), c.b())
}
