//! Color conversion between the scene's RGBA arrays and the drawing crates

use cosmic_text::Color as CosmicColor;
use ruler_core::Rgba;
use tiny_skia::Color;

/// Convert [u8; 4] RGBA array to tiny_skia Color
#[inline]
pub fn color_from_rgba(rgba: Rgba) -> Color {
    Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// Convert [u8; 4] RGBA array to a cosmic-text glyph color
#[inline]
pub fn cosmic_color(rgba: Rgba) -> CosmicColor {
    CosmicColor::rgba(rgba[0], rgba[1], rgba[2], rgba[3])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_rgba() {
        let color = color_from_rgba([255, 0, 0, 0x80]);
        assert_eq!(color.red(), 1.0);
        assert_eq!(color.green(), 0.0);
        assert!((color.alpha() - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosmic_color_keeps_channels() {
        let color = cosmic_color([0xA5, 0x2A, 0x2A, 255]);
        assert_eq!((color.r(), color.g(), color.b(), color.a()), (0xA5, 0x2A, 0x2A, 255));
    }
}
