use serde::{Deserialize, Serialize};

/// Size of a typeset block of text, in scene units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GlyphExtent {
    pub width: f64,
    pub height: f64,
}

impl GlyphExtent {
    pub fn lerp(&self, other: &GlyphExtent, t: f64) -> GlyphExtent {
        GlyphExtent {
            width: self.width + (other.width - self.width) * t,
            height: self.height + (other.height - self.height) * t,
        }
    }
}

/// Turns text or formula source into renderable glyph geometry.
///
/// Real glyph layout (fonts, LaTeX) lives outside the engine; objects only
/// keep the extent so they can be positioned and bounded.
pub trait Typesetter {
    fn typeset(&self, content: &str, font_size: f64) -> GlyphExtent;
}

/// Fixed-advance layout: every character is `advance * font_size` wide.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceTypesetter {
    pub advance: f64,
    pub line_height: f64,
}

impl Default for MonospaceTypesetter {
    fn default() -> Self {
        Self {
            advance: 0.6,
            line_height: 1.2,
        }
    }
}

impl Typesetter for MonospaceTypesetter {
    fn typeset(&self, content: &str, font_size: f64) -> GlyphExtent {
        if content.is_empty() {
            return GlyphExtent::default();
        }
        let lines = content.lines().count().max(1);
        let widest = content.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        GlyphExtent {
            width: widest as f64 * self.advance * font_size,
            height: lines as f64 * self.line_height * font_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monospace_extent() {
        let ts = MonospaceTypesetter::default();
        let e = ts.typeset("m = 2.00", 0.5);
        assert!((e.width - 8.0 * 0.6 * 0.5).abs() < 1e-12);
        assert!((e.height - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_multiline_uses_widest_line() {
        let ts = MonospaceTypesetter::default();
        let e = ts.typeset("SSR\n= sum of squares", 1.0);
        assert!((e.width - 16.0 * 0.6).abs() < 1e-12);
        assert!((e.height - 2.4).abs() < 1e-12);
        assert_eq!(ts.typeset("", 1.0), GlyphExtent::default());
    }
}
