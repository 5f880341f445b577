//! Single-line text measurement for field labels.
//!
//! Label fields need to know how much room their text takes before the
//! layout tree can size the inputs and blocks around them. Measurement uses
//! cosmic-text shaping against the system fonts.
//!
//! ```
//! # use brickwork_core::text::{TextStyle, measure_single_line};
//! let style = TextStyle::new("sans-serif", 14.0);
//! assert!(measure_single_line("", &style).is_zero());
//! ```

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::{info, trace};

use crate::geometry::Size;

/// Font settings a label is measured and drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    font_family: String,
    font_size: f32,
}

impl TextStyle {
    /// Creates a style with a font family and a font size in points.
    pub fn new(font_family: impl Into<String>, font_size: f32) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
        }
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Returns a copy of this style with the font size multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            font_family: self.font_family.clone(),
            font_size: self.font_size * factor,
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new("sans-serif", 14.0)
    }
}

/// Returns the minimal size needed to draw `text` on a single line.
///
/// Line breaks in `text` are treated as spaces. Empty text measures as
/// [`Size::zero`].
pub fn measure_single_line(text: &str, style: &TextStyle) -> Size {
    TEXT_MEASURER
        .get_or_init(TextMeasurer::new)
        .measure(text, style)
}

/// Owns the shared `FontSystem`; creating one scans system fonts and is slow.
struct TextMeasurer {
    font_system: Mutex<FontSystem>,
}

impl TextMeasurer {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    fn measure(&self, text: &str, style: &TextStyle) -> Size {
        if text.is_empty() || style.font_size() <= 0.0 {
            return Size::zero();
        }

        let line = text.replace(['\n', '\r'], " ");

        let mut font_system = self.font_system.lock().expect("failed to lock FontSystem");

        // Points to pixels at standard DPI.
        let font_size_px = style.font_size() * 1.33;
        let metrics = Metrics::new(font_size_px, font_size_px * 1.15);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(Family::Name(style.font_family()));
        buffer.set_size(None, None);
        buffer.set_text(&line, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let width = buffer
            .layout_runs()
            .filter_map(|run| run.glyphs.last().map(|glyph| glyph.x + glyph.w))
            .fold(0.0f32, f32::max);

        let size = if width > 0.0 {
            Size::new(width, metrics.line_height)
        } else {
            // No usable font: estimate from the character count.
            Size::new(
                line.chars().count() as f32 * font_size_px * 0.55,
                metrics.line_height,
            )
        };

        trace!(text = line, width = size.width(), height = size.height(); "Measured label");
        size
    }
}

static TEXT_MEASURER: OnceLock<TextMeasurer> = OnceLock::new();

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_empty_text_is_zero() {
        let size = measure_single_line("", &TextStyle::default());
        assert!(size.is_zero());
    }

    #[test]
    fn test_zero_font_size_is_zero() {
        let size = measure_single_line("repeat", &TextStyle::new("sans-serif", 0.0));
        assert!(size.is_zero());
    }

    #[test]
    fn test_single_line_height_matches_font_metrics() {
        let style = TextStyle::new("sans-serif", 10.0);
        let size = measure_single_line("print", &style);
        assert_approx_eq!(f32, size.height(), 10.0 * 1.33 * 1.15, epsilon = 0.001);
        assert!(size.width() > 0.0);
    }

    #[test]
    fn test_line_breaks_stay_on_one_line() {
        let style = TextStyle::default();
        let single = measure_single_line("count with", &style);
        let broken = measure_single_line("count\nwith", &style);
        assert_approx_eq!(f32, single.height(), broken.height());
    }

    #[test]
    fn test_style_scaled() {
        let style = TextStyle::new("serif", 14.0).scaled(2.0);
        assert_eq!(style.font_family(), "serif");
        assert_approx_eq!(f32, style.font_size(), 28.0);
    }
}
