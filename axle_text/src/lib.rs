// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for axis layout.
//!
//! Axle needs to measure tick labels and titles to detect label collisions and to report
//! the space an axis occupies. Shaping and glyph layout stay downstream, so the axis engine
//! depends only on the small [`TextMeasurer`] interface defined here.
//!
//! A backend implements [`TextMeasurer::measure`] for a single line. Multi-line measurement
//! and wrapping are provided methods built on top of it, so every backend wraps text the
//! same way.

#![no_std]

extern crate alloc;

mod wrap;

use alloc::string::String;
use alloc::sync::Arc;

pub use wrap::WrapStrategy;

/// A minimal text measurement interface used by axis layout.
///
/// Implementations can be heuristic (fast, but inaccurate) or backed by a shaping engine.
pub trait TextMeasurer {
    /// Measure a single line of text.
    ///
    /// `text` is treated as a single line; use [`TextMeasurer::measure_lines`] for text that
    /// contains `\n`.
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;

    /// Measure text that may span several `\n`-separated lines.
    ///
    /// The width is the widest line and the height is the line height times the line count.
    fn measure_lines(&self, text: &str, style: &TextStyle) -> TextSize {
        let mut width = 0.0_f64;
        let mut height = 0.0;
        for line in text.split('\n') {
            let metrics = self.measure(line, style);
            width = width.max(metrics.advance_width);
            height += metrics.line_height();
        }
        TextSize { width, height }
    }

    /// Wrap `text` so that each line fits `max_width` and the block fits `max_height`.
    ///
    /// Lines that would not fit vertically are dropped and the last kept line ends with `…`.
    /// A non-finite `max_height` places no limit on the line count.
    fn wrap(
        &self,
        text: &str,
        max_width: f64,
        max_height: f64,
        style: &TextStyle,
        strategy: WrapStrategy,
    ) -> String {
        wrap::wrap_text(self, text, max_width, max_height, style, strategy)
    }
}

/// Text styling inputs relevant to measurement.
///
/// This is intentionally minimal: it’s just enough to make axis layout consistent.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in the chart’s coordinate system (typically pixels).
    pub font_size: f64,
    /// The preferred font family.
    pub font_family: FontFamily,
    /// Font weight (e.g. `400` for normal, `700` for bold).
    pub font_weight: FontWeight,
    /// Font style (normal/italic/oblique).
    pub font_style: FontStyle,
}

impl TextStyle {
    /// Creates a default `TextStyle` with the given `font_size`.
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            font_family: FontFamily::SansSerif,
            font_weight: FontWeight::NORMAL,
            font_style: FontStyle::Normal,
        }
    }

    /// Sets the font family.
    #[must_use]
    pub fn with_family(mut self, font_family: FontFamily) -> Self {
        self.font_family = font_family;
        self
    }

    /// Sets the font weight.
    #[must_use]
    pub fn with_weight(mut self, font_weight: FontWeight) -> Self {
        self.font_weight = font_weight;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(12.0)
    }
}

/// Font family selection for measurement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// A generic serif family (CSS `serif`).
    Serif,
    /// A generic sans-serif family (CSS `sans-serif`).
    SansSerif,
    /// A generic monospace family (CSS `monospace`).
    Monospace,
    /// A named family (e.g. `"Inter"`, `"Helvetica Neue"`).
    Named(Arc<str>),
}

impl FontFamily {
    /// Returns the font family string for CSS-style font declarations.
    #[must_use]
    pub fn as_css_family(&self) -> &str {
        match self {
            Self::Serif => "serif",
            Self::SansSerif => "sans-serif",
            Self::Monospace => "monospace",
            Self::Named(name) => name,
        }
    }
}

/// CSS-style font weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Normal weight (`400`).
    pub const NORMAL: Self = Self(400);
    /// Bold weight (`700`).
    pub const BOLD: Self = Self(700);
}

/// CSS-style font styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Normal style.
    Normal,
    /// Italic style.
    Italic,
    /// Oblique style.
    Oblique,
}

/// Measured metrics for a single line of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// The advance width (useful for horizontal layout).
    pub advance_width: f64,
    /// Distance from baseline to the top of typical glyphs.
    pub ascent: f64,
    /// Distance from baseline to the bottom of typical glyphs.
    pub descent: f64,
    /// Additional line spacing beyond ascent+descent.
    pub leading: f64,
}

impl TextMetrics {
    /// Returns `ascent + descent + leading`.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent + self.leading
    }
}

/// The measured extent of a (possibly multi-line) block of text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextSize {
    /// Width of the widest line.
    pub width: f64,
    /// Total height of all lines.
    pub height: f64,
}

/// A tiny heuristic text measurer suitable for demos and tests.
///
/// It assumes an average glyph width of ~0.6em and a baseline at ~0.8em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let advance_width = 0.6 * style.font_size * text.chars().count() as f64;
        let ascent = 0.8 * style.font_size;
        let descent = 0.2 * style.font_size;
        TextMetrics {
            advance_width,
            ascent,
            descent,
            leading: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn heuristic_width_scales_with_char_count() {
        let style = TextStyle::new(10.0);
        let m = HeuristicTextMeasurer.measure("abcd", &style);
        assert!((m.advance_width - 24.0).abs() < 1e-9, "got {m:?}");
        assert!((m.line_height() - 10.0).abs() < 1e-9, "got {m:?}");
    }

    #[test]
    fn builders_set_family_and_weight() {
        let style = TextStyle::new(11.0)
            .with_family(FontFamily::Monospace)
            .with_weight(FontWeight::BOLD);
        assert_eq!(style.font_family.as_css_family(), "monospace");
        assert_eq!(style.font_weight, FontWeight(700));
        assert_eq!(style.font_style, FontStyle::Normal);
    }

    #[test]
    fn measure_lines_uses_widest_line_and_sums_heights() {
        let style = TextStyle::new(10.0);
        let size = HeuristicTextMeasurer.measure_lines("ab\nabcdef\nc", &style);
        assert!((size.width - 36.0).abs() < 1e-9, "got {size:?}");
        assert!((size.height - 30.0).abs() < 1e-9, "got {size:?}");
    }
}
