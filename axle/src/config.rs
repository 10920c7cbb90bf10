// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis configuration.
//!
//! An [`AxisSpec`] is plain data with `with_*` builders. It is checked against
//! [`VALIDATION_RULES`] whenever it is handed to an axis, so an axis never holds an invalid
//! configuration.

use alloc::string::String;
use alloc::vec::Vec;

use axle_text::{TextStyle, WrapStrategy};
use peniko::Brush;
use peniko::color::palette::css;

use crate::error::AxisError;
use crate::format::LabelFormatterFn;

/// A paint + width pair for stroked paths (axis lines, ticks, gridlines).
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
}

impl StrokeStyle {
    /// Convenience for a solid stroke.
    pub fn solid(brush: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::solid(css::BLACK, 1.0)
    }
}

/// Gridline styling.
#[derive(Clone, Debug, PartialEq)]
pub struct GridStyle {
    /// Stroke style for gridlines.
    pub stroke: StrokeStyle,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            stroke: StrokeStyle {
                brush: Brush::Solid(css::BLACK.with_alpha(40.0 / 255.0)),
                stroke_width: 1.0,
            },
        }
    }
}

/// Tick mark and tick generation options.
#[derive(Clone, Debug, PartialEq)]
pub struct TickOptions {
    /// Whether tick marks are drawn.
    pub enabled: bool,
    /// Tick mark length in pixels.
    pub size: f64,
    /// Tick mark stroke.
    pub stroke: StrokeStyle,
    /// Smallest pixel distance between adjacent ticks; `NaN` means unspecified.
    pub min_spacing: f64,
    /// Largest pixel distance between adjacent ticks; `NaN` means unspecified.
    pub max_spacing: f64,
    /// Explicit tick values. Used verbatim and ends tick generation.
    pub values: Option<Vec<f64>>,
    /// Explicit distance between ticks, in domain units (category count on band scales).
    pub interval: Option<f64>,
}

impl Default for TickOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 6.0,
            stroke: StrokeStyle::default(),
            min_spacing: f64::NAN,
            max_spacing: f64::NAN,
            values: None,
            interval: None,
        }
    }
}

impl TickOptions {
    /// Whether either spacing constraint was given.
    pub fn has_explicit_spacing(&self) -> bool {
        !self.min_spacing.is_nan() || !self.max_spacing.is_nan()
    }
}

/// Tick label options.
#[derive(Clone)]
pub struct LabelOptions {
    /// Whether tick labels are drawn.
    pub enabled: bool,
    /// Label font.
    pub style: TextStyle,
    /// Label fill.
    pub fill: Brush,
    /// Gap between the tick end and the label.
    pub padding: f64,
    /// Smallest gap between labels; `NaN` picks a default based on rotation.
    pub min_spacing: f64,
    /// Fixed label rotation in degrees.
    pub rotation: Option<f64>,
    /// Whether tick generation works to keep labels from overlapping.
    pub avoid_collisions: bool,
    /// Rotate labels by [`LabelOptions::auto_rotate_angle`] when they overlap.
    ///
    /// Ignored when [`LabelOptions::rotation`] is set.
    pub auto_rotate: bool,
    /// Angle in degrees used by auto-rotation.
    pub auto_rotate_angle: f64,
    /// Wrap label text to fit the space available per label when labels overlap.
    pub auto_wrap: bool,
    /// How auto-wrap breaks lines.
    pub wrapping: WrapStrategy,
    /// Upper bound on the wrapped label width.
    pub max_width: Option<f64>,
    /// Upper bound on the wrapped label height.
    pub max_height: Option<f64>,
    /// A format specifier, see [`crate::NumberFormat`] and [`crate::TimeFormat`].
    pub format: Option<String>,
    /// Custom label text; overrides `format`.
    pub formatter: Option<LabelFormatterFn>,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            style: TextStyle::new(12.0),
            fill: Brush::Solid(css::BLACK),
            padding: 5.0,
            min_spacing: f64::NAN,
            rotation: None,
            avoid_collisions: true,
            auto_rotate: false,
            auto_rotate_angle: 335.0,
            auto_wrap: false,
            wrapping: WrapStrategy::OnSpace,
            max_width: None,
            max_height: None,
            format: None,
            formatter: None,
        }
    }
}

impl core::fmt::Debug for LabelOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LabelOptions")
            .field("enabled", &self.enabled)
            .field("style", &self.style)
            .field("fill", &self.fill)
            .field("padding", &self.padding)
            .field("min_spacing", &self.min_spacing)
            .field("rotation", &self.rotation)
            .field("avoid_collisions", &self.avoid_collisions)
            .field("auto_rotate", &self.auto_rotate)
            .field("auto_rotate_angle", &self.auto_rotate_angle)
            .field("auto_wrap", &self.auto_wrap)
            .field("wrapping", &self.wrapping)
            .field("max_width", &self.max_width)
            .field("max_height", &self.max_height)
            .field("format", &self.format)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

/// Axis title options.
#[derive(Clone, Debug, PartialEq)]
pub struct TitleOptions {
    /// Title text.
    pub text: String,
    /// Title font.
    pub style: TextStyle,
    /// Title fill.
    pub fill: Brush,
    /// Gap between the labels and the title.
    pub spacing: f64,
}

impl TitleOptions {
    /// A title with default styling.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::new(14.0),
            fill: Brush::Solid(css::BLACK),
            spacing: 5.0,
        }
    }
}

/// Complete configuration of one axis.
#[derive(Clone, Debug)]
pub struct AxisSpec {
    /// Tick options.
    pub tick: TickOptions,
    /// Label options.
    pub label: LabelOptions,
    /// Optional title.
    pub title: Option<TitleOptions>,
    /// Axis line stroke; `None` hides the line.
    pub line: Option<StrokeStyle>,
    /// Gridlines spanning the plot; `None` hides them.
    pub grid: Option<GridStyle>,
    /// Largest thickness (perpendicular to the axis) available to labels when wrapping.
    pub max_thickness: f64,
    /// The visible fraction `(start, end)` of the full range, for zoom and pan.
    pub visible_range: (f64, f64),
}

impl Default for AxisSpec {
    fn default() -> Self {
        Self {
            tick: TickOptions::default(),
            label: LabelOptions::default(),
            title: None,
            line: Some(StrokeStyle::default()),
            grid: None,
            max_thickness: 200.0,
            visible_range: (0.0, 1.0),
        }
    }
}

impl AxisSpec {
    /// Checks every rule in [`VALIDATION_RULES`].
    pub fn validate(&self) -> Result<(), AxisError> {
        match VALIDATION_RULES.iter().find(|rule| !(rule.predicate)(self)) {
            Some(rule) => Err(AxisError::InvalidConfig {
                field: rule.field,
                message: rule.message,
            }),
            None => Ok(()),
        }
    }

    /// Sets the tick mark length.
    pub fn with_tick_size(mut self, size: f64) -> Self {
        self.tick.size = size;
        self
    }

    /// Enables or disables tick marks.
    pub fn with_ticks(mut self, enabled: bool) -> Self {
        self.tick.enabled = enabled;
        self
    }

    /// Sets the pixel spacing constraints between ticks (`NaN` leaves one unspecified).
    pub fn with_tick_spacing(mut self, min_spacing: f64, max_spacing: f64) -> Self {
        self.tick.min_spacing = min_spacing;
        self.tick.max_spacing = max_spacing;
        self
    }

    /// Uses explicit tick values.
    pub fn with_tick_values(mut self, values: impl Into<Vec<f64>>) -> Self {
        self.tick.values = Some(values.into());
        self
    }

    /// Uses an explicit tick interval.
    pub fn with_tick_interval(mut self, interval: f64) -> Self {
        self.tick.interval = Some(interval);
        self
    }

    /// Enables or disables tick labels.
    pub fn with_labels(mut self, enabled: bool) -> Self {
        self.label.enabled = enabled;
        self
    }

    /// Sets the label font.
    pub fn with_label_style(mut self, style: TextStyle) -> Self {
        self.label.style = style;
        self
    }

    /// Sets the gap between tick and label.
    pub fn with_label_padding(mut self, padding: f64) -> Self {
        self.label.padding = padding;
        self
    }

    /// Sets the smallest gap between labels.
    pub fn with_label_min_spacing(mut self, min_spacing: f64) -> Self {
        self.label.min_spacing = min_spacing;
        self
    }

    /// Sets a fixed label rotation in degrees.
    pub fn with_label_rotation(mut self, degrees: f64) -> Self {
        self.label.rotation = Some(degrees);
        self
    }

    /// Enables or disables collision avoidance.
    pub fn with_avoid_collisions(mut self, avoid: bool) -> Self {
        self.label.avoid_collisions = avoid;
        self
    }

    /// Enables auto-rotation by `degrees` when labels overlap.
    pub fn with_auto_rotate(mut self, degrees: f64) -> Self {
        self.label.auto_rotate = true;
        self.label.auto_rotate_angle = degrees;
        self
    }

    /// Enables auto-wrapping with `strategy`.
    pub fn with_auto_wrap(mut self, strategy: WrapStrategy) -> Self {
        self.label.auto_wrap = true;
        self.label.wrapping = strategy;
        self
    }

    /// Caps the size of wrapped labels.
    pub fn with_label_max_size(mut self, max_width: Option<f64>, max_height: Option<f64>) -> Self {
        self.label.max_width = max_width;
        self.label.max_height = max_height;
        self
    }

    /// Sets a label format specifier.
    pub fn with_label_format(mut self, format: impl Into<String>) -> Self {
        self.label.format = Some(format.into());
        self
    }

    /// Sets a custom label formatter.
    pub fn with_label_formatter(mut self, formatter: LabelFormatterFn) -> Self {
        self.label.formatter = Some(formatter);
        self
    }

    /// Adds a title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(TitleOptions::new(title));
        self
    }

    /// Sets the axis line stroke.
    pub fn with_line(mut self, line: Option<StrokeStyle>) -> Self {
        self.line = line;
        self
    }

    /// Sets gridline styling.
    pub fn with_grid(mut self, grid: GridStyle) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Sets the largest label thickness used for wrapping.
    pub fn with_max_thickness(mut self, max_thickness: f64) -> Self {
        self.max_thickness = max_thickness;
        self
    }

    /// Shows only the `(start, end)` fraction of the full range.
    pub fn with_visible_range(mut self, start: f64, end: f64) -> Self {
        self.visible_range = (start, end);
        self
    }
}

/// One configuration constraint.
#[derive(Clone, Copy, Debug)]
pub struct ValidationRule {
    /// Dotted path of the checked field.
    pub field: &'static str,
    /// Returns `true` when the configuration satisfies the rule.
    pub predicate: fn(&AxisSpec) -> bool,
    /// What the field must satisfy.
    pub message: &'static str,
}

fn nan_or_at_least(v: f64, min: f64) -> bool {
    v.is_nan() || v >= min
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Every constraint an [`AxisSpec`] must satisfy, checked in order.
pub static VALIDATION_RULES: &[ValidationRule] = &[
    ValidationRule {
        field: "tick.size",
        predicate: |s| s.tick.size.is_finite() && s.tick.size >= 0.0,
        message: "must be a non-negative number",
    },
    ValidationRule {
        field: "tick.min_spacing",
        predicate: |s| nan_or_at_least(s.tick.min_spacing, 0.0),
        message: "must be NaN or a non-negative number",
    },
    ValidationRule {
        field: "tick.max_spacing",
        predicate: |s| nan_or_at_least(s.tick.max_spacing, 1.0),
        message: "must be NaN or at least 1",
    },
    ValidationRule {
        field: "tick.interval",
        predicate: |s| s.tick.interval.is_none_or(positive),
        message: "must be a positive number",
    },
    ValidationRule {
        field: "label.font_size",
        predicate: |s| positive(s.label.style.font_size),
        message: "must be a positive number",
    },
    ValidationRule {
        field: "label.padding",
        predicate: |s| s.label.padding.is_finite(),
        message: "must be a finite number",
    },
    ValidationRule {
        field: "label.min_spacing",
        predicate: |s| nan_or_at_least(s.label.min_spacing, 0.0),
        message: "must be NaN or a non-negative number",
    },
    ValidationRule {
        field: "label.rotation",
        predicate: |s| s.label.rotation.is_none_or(f64::is_finite),
        message: "must be a finite angle in degrees",
    },
    ValidationRule {
        field: "label.auto_rotate_angle",
        predicate: |s| s.label.auto_rotate_angle.is_finite(),
        message: "must be a finite angle in degrees",
    },
    ValidationRule {
        field: "label.max_width",
        predicate: |s| s.label.max_width.is_none_or(positive),
        message: "must be a positive number",
    },
    ValidationRule {
        field: "label.max_height",
        predicate: |s| s.label.max_height.is_none_or(positive),
        message: "must be a positive number",
    },
    ValidationRule {
        field: "title.font_size",
        predicate: |s| s.title.as_ref().is_none_or(|t| positive(t.style.font_size)),
        message: "must be a positive number",
    },
    ValidationRule {
        field: "title.spacing",
        predicate: |s| {
            s.title
                .as_ref()
                .is_none_or(|t| t.spacing.is_finite() && t.spacing >= 0.0)
        },
        message: "must be a non-negative number",
    },
    ValidationRule {
        field: "max_thickness",
        predicate: |s| positive(s.max_thickness),
        message: "must be a positive number",
    },
    ValidationRule {
        field: "visible_range",
        predicate: |s| {
            let (start, end) = s.visible_range;
            start >= 0.0 && start < end && end <= 1.0
        },
        message: "must satisfy 0 <= start < end <= 1",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(spec: &AxisSpec) -> Option<&'static str> {
        match spec.validate() {
            Err(AxisError::InvalidConfig { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn default_spec_is_valid() {
        assert_eq!(AxisSpec::default().validate(), Ok(()));
    }

    #[test]
    fn each_rule_reports_its_field() {
        let cases: [(AxisSpec, &str); 15] = [
            (AxisSpec::default().with_tick_size(-1.0), "tick.size"),
            (
                AxisSpec::default().with_tick_spacing(-2.0, f64::NAN),
                "tick.min_spacing",
            ),
            (
                AxisSpec::default().with_tick_spacing(f64::NAN, 0.5),
                "tick.max_spacing",
            ),
            (AxisSpec::default().with_tick_interval(0.0), "tick.interval"),
            (
                AxisSpec::default().with_label_style(TextStyle::new(0.0)),
                "label.font_size",
            ),
            (
                AxisSpec::default().with_label_padding(f64::INFINITY),
                "label.padding",
            ),
            (
                AxisSpec::default().with_label_min_spacing(-1.0),
                "label.min_spacing",
            ),
            (
                AxisSpec::default().with_label_rotation(f64::NAN),
                "label.rotation",
            ),
            (
                AxisSpec::default().with_auto_rotate(f64::INFINITY),
                "label.auto_rotate_angle",
            ),
            (
                AxisSpec::default().with_label_max_size(Some(0.0), None),
                "label.max_width",
            ),
            (
                AxisSpec::default().with_label_max_size(None, Some(-4.0)),
                "label.max_height",
            ),
            (
                {
                    let mut s = AxisSpec::default().with_title("t");
                    if let Some(t) = s.title.as_mut() {
                        t.style.font_size = -1.0;
                    }
                    s
                },
                "title.font_size",
            ),
            (
                {
                    let mut s = AxisSpec::default().with_title("t");
                    if let Some(t) = s.title.as_mut() {
                        t.spacing = -1.0;
                    }
                    s
                },
                "title.spacing",
            ),
            (AxisSpec::default().with_max_thickness(0.0), "max_thickness"),
            (
                AxisSpec::default().with_visible_range(0.5, 0.5),
                "visible_range",
            ),
        ];
        for (spec, field) in cases {
            assert_eq!(field_of(&spec), Some(field), "{spec:?}");
        }
    }

    #[test]
    fn every_rule_is_exercised() {
        assert_eq!(VALIDATION_RULES.len(), 15);
    }

    #[test]
    fn nan_spacing_is_unspecified() {
        let spec = AxisSpec::default().with_tick_spacing(f64::NAN, f64::NAN);
        assert!(spec.validate().is_ok());
        assert!(!spec.tick.has_explicit_spacing());
        assert!(AxisSpec::default().with_tick_spacing(20.0, f64::NAN).tick.has_explicit_spacing());
    }
}
