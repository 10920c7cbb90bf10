// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-lines: reference lines and bands drawn across the plot at axis values.

use alloc::string::String;

use axle_text::TextStyle;
use kurbo::Point;
use peniko::Brush;
use peniko::color::palette::css;

use crate::config::StrokeStyle;
use crate::label::normalize_angle_360;
use crate::records::{CrossLineLabel, CrossLineNode, CrossLineShape};
use crate::scale::AxisScale;
use crate::ticks::RANGE_TOLERANCE;
use crate::z_order;

/// Where a cross-line sits, in domain values (category indices on band scales).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CrossLineKind {
    /// A line at `value`.
    Line {
        /// Domain value.
        value: f64,
    },
    /// A band from `start` to `end`, inclusive of both categories on band scales.
    Range {
        /// Domain value at one edge.
        start: f64,
        /// Domain value at the other edge.
        end: f64,
    },
}

/// Axis placement state pushed into every attached cross-line during layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CrossLineOrientation {
    /// The axis side flag (`-1` or `1`).
    pub side: f64,
    /// Rotation of the axis group.
    pub axis_rotation: f64,
    /// Rotation that keeps text parallel to the axis upright.
    pub parallel_flip_rotation: f64,
    /// Rotation that keeps text perpendicular to the axis upright.
    pub regular_flip_rotation: f64,
    /// How far the plot extends from the axis line.
    pub grid_length: f64,
}

/// A reference line or band attached to an axis.
#[derive(Clone, Debug, PartialEq)]
pub struct CrossLine {
    /// Stable id.
    pub id: String,
    /// Position.
    pub kind: CrossLineKind,
    /// Optional label, drawn upright in the middle of the cross-line.
    pub label: Option<String>,
    /// Label font.
    pub label_style: TextStyle,
    /// Stroke for lines and range edges.
    pub stroke: Option<StrokeStyle>,
    /// Range fill.
    pub fill: Option<Brush>,
    orientation: CrossLineOrientation,
}

impl CrossLine {
    fn new(id: impl Into<String>, kind: CrossLineKind) -> Self {
        Self {
            id: id.into(),
            kind,
            label: None,
            label_style: TextStyle::new(11.0),
            stroke: None,
            fill: None,
            orientation: CrossLineOrientation::default(),
        }
    }

    /// A line at `value`.
    pub fn line(id: impl Into<String>, value: f64) -> Self {
        let mut line = Self::new(id, CrossLineKind::Line { value });
        line.stroke = Some(StrokeStyle::solid(css::RED, 1.0));
        line
    }

    /// A band between `start` and `end`.
    pub fn range(id: impl Into<String>, start: f64, end: f64) -> Self {
        let mut range = Self::new(id, CrossLineKind::Range { start, end });
        range.fill = Some(Brush::Solid(css::STEEL_BLUE.with_alpha(0.2)));
        range
    }

    /// Adds a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the stroke.
    pub fn with_stroke(mut self, stroke: Option<StrokeStyle>) -> Self {
        self.stroke = stroke;
        self
    }

    /// Sets the fill.
    pub fn with_fill(mut self, fill: Option<Brush>) -> Self {
        self.fill = fill;
        self
    }

    /// The orientation last pushed by the owning axis.
    pub fn orientation(&self) -> CrossLineOrientation {
        self.orientation
    }

    pub(crate) fn set_orientation(&mut self, orientation: CrossLineOrientation) {
        self.orientation = orientation;
    }

    /// The `[lo, hi]` span along the axis, before clipping.
    fn span(&self, scale: &AxisScale) -> (f64, f64) {
        let bandwidth = scale.bandwidth();
        match self.kind {
            CrossLineKind::Line { value } => {
                let offset = scale.convert(value) + bandwidth / 2.0;
                (offset, offset)
            }
            CrossLineKind::Range { start, end } => {
                let (a, b) = (scale.convert(start), scale.convert(end));
                (a.min(b), a.max(b) + bandwidth)
            }
        }
    }

    /// The renderable record, clipped to the ordered `visible` range.
    pub(crate) fn node(&self, scale: &AxisScale, visible: (f64, f64)) -> CrossLineNode {
        let (lo, hi) = self.span(scale);
        let o = self.orientation;
        let x1 = -o.side * o.grid_length;
        let (shape, shown, middle) = match self.kind {
            CrossLineKind::Line { .. } => (
                CrossLineShape::Line { offset: lo },
                lo.is_finite()
                    && lo >= visible.0 - RANGE_TOLERANCE
                    && lo <= visible.1 + RANGE_TOLERANCE,
                lo,
            ),
            CrossLineKind::Range { .. } => {
                let (start, end) = (lo.max(visible.0), hi.min(visible.1));
                (
                    CrossLineShape::Range { start, end },
                    start.is_finite() && end.is_finite() && start < end,
                    (start + end) / 2.0,
                )
            }
        };
        let label = self.label.as_ref().map(|text| CrossLineLabel {
            text: text.clone(),
            point: Point::new(x1 / 2.0, middle),
            rotation: normalize_angle_360(-o.axis_rotation),
            style: self.label_style.clone(),
            z_index: z_order::CROSS_LINE_LABELS,
        });
        CrossLineNode {
            id: self.id.clone(),
            shape,
            x0: 0.0,
            x1,
            stroke: self.stroke.clone(),
            fill: self.fill.clone(),
            label,
            visible: shown,
            z_index: match self.kind {
                CrossLineKind::Line { .. } => z_order::CROSS_LINES,
                CrossLineKind::Range { .. } => z_order::CROSS_LINE_RANGES,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::{ScaleBand, ScaleLinear};
    use core::f64::consts::FRAC_PI_2;

    fn bottom(grid_length: f64) -> CrossLineOrientation {
        CrossLineOrientation {
            side: -1.0,
            axis_rotation: -FRAC_PI_2,
            parallel_flip_rotation: 3.0 * FRAC_PI_2,
            regular_flip_rotation: 0.0,
            grid_length,
        }
    }

    #[test]
    fn lines_span_the_plot_on_the_far_side() {
        let scale = AxisScale::Linear(ScaleLinear::new((0.0, 100.0), (0.0, 500.0)));
        let mut line = CrossLine::line("avg", 40.0).with_label("average");
        line.set_orientation(bottom(300.0));
        let node = line.node(&scale, (0.0, 500.0));
        assert_eq!(node.shape, CrossLineShape::Line { offset: 200.0 });
        assert_eq!((node.x0, node.x1), (0.0, 300.0));
        assert!(node.visible);
        let label = node.label.unwrap();
        assert_eq!(label.point, Point::new(150.0, 200.0));
        assert!((label.rotation - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn ranges_are_clipped_to_the_visible_range() {
        let scale = AxisScale::Linear(ScaleLinear::new((0.0, 100.0), (0.0, 500.0)));
        let range = CrossLine::range("r", 80.0, 150.0);
        let node = range.node(&scale, (0.0, 500.0));
        assert_eq!(node.shape, CrossLineShape::Range { start: 400.0, end: 500.0 });
        assert!(node.visible);

        let outside = CrossLine::range("o", 120.0, 150.0).node(&scale, (0.0, 500.0));
        assert!(!outside.visible);
        let line = CrossLine::line("l", -5.0).node(&scale, (0.0, 500.0));
        assert!(!line.visible);
    }

    #[test]
    fn band_ranges_cover_whole_bands() {
        let scale = AxisScale::Band(ScaleBand::new((0.0, 100.0), 4).with_padding(0.0, 0.0));
        let node = CrossLine::range("b", 1.0, 2.0).node(&scale, (0.0, 100.0));
        assert_eq!(node.shape, CrossLineShape::Range { start: 25.0, end: 75.0 });
        let line = CrossLine::line("l", 3.0).node(&scale, (0.0, 100.0));
        assert_eq!(line.shape, CrossLineShape::Line { offset: 87.5 });
    }
}
