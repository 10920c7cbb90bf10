// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderable axis records.
//!
//! Every record is plain data in the axis-local frame: the axis line runs along `y` and
//! labels sit on the `x` side given by the axis side flag. [`AxisRecords::transform`]
//! places the whole group in the chart. Renderers sort by `z_index`.

use alloc::string::String;
use alloc::vec::Vec;

use axle_text::TextStyle;
use kurbo::{Affine, Point, Rect};
use peniko::Brush;

use crate::config::StrokeStyle;
use crate::label::{TextAlign, TextBaseline};
use crate::z_order;

/// The axis line.
#[derive(Clone, Debug, PartialEq)]
pub struct LineNode {
    /// Start of the line.
    pub p0: Point,
    /// End of the line.
    pub p1: Point,
    /// Line stroke.
    pub stroke: StrokeStyle,
    /// Render order.
    pub z_index: i32,
}

/// One tick mark.
#[derive(Clone, Debug, PartialEq)]
pub struct TickNode {
    /// The tick id.
    pub id: String,
    /// Position along the axis.
    pub offset: f64,
    /// Local `x` where the mark starts (on the axis line).
    pub x0: f64,
    /// Local `x` where the mark ends.
    pub x1: f64,
    /// Mark stroke.
    pub stroke: StrokeStyle,
    /// Whether the mark is drawn.
    pub visible: bool,
    /// Render order.
    pub z_index: i32,
}

impl TickNode {
    pub(crate) fn new(id: String) -> Self {
        Self {
            id,
            offset: 0.0,
            x0: 0.0,
            x1: 0.0,
            stroke: StrokeStyle::default(),
            visible: false,
            z_index: z_order::AXIS_TICKS,
        }
    }
}

/// One gridline, spanning the plot.
#[derive(Clone, Debug, PartialEq)]
pub struct GridNode {
    /// The tick id.
    pub id: String,
    /// Position along the axis.
    pub offset: f64,
    /// Local `x` where the line starts.
    pub x0: f64,
    /// Local `x` where the line ends.
    pub x1: f64,
    /// Line stroke.
    pub stroke: StrokeStyle,
    /// Render order.
    pub z_index: i32,
}

impl GridNode {
    pub(crate) fn new(id: String) -> Self {
        Self {
            id,
            offset: 0.0,
            x0: 0.0,
            x1: 0.0,
            stroke: StrokeStyle::default(),
            z_index: z_order::GRID_LINES,
        }
    }
}

/// One tick label.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelNode {
    /// The tick id.
    pub id: String,
    /// Label text; `\n` separates lines.
    pub text: String,
    /// Anchor point.
    pub point: Point,
    /// Rotation about `point`, in radians.
    pub rotation: f64,
    /// Alignment along the text direction.
    pub text_align: TextAlign,
    /// Alignment across the text direction.
    pub text_baseline: TextBaseline,
    /// Font.
    pub style: TextStyle,
    /// Fill.
    pub fill: Brush,
    /// Opacity; animations fade labels in and out.
    pub opacity: f64,
    /// Whether the label is drawn.
    pub visible: bool,
    /// Render order.
    pub z_index: i32,
}

impl LabelNode {
    pub(crate) fn new(id: String) -> Self {
        Self {
            id,
            text: String::new(),
            point: Point::ZERO,
            rotation: 0.0,
            text_align: TextAlign::Center,
            text_baseline: TextBaseline::Middle,
            style: TextStyle::default(),
            fill: Brush::default(),
            opacity: 1.0,
            visible: false,
            z_index: z_order::AXIS_LABELS,
        }
    }
}

/// The axis title.
#[derive(Clone, Debug, PartialEq)]
pub struct TitleNode {
    /// Title text.
    pub text: String,
    /// Anchor point (the middle of the text).
    pub point: Point,
    /// Rotation about `point`, in radians.
    pub rotation: f64,
    /// Alignment across the text direction.
    pub text_baseline: TextBaseline,
    /// Font.
    pub style: TextStyle,
    /// Fill.
    pub fill: Brush,
    /// Render order.
    pub z_index: i32,
}

/// A group label on a grouped category axis.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupLabelNode {
    /// Group text.
    pub text: String,
    /// 1 for the innermost group row, increasing outwards.
    pub level: usize,
    /// Anchor point (the middle of the text).
    pub point: Point,
    /// Rotation about `point`, in radians.
    pub rotation: f64,
    /// Font.
    pub style: TextStyle,
    /// Fill.
    pub fill: Brush,
    /// Render order.
    pub z_index: i32,
}

/// A boundary line between sibling groups on a grouped category axis.
#[derive(Clone, Debug, PartialEq)]
pub struct SeparatorNode {
    /// Start of the line.
    pub p0: Point,
    /// End of the line.
    pub p1: Point,
    /// Line stroke.
    pub stroke: StrokeStyle,
    /// Render order.
    pub z_index: i32,
}

/// The shape of a cross-line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CrossLineShape {
    /// A line across the plot at `offset`.
    Line {
        /// Position along the axis.
        offset: f64,
    },
    /// A band across the plot between two offsets.
    Range {
        /// Lower position along the axis.
        start: f64,
        /// Upper position along the axis.
        end: f64,
    },
}

/// A cross-line label.
#[derive(Clone, Debug, PartialEq)]
pub struct CrossLineLabel {
    /// Label text.
    pub text: String,
    /// Anchor point (the middle of the text).
    pub point: Point,
    /// Rotation about `point`, in radians.
    pub rotation: f64,
    /// Font.
    pub style: TextStyle,
    /// Render order.
    pub z_index: i32,
}

/// A cross-line clipped to the visible range.
#[derive(Clone, Debug, PartialEq)]
pub struct CrossLineNode {
    /// The cross-line id.
    pub id: String,
    /// Where along the axis the cross-line sits.
    pub shape: CrossLineShape,
    /// Local `x` where the cross-line starts.
    pub x0: f64,
    /// Local `x` where the cross-line ends.
    pub x1: f64,
    /// Line stroke, for lines and range edges.
    pub stroke: Option<StrokeStyle>,
    /// Range fill.
    pub fill: Option<Brush>,
    /// Optional label.
    pub label: Option<CrossLineLabel>,
    /// `false` when the cross-line lies entirely outside the visible range.
    pub visible: bool,
    /// Render order.
    pub z_index: i32,
}

/// Everything an axis renders in one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisRecords {
    /// Places the axis-local frame in the chart.
    pub transform: Affine,
    /// The axis line.
    pub line: Option<LineNode>,
    /// Tick marks.
    pub ticks: Vec<TickNode>,
    /// Gridlines.
    pub grid: Vec<GridNode>,
    /// Tick labels.
    pub labels: Vec<LabelNode>,
    /// The title.
    pub title: Option<TitleNode>,
    /// Group labels.
    pub group_labels: Vec<GroupLabelNode>,
    /// Group separators.
    pub separators: Vec<SeparatorNode>,
    /// Cross-lines.
    pub cross_lines: Vec<CrossLineNode>,
}

impl Default for AxisRecords {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            line: None,
            ticks: Vec::new(),
            grid: Vec::new(),
            labels: Vec::new(),
            title: None,
            group_labels: Vec::new(),
            separators: Vec::new(),
            cross_lines: Vec::new(),
        }
    }
}

impl AxisRecords {
    /// Bounds of the visible tick marks and labels in chart coordinates.
    ///
    /// Text extents are not known here, so labels contribute their anchor only.
    pub fn anchor_bounds(&self) -> Option<Rect> {
        let points = self
            .ticks
            .iter()
            .filter(|t| t.visible)
            .flat_map(|t| [Point::new(t.x0, t.offset), Point::new(t.x1, t.offset)])
            .chain(self.labels.iter().filter(|l| l.visible).map(|l| l.point))
            .chain(self.line.iter().flat_map(|l| [l.p0, l.p1]));
        points
            .map(|p| self.transform * p)
            .fold(None, |acc: Option<Rect>, p| {
                Some(acc.map_or(Rect::from_points(p, p), |r| r.union_pt(p)))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;

    #[test]
    fn anchor_bounds_follow_the_transform() {
        let mut tick = TickNode::new("a".into());
        tick.offset = 100.0;
        tick.x1 = -6.0;
        tick.visible = true;
        let records = AxisRecords {
            transform: Affine::translate((10.0, 50.0)) * Affine::rotate(-FRAC_PI_2),
            ticks: alloc::vec![tick],
            ..AxisRecords::default()
        };
        let b = records.anchor_bounds().unwrap();
        // Local (x, y) maps to (10 + y, 50 - x).
        assert!((b.x0 - 110.0).abs() < 1e-9 && (b.x1 - 110.0).abs() < 1e-9, "{b:?}");
        assert!((b.y0 - 50.0).abs() < 1e-9 && (b.y1 - 56.0).abs() < 1e-9, "{b:?}");
    }

    #[test]
    fn hidden_records_have_no_bounds() {
        let records = AxisRecords {
            ticks: alloc::vec![TickNode::new("a".into())],
            ..AxisRecords::default()
        };
        assert_eq!(records.anchor_bounds(), None);
    }
}
