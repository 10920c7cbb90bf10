// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Suggested z-order conventions for axis records.
//!
//! Every renderable record carries an explicit `z_index`. Renderers should sort by
//! `(z_index, id)` for a deterministic tie-break.

/// Gridlines drawn behind everything else.
pub const GRID_LINES: i32 = -50;
/// Cross-line range fills.
pub const CROSS_LINE_RANGES: i32 = -40;
/// Cross-line strokes.
pub const CROSS_LINES: i32 = -30;

/// Axis domain line.
pub const AXIS_LINE: i32 = 30;
/// Tick marks and group separators.
pub const AXIS_TICKS: i32 = 35;
/// Tick labels and group labels.
pub const AXIS_LABELS: i32 = 40;
/// Axis title labels.
pub const AXIS_TITLES: i32 = 50;
/// Cross-line labels, drawn above the axis.
pub const CROSS_LINE_LABELS: i32 = 60;
