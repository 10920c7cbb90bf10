// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis tick generation and label layout for charts.
//!
//! Axle turns a data domain into a positioned, labelled and non-overlapping set of ticks
//! along one side of a plot:
//! - **Scales** map data values into axis positions and propose tick values.
//! - The **tick pipeline** picks how many ticks to draw and thins, rotates or wraps their
//!   labels until they no longer collide.
//! - **Grouped category** axes lay nested category paths out as a tree.
//! - An [`Axis`] reports the space it needs and writes plain renderable records.
//!
//! Drawing, text shaping and animation timing stay with the host. Text is measured through
//! [`axle_text::TextMeasurer`]; transitions are handed to an [`AnimationManager`].
//!
//! ```
//! use axle::{Axis, AxisKind, AxisOrient, SkipAnimation};
//! use axle_text::HeuristicTextMeasurer;
//! use kurbo::Rect;
//!
//! let mut axis = Axis::new("x", AxisOrient::Bottom, AxisKind::Number { nice: true });
//! axis.set_plot(Rect::new(40.0, 10.0, 540.0, 310.0));
//! axis.set_domain(0.0, 100.0);
//! let layout = axis.calculate_layout(&HeuristicTextMeasurer, None).unwrap();
//! assert!(layout.bbox.y0 >= 310.0);
//!
//! axis.update(&mut SkipAnimation);
//! assert!(!axis.records().labels.is_empty());
//! ```

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod animation;
mod axis;
mod config;
mod cross_line;
mod diff;
mod error;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod grouped;
mod label;
mod overlap;
mod records;
mod scale;
mod selection;
mod strategy;
mod tick_count;
mod ticks;
mod time;
mod tree;
mod z_order;

pub use animation::{
    AnimationManager, AxisTransition, NodePhase, NodeProperties, NodeTransition, SkipAnimation,
};
pub use axis::{Axis, AxisKind, AxisLayout, AxisOrient};
pub use config::{
    AxisSpec, GridStyle, LabelOptions, StrokeStyle, TickOptions, TitleOptions, VALIDATION_RULES,
    ValidationRule,
};
pub use cross_line::{CrossLine, CrossLineKind, CrossLineOrientation};
pub use diff::UpdateDiff;
pub use error::{AxisError, FormatError};
pub use format::{
    LabelDatum, LabelFormatterFn, MAX_FRACTION_DIGITS, NumberFormat, format_fixed,
    fraction_digits,
};
pub use label::{
    AxisFrame, LabelPlacement, RotationState, TextAlign, TextBaseline, label_spacing,
    normalize_angle_360, title_rotation,
};
pub use overlap::labels_overlap;
pub use records::{
    AxisRecords, CrossLineLabel, CrossLineNode, CrossLineShape, GridNode, GroupLabelNode,
    LabelNode, LineNode, SeparatorNode, TickNode, TitleNode,
};
pub use scale::{AxisScale, ScaleBand, ScaleLinear, ScaleLog, ScaleTime, TickRequest};
pub use selection::Selection;
pub use strategy::{MAX_PIPELINE_ITERATIONS, TickGenerationResult, TickGenerationType};
pub use tick_count::{
    DEFAULT_MAX_TICK_COUNT, DEFAULT_TICK_COUNT, DEFAULT_TICK_MIN_SPACING, TickCountEnvelope,
    estimate_tick_count,
};
pub use ticks::{RANGE_TOLERANCE, TickData, TickRecord};
pub use time::{TimeFormat, format_time_seconds, time_ticks_seconds};
pub use tree::{LabelTree, ROOT, TreeNode};
pub use z_order::*;
