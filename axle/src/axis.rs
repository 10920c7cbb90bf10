// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The axis: layout and update.
//!
//! An [`Axis`] is driven in two phases per frame:
//!
//! - [`Axis::calculate_layout`] rebuilds the scale, runs the tick pipeline and reports the
//!   space the axis needs. The tick set is cached.
//! - [`Axis::update`] turns the cached tick set into [`AxisRecords`], diffs tick ids against
//!   the previous frame and hands the transition to an [`AnimationManager`].
//!
//! Everything is laid out in an axis-local frame where the axis line runs along `y`; a
//! single transform places that frame in the chart.

use alloc::string::String;
use alloc::vec::Vec;

use axle_text::TextMeasurer;
use hashbrown::HashMap;
use kurbo::{Affine, Point, Rect};

use crate::animation::{AnimationManager, AxisTransition, NodePhase, NodeProperties, NodeTransition};
use crate::config::AxisSpec;
use crate::cross_line::{CrossLine, CrossLineOrientation};
use crate::diff::UpdateDiff;
use crate::error::AxisError;
use crate::format::{LabelDomain, ResolvedFormat};
use crate::grouped::{GroupLayout, GroupStyle, layout_groups};
use crate::label::{AxisFrame, LabelPlacement, RotationState, TextAlign, title_rotation};
use crate::records::{AxisRecords, GridNode, LabelNode, LineNode, TickNode, TitleNode};
use crate::scale::{AxisScale, ScaleBand, ScaleLinear, ScaleLog, ScaleTime};
use crate::selection::Selection;
use crate::strategy::{TickGenerationResult, TickPipeline, label_x, place_labels};
use crate::tick_count::estimate_tick_count;
use crate::ticks::{TickData, TickRecord};
use crate::tree::LabelTree;
use crate::z_order;

/// Axis placement relative to the plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// A horizontal axis placed above the plot area.
    Top,
    /// A horizontal axis placed below the plot area.
    Bottom,
    /// A vertical axis placed to the left of the plot area.
    Left,
    /// A vertical axis placed to the right of the plot area.
    Right,
}

impl AxisOrient {
    /// Whether the axis runs horizontally.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// The label geometry frame for this placement.
    pub fn frame(self) -> AxisFrame {
        let horizontal = self.is_horizontal();
        AxisFrame {
            rotation: if horizontal {
                -core::f64::consts::FRAC_PI_2
            } else {
                0.0
            },
            side: match self {
                Self::Bottom | Self::Left => -1.0,
                Self::Top | Self::Right => 1.0,
            },
            parallel: horizontal,
        }
    }

    /// Where the axis-local origin lands for a plot rectangle.
    fn origin(self, plot: Rect) -> Point {
        match self {
            Self::Bottom => Point::new(plot.x0, plot.y1),
            Self::Top | Self::Left => Point::new(plot.x0, plot.y0),
            Self::Right => Point::new(plot.x1, plot.y0),
        }
    }
}

/// What an axis measures, which picks its scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AxisKind {
    /// A linear numeric axis.
    Number {
        /// Extend the domain to round tick values.
        nice: bool,
    },
    /// A logarithmic axis.
    Log {
        /// Log base.
        base: f64,
    },
    /// A time axis over timestamps in seconds.
    Time,
    /// A category axis over bands.
    Category {
        /// Inner and outer band padding, in band units.
        padding: f64,
    },
    /// A category axis whose categories are grouped by label paths.
    GroupedCategory,
}

/// What [`Axis::calculate_layout`] reports to the chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisLayout {
    /// The raw tick count a linked secondary axis should align to.
    pub primary_tick_count: Option<usize>,
    /// Chart-space bounds of everything the axis draws.
    pub bbox: Rect,
}

/// Layout results cached for the update phase.
#[derive(Clone, Debug)]
struct ComputedLayout {
    result: TickGenerationResult,
    frame: AxisFrame,
    transform: Affine,
    visible: (f64, f64),
    grid_length: f64,
    label_x: f64,
    title: Option<TitleNode>,
    groups: GroupLayout,
}

/// One chart axis.
#[derive(Debug)]
pub struct Axis {
    id: String,
    orient: AxisOrient,
    kind: AxisKind,
    spec: AxisSpec,
    format: ResolvedFormat,
    format_warned: bool,
    plot: Rect,
    domain: Option<(f64, f64)>,
    categories: Vec<String>,
    tree: Option<LabelTree>,
    cross_lines: Vec<CrossLine>,
    min_rect_distance: Option<f64>,
    scale: Option<AxisScale>,
    computed: Option<ComputedLayout>,
    previous_ticks: Vec<TickRecord>,
    tick_nodes: Selection<TickRecord, TickNode>,
    grid_nodes: Selection<TickRecord, GridNode>,
    label_nodes: Selection<TickRecord, LabelNode>,
    records: AxisRecords,
}

impl Axis {
    /// Creates an axis with the default [`AxisSpec`].
    pub fn new(id: impl Into<String>, orient: AxisOrient, kind: AxisKind) -> Self {
        Self {
            id: id.into(),
            orient,
            kind,
            spec: AxisSpec::default(),
            format: ResolvedFormat::Default,
            format_warned: false,
            plot: Rect::ZERO,
            domain: None,
            categories: Vec::new(),
            tree: None,
            cross_lines: Vec::new(),
            min_rect_distance: None,
            scale: None,
            computed: None,
            previous_ticks: Vec::new(),
            tick_nodes: Selection::new(),
            grid_nodes: Selection::new(),
            label_nodes: Selection::new(),
            records: AxisRecords::default(),
        }
    }

    /// The axis id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Where the axis sits.
    pub fn orient(&self) -> AxisOrient {
        self.orient
    }

    /// What the axis measures.
    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    /// The current configuration.
    pub fn spec(&self) -> &AxisSpec {
        &self.spec
    }

    /// Replaces the configuration after validating it.
    ///
    /// An invalid configuration is rejected and the previous one stays in place.
    pub fn set_spec(&mut self, spec: AxisSpec) -> Result<(), AxisError> {
        spec.validate()?;
        self.spec = spec;
        self.resolve_format();
        Ok(())
    }

    fn resolve_format(&mut self) {
        let is_time = matches!(self.kind, AxisKind::Time);
        self.format = match &self.spec.label.format {
            None => ResolvedFormat::Default,
            Some(format) => match ResolvedFormat::parse(format, is_time) {
                Ok(resolved) => resolved,
                Err(error) => {
                    if !self.format_warned {
                        self.format_warned = true;
                        tracing::warn!(
                            axis = %self.id,
                            %format,
                            %error,
                            "unsupported label format, using default formatting"
                        );
                    }
                    ResolvedFormat::Default
                }
            },
        };
    }

    /// Sets the plot rectangle the axis is attached to.
    pub fn set_plot(&mut self, plot: Rect) {
        self.plot = plot;
    }

    /// Sets the data extent of a continuous axis.
    pub fn set_domain(&mut self, d0: f64, d1: f64) {
        self.domain = Some((d0, d1));
    }

    /// Sets the categories of a category axis and drops any grouping.
    pub fn set_categories<I, S>(&mut self, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self.tree = None;
    }

    /// Sets grouped categories from label paths, outermost group first.
    ///
    /// The leaves, in tree order, become the categories.
    pub fn set_category_paths<P, S>(&mut self, paths: &[P])
    where
        P: AsRef<[S]>,
        S: AsRef<str>,
    {
        let tree = LabelTree::from_paths(paths);
        self.categories = tree
            .leaves()
            .into_iter()
            .map(|id| tree.node(id).label.clone())
            .collect();
        self.tree = Some(tree);
    }

    /// The categories, in band order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// The grouped-category tree, when paths were set.
    pub fn label_tree(&self) -> Option<&LabelTree> {
        self.tree.as_ref()
    }

    /// Sets the smallest distance between adjacent data items, as measured by the chart.
    ///
    /// It is read by the next layout pass.
    pub fn set_min_rect_distance(&mut self, distance: Option<f64>) {
        self.min_rect_distance = distance;
    }

    /// Attaches a cross-line.
    pub fn add_cross_line(&mut self, cross_line: CrossLine) {
        self.cross_lines.push(cross_line);
    }

    /// Detaches the cross-line with `id`.
    pub fn remove_cross_line(&mut self, id: &str) -> Option<CrossLine> {
        let index = self.cross_lines.iter().position(|c| c.id == id)?;
        Some(self.cross_lines.remove(index))
    }

    /// The attached cross-lines.
    pub fn cross_lines(&self) -> &[CrossLine] {
        &self.cross_lines
    }

    /// The scale built by the last layout pass.
    pub fn scale(&self) -> Option<&AxisScale> {
        self.scale.as_ref()
    }

    /// The tick set of the last layout pass.
    pub fn tick_generation_result(&self) -> Option<&TickGenerationResult> {
        self.computed.as_ref().map(|c| &c.result)
    }

    /// The records written by the last update.
    pub fn records(&self) -> &AxisRecords {
        &self.records
    }

    /// The full scale range and the ordered visible window within it.
    fn ranges(&self) -> ((f64, f64), (f64, f64)) {
        let base = if self.orient.is_horizontal() {
            (0.0, self.plot.width())
        } else {
            (self.plot.height(), 0.0)
        };
        let (start, end) = self.spec.visible_range;
        let full = (base.1 - base.0) / (end - start);
        let r0 = base.0 - start * full;
        ((r0, r0 + full), (base.0.min(base.1), base.0.max(base.1)))
    }

    fn build_scale(&self, range: (f64, f64), visible_length: f64) -> Option<AxisScale> {
        let domain = self
            .domain
            .filter(|(d0, d1)| d0.is_finite() && d1.is_finite());
        Some(match self.kind {
            AxisKind::Number { nice } => {
                let scale = ScaleLinear::new(domain?, range);
                AxisScale::Linear(if nice {
                    let envelope = estimate_tick_count(
                        visible_length,
                        self.spec.tick.min_spacing,
                        self.spec.tick.max_spacing,
                        self.min_rect_distance,
                    );
                    scale.nice(envelope.default_tick_count)
                } else {
                    scale
                })
            }
            AxisKind::Log { base } => AxisScale::Log(ScaleLog::new(domain?, range).with_base(base)),
            AxisKind::Time => AxisScale::Time(ScaleTime::new(domain?, range)),
            AxisKind::Category { padding } => AxisScale::Band(
                ScaleBand::new(range, self.categories.len()).with_padding(padding, padding),
            ),
            AxisKind::GroupedCategory => {
                AxisScale::Band(ScaleBand::new(range, self.categories.len()))
            }
        })
    }

    /// Rebuilds the scale, generates ticks and measures the axis.
    ///
    /// `primary_tick_count` comes from the [`AxisLayout`] of a primary axis and makes this
    /// axis align its ticks to it. Fails only when this axis cannot act as a secondary axis.
    pub fn calculate_layout(
        &mut self,
        measurer: &dyn TextMeasurer,
        primary_tick_count: Option<usize>,
    ) -> Result<AxisLayout, AxisError> {
        let frame = self.orient.frame();
        let (range, visible) = self.ranges();
        let grid_length = if self.orient.is_horizontal() {
            self.plot.height()
        } else {
            self.plot.width()
        };
        let transform =
            Affine::translate(self.orient.origin(self.plot).to_vec2()) * Affine::rotate(frame.rotation);

        self.scale = self.build_scale(range, visible.1 - visible.0);
        let label_domain = match self.kind {
            AxisKind::Number { .. } | AxisKind::Log { .. } => LabelDomain::Number,
            AxisKind::Time => LabelDomain::Time,
            AxisKind::Category { .. } | AxisKind::GroupedCategory => {
                LabelDomain::Category(&self.categories)
            }
        };
        let result = match self.scale.as_mut() {
            Some(scale) => TickPipeline {
                scale,
                spec: &self.spec,
                frame,
                measurer,
                label_domain,
                format: &self.format,
                visible,
                min_rect_distance: self.min_rect_distance,
            }
            .run(primary_tick_count)?,
            None => empty_result(&self.spec, frame),
        };

        let orientation = CrossLineOrientation {
            side: frame.side,
            axis_rotation: frame.rotation,
            parallel_flip_rotation: frame.parallel_flip_rotation(),
            regular_flip_rotation: frame.regular_flip_rotation(),
            grid_length,
        };
        for cross_line in &mut self.cross_lines {
            cross_line.set_orientation(orientation);
        }

        let mut bounds = None;
        if self.spec.line.is_some() {
            grow(&mut bounds, Rect::new(0.0, visible.0, 0.0, visible.1));
        }
        let ticks = &result.tick_data.ticks;
        if self.spec.tick.enabled {
            let x1 = frame.side * self.spec.tick.size;
            for tick in ticks {
                grow(&mut bounds, Rect::new(0.0, tick.offset, x1, tick.offset).abs());
            }
        }
        let label_x = label_x(&self.spec, frame);
        let outer = |r: Rect| if frame.side < 0.0 { -r.x0 } else { r.x1 };
        let mut label_edge = label_x.abs();
        if self.spec.label.enabled {
            let placements = place_labels(
                ticks,
                label_x,
                &result.rotation,
                frame,
                measurer,
                &self.spec.label.style,
            );
            for placement in &placements {
                let b = placement.bounding_box();
                label_edge = label_edge.max(outer(b));
                grow(&mut bounds, b);
            }
        }

        let groups = match (&mut self.tree, &self.scale) {
            (Some(tree), Some(scale))
                if self.kind == AxisKind::GroupedCategory && self.spec.label.enabled =>
            {
                layout_groups(
                    tree,
                    scale,
                    visible,
                    frame,
                    label_edge,
                    GroupStyle {
                        text: &self.spec.label.style,
                        fill: &self.spec.label.fill,
                        padding: self.spec.label.padding,
                        stroke: &self.spec.tick.stroke,
                    },
                    measurer,
                )
            }
            _ => GroupLayout::default(),
        };
        if let Some(b) = groups.bounds {
            grow(&mut bounds, b);
        }

        let title = self.spec.title.as_ref().map(|options| {
            let edge = bounds.map_or(0.0, |b| outer(b).max(0.0));
            let (rotation, text_baseline) = title_rotation(frame);
            TitleNode {
                text: options.text.clone(),
                point: Point::new(
                    frame.side * (edge + options.spacing),
                    (visible.0 + visible.1) / 2.0,
                ),
                rotation,
                text_baseline,
                style: options.style.clone(),
                fill: options.fill.clone(),
                z_index: z_order::AXIS_TITLES,
            }
        });
        if let Some(title) = &title {
            let size = measurer.measure_lines(&title.text, &title.style);
            let placement = LabelPlacement {
                point: title.point,
                width: size.width,
                height: size.height,
                rotation: title.rotation,
                text_align: TextAlign::Center,
                text_baseline: title.text_baseline,
                text: title.text.clone(),
            };
            grow(&mut bounds, placement.bounding_box());
        }

        let bbox = match bounds {
            Some(b) => transform.transform_rect_bbox(b),
            None => {
                let origin = transform * Point::ZERO;
                Rect::from_points(origin, origin)
            }
        };
        tracing::debug!(
            axis = %self.id,
            ticks = result.tick_data.ticks.len(),
            iterations = result.iterations,
            rotation = result.combined_rotation(),
            ?bbox,
            "axis layout"
        );

        let layout = AxisLayout {
            primary_tick_count: result.primary_tick_count,
            bbox,
        };
        self.computed = Some(ComputedLayout {
            result,
            frame,
            transform,
            visible,
            grid_length,
            label_x,
            title,
            groups,
        });
        Ok(layout)
    }

    /// Writes the records for the cached tick set and requests the transition.
    ///
    /// Ticks are not regenerated; call [`Axis::calculate_layout`] first. When `animation`
    /// is skipped the records are final and no transition is requested. Otherwise the
    /// records still hold the final state and the transition describes how to reach it,
    /// including ticks that are gone from the records.
    pub fn update(&mut self, animation: &mut dyn AnimationManager) -> UpdateDiff {
        let Some(layout) = self.computed.take() else {
            return UpdateDiff::default();
        };
        let ticks = &layout.result.tick_data.ticks;
        let next_ids: Vec<&str> = ticks.iter().map(|t| t.id.as_str()).collect();
        let previous_ids: Vec<&str> = self.previous_ticks.iter().map(|t| t.id.as_str()).collect();
        let diff = UpdateDiff::between(&previous_ids, &next_ids);

        let key = |t: &TickRecord| t.id.clone();
        let side = layout.frame.side;

        let tick = &self.spec.tick;
        self.tick_nodes
            .update(ticks, |t| TickNode::new(t.id.clone()), key);
        self.tick_nodes.each(|node, t, _| {
            node.offset = t.offset;
            node.x0 = 0.0;
            node.x1 = side * tick.size;
            node.stroke = tick.stroke.clone();
            node.visible = tick.enabled;
        });

        match &self.spec.grid {
            Some(grid) => {
                self.grid_nodes
                    .update(ticks, |t| GridNode::new(t.id.clone()), key);
                self.grid_nodes.each(|node, t, _| {
                    node.offset = t.offset;
                    node.x0 = 0.0;
                    node.x1 = -side * layout.grid_length;
                    node.stroke = grid.stroke.clone();
                });
            }
            None => self
                .grid_nodes
                .update(&[], |t| GridNode::new(t.id.clone()), key),
        }

        let label = &self.spec.label;
        let result = &layout.result;
        self.label_nodes
            .update(ticks, |t| LabelNode::new(t.id.clone()), key);
        self.label_nodes.each(|node, t, _| {
            node.text.clone_from(&t.label);
            node.point = Point::new(layout.label_x, t.offset);
            node.rotation = result.combined_rotation();
            node.text_align = result.text_align;
            node.text_baseline = result.text_baseline;
            node.style = label.style.clone();
            node.fill = label.fill.clone();
            node.opacity = 1.0;
            node.visible = label.enabled && !t.label.is_empty();
        });

        if animation.is_skipped() {
            tracing::trace!(axis = %self.id, "animation skipped");
        } else {
            let transition = self.transition(ticks, &diff);
            animation.animate(transition);
        }

        let visible = layout.visible;
        self.records = AxisRecords {
            transform: layout.transform,
            line: self.spec.line.as_ref().map(|stroke| LineNode {
                p0: Point::new(0.0, visible.0),
                p1: Point::new(0.0, visible.1),
                stroke: stroke.clone(),
                z_index: z_order::AXIS_LINE,
            }),
            ticks: self.tick_nodes.nodes().cloned().collect(),
            grid: self.grid_nodes.nodes().cloned().collect(),
            labels: self.label_nodes.nodes().cloned().collect(),
            title: layout.title.clone(),
            group_labels: layout.groups.labels.clone(),
            separators: layout.groups.separators.clone(),
            cross_lines: match &self.scale {
                Some(scale) => self
                    .cross_lines
                    .iter()
                    .map(|c| c.node(scale, visible))
                    .collect(),
                None => Vec::new(),
            },
        };
        tracing::debug!(
            axis = %self.id,
            added = diff.added.len(),
            removed = diff.removed.len(),
            "axis update"
        );
        self.previous_ticks.clone_from(ticks);
        self.computed = Some(layout);
        diff
    }

    /// Per-tick transitions from the previous frame to `ticks`.
    fn transition(&self, ticks: &[TickRecord], diff: &UpdateDiff) -> AxisTransition {
        let previous: HashMap<&str, &TickRecord> = self
            .previous_ticks
            .iter()
            .map(|t| (t.id.as_str(), t))
            .collect();
        let shown = |translation| NodeProperties {
            translation,
            opacity: 1.0,
        };
        let hidden = |translation| NodeProperties {
            translation,
            opacity: 0.0,
        };

        let mut nodes: Vec<NodeTransition> = ticks
            .iter()
            .map(|t| match previous.get(t.id.as_str()) {
                Some(p) => NodeTransition {
                    id: t.id.clone(),
                    phase: NodePhase::Updated,
                    from: shown(p.offset),
                    to: shown(t.offset),
                },
                None => NodeTransition {
                    id: t.id.clone(),
                    phase: NodePhase::Added,
                    from: hidden(t.offset),
                    to: shown(t.offset),
                },
            })
            .collect();
        for id in &diff.removed {
            let Some(p) = previous.get(id.as_str()) else {
                continue;
            };
            // Removed ticks slide to where the new scale puts their value.
            let target = self
                .scale
                .as_ref()
                .map(|s| s.convert(p.value) + s.bandwidth() / 2.0)
                .filter(|v| v.is_finite())
                .unwrap_or(p.offset);
            nodes.push(NodeTransition {
                id: id.clone(),
                phase: NodePhase::Removed,
                from: shown(p.offset),
                to: hidden(target),
            });
        }
        AxisTransition {
            diff: diff.clone(),
            nodes,
        }
    }
}

fn grow(bounds: &mut Option<Rect>, r: Rect) {
    *bounds = Some(bounds.map_or(r, |b| b.union(r)));
}

/// The tick set of an axis with nothing to show.
fn empty_result(spec: &AxisSpec, frame: AxisFrame) -> TickGenerationResult {
    let rotation = RotationState::new(frame, spec.label.rotation);
    TickGenerationResult {
        tick_data: TickData::default(),
        primary_tick_count: None,
        text_align: rotation.text_align(frame),
        text_baseline: rotation.text_baseline(frame),
        rotation,
        iterations: 0,
        label_overlap: false,
    }
}
