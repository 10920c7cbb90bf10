// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Group labels and separators for grouped category axes.
//!
//! Leaf categories are ordinary band ticks. The label tree is resized so its leaves land on
//! the band centres, and every group above them gets one label row at its node's `screen_x`,
//! stacked outwards from the tick labels. Separators run from the axis line to the outer edge
//! of the outermost row at which two sibling groups meet.

use alloc::vec::Vec;

use axle_text::{TextMeasurer, TextStyle};
use hashbrown::HashSet;
use kurbo::{Point, Rect};
use peniko::Brush;

use crate::config::StrokeStyle;
use crate::label::{AxisFrame, LabelPlacement, TextAlign, TextBaseline, normalize_angle_360};
use crate::records::{GroupLabelNode, SeparatorNode};
use crate::scale::AxisScale;
use crate::ticks::RANGE_TOLERANCE;
use crate::tree::{LabelTree, ROOT};
use crate::z_order;

/// Styling shared by every group row.
pub(crate) struct GroupStyle<'a> {
    pub(crate) text: &'a TextStyle,
    pub(crate) fill: &'a Brush,
    pub(crate) padding: f64,
    pub(crate) stroke: &'a StrokeStyle,
}

/// Group records in the axis-local frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct GroupLayout {
    pub(crate) labels: Vec<GroupLabelNode>,
    pub(crate) separators: Vec<SeparatorNode>,
    pub(crate) bounds: Option<Rect>,
}

fn grow(bounds: &mut Option<Rect>, r: Rect) {
    *bounds = Some(bounds.map_or(r, |b| b.union(r)));
}

/// The leftmost (or rightmost) leaf under `id`.
fn edge_leaf(tree: &LabelTree, mut id: usize, rightmost: bool) -> usize {
    loop {
        let children = &tree.node(id).children;
        let next = if rightmost {
            children.last()
        } else {
            children.first()
        };
        match next {
            Some(&child) => id = child,
            None => return id,
        }
    }
}

/// Maps the tree onto the band centres of `scale`.
///
/// The first leaf lands on the centre of band 0 and the last on the centre of the last band.
/// A reversed range flips the tree.
fn fit_tree(tree: &mut LabelTree, scale: &AxisScale) {
    let count = tree.leaves().len();
    let centre = |index: usize| scale.convert(index as f64) + scale.bandwidth() / 2.0;
    let (first, last) = (centre(0), centre(count.saturating_sub(1)));
    let levels = tree.depth() as f64;
    tree.resize((last - first).abs(), levels, first.min(last), 0.0, first > last);
}

/// Lays out the groups of `tree` over the leaf bands of `scale`.
///
/// `inner_edge` is the distance from the axis line to the outer edge of the tick labels.
pub(crate) fn layout_groups(
    tree: &mut LabelTree,
    scale: &AxisScale,
    visible: (f64, f64),
    frame: AxisFrame,
    inner_edge: f64,
    style: GroupStyle<'_>,
    measurer: &dyn TextMeasurer,
) -> GroupLayout {
    let leaf_depth = tree.depth();
    if leaf_depth < 2 {
        return GroupLayout::default();
    }
    fit_tree(tree, scale);
    let tree = &*tree;
    let shown = |y: f64| {
        y.is_finite() && y >= visible.0 - RANGE_TOLERANCE && y <= visible.1 + RANGE_TOLERANCE
    };
    let rotation = normalize_angle_360(-frame.rotation);

    // Groups per level in tree order; level 1 sits right above the leaves.
    let levels: Vec<Vec<usize>> = (1..leaf_depth)
        .map(|level| {
            let depth = leaf_depth - level;
            let mut nodes: Vec<usize> = (0..tree.nodes().len())
                .filter(|&id| id != ROOT && tree.node(id).depth == depth)
                .collect();
            nodes.sort_by(|a, b| tree.node(*a).x.total_cmp(&tree.node(*b).x));
            nodes
        })
        .collect();

    let mut layout = GroupLayout::default();
    let mut edge = inner_edge;
    let mut outer_edges = Vec::with_capacity(levels.len());
    for (i, nodes) in levels.iter().enumerate() {
        let sizes: Vec<_> = nodes
            .iter()
            .map(|&id| measurer.measure_lines(&tree.node(id).label, style.text))
            .collect();
        let extent = nodes
            .iter()
            .zip(&sizes)
            .filter(|(id, _)| !tree.node(**id).label.is_empty())
            .map(|(_, size)| if frame.parallel { size.height } else { size.width })
            .fold(0.0, f64::max);
        let distance = edge + style.padding + extent / 2.0;
        edge += style.padding + extent;
        outer_edges.push(edge);

        for (&id, size) in nodes.iter().zip(&sizes) {
            let node = tree.node(id);
            if node.label.is_empty() || !shown(node.screen_x) {
                continue;
            }
            let point = Point::new(frame.side * distance, node.screen_x);
            let placement = LabelPlacement {
                point,
                width: size.width,
                height: size.height,
                rotation,
                text_align: TextAlign::Center,
                text_baseline: TextBaseline::Middle,
                text: node.label.clone(),
            };
            grow(&mut layout.bounds, placement.bounding_box());
            layout.labels.push(GroupLabelNode {
                text: node.label.clone(),
                level: i + 1,
                point,
                rotation,
                style: style.text.clone(),
                fill: style.fill.clone(),
                z_index: z_order::AXIS_LABELS,
            });
        }
    }

    let mut seen = HashSet::new();
    for (nodes, &outer) in levels.iter().zip(&outer_edges).rev() {
        for pair in nodes.windows(2) {
            let left = edge_leaf(tree, pair[0], true);
            let right = edge_leaf(tree, pair[1], false);
            if !seen.insert(right) {
                continue;
            }
            let y = (tree.node(left).screen_x + tree.node(right).screen_x) / 2.0;
            if !shown(y) {
                continue;
            }
            let (p0, p1) = (Point::new(0.0, y), Point::new(frame.side * outer, y));
            grow(&mut layout.bounds, Rect::from_points(p0, p1));
            layout.separators.push(SeparatorNode {
                p0,
                p1,
                stroke: style.stroke.clone(),
                z_index: z_order::AXIS_TICKS,
            });
        }
    }
    layout
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::scale::ScaleBand;
    use axle_text::HeuristicTextMeasurer;
    use core::f64::consts::FRAC_PI_2;
    use peniko::color::palette::css;

    const BOTTOM: AxisFrame = AxisFrame {
        rotation: -FRAC_PI_2,
        side: -1.0,
        parallel: true,
    };

    fn layout(paths: &[&[&str]], frame: AxisFrame) -> GroupLayout {
        let mut tree = LabelTree::from_paths(paths);
        let count = tree.leaves().len();
        let length = 100.0 * count as f64;
        let scale = AxisScale::Band(ScaleBand::new((0.0, length), count).with_padding(0.0, 0.0));
        let text = TextStyle::new(12.0);
        let fill = Brush::Solid(css::BLACK);
        let stroke = StrokeStyle::default();
        layout_groups(
            &mut tree,
            &scale,
            (0.0, length),
            frame,
            20.0,
            GroupStyle {
                text: &text,
                fill: &fill,
                padding: 5.0,
                stroke: &stroke,
            },
            &HeuristicTextMeasurer,
        )
    }

    #[test]
    fn groups_centre_over_their_leaves() {
        let groups = layout(&[&["A", "1"], &["A", "2"], &["B", "1"]], BOTTOM);
        let placed: Vec<_> = groups
            .labels
            .iter()
            .map(|l| (l.text.as_str(), l.point.y, l.level))
            .collect();
        assert_eq!(placed, [("A", 100.0, 1), ("B", 250.0, 1)]);
        // Below the tick labels: padding plus half the row height.
        assert_eq!(groups.labels[0].point.x, -31.0);
        assert!((groups.labels[0].rotation - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn separators_split_sibling_groups_once() {
        let groups = layout(
            &[
                &["X", "A", "1"],
                &["X", "A", "2"],
                &["X", "B", "1"],
                &["Y", "C", "1"],
            ],
            BOTTOM,
        );
        let seps: Vec<_> = groups.separators.iter().map(|s| (s.p0.y, s.p1.x)).collect();
        // X|Y spans both rows; A|B only the inner one.
        assert_eq!(seps, [(300.0, -54.0), (200.0, -37.0)]);
        let levels: Vec<_> = groups.labels.iter().map(|l| (l.text.as_str(), l.level)).collect();
        assert_eq!(levels, [("A", 1), ("B", 1), ("C", 1), ("X", 2), ("Y", 2)]);
        let bounds = groups.bounds.unwrap();
        assert_eq!(bounds.x0, -54.0);
        assert_eq!(bounds.x1, 0.0);
    }

    #[test]
    fn flat_trees_have_no_groups() {
        let groups = layout(&[&["a"], &["b"]], BOTTOM);
        assert_eq!(groups, GroupLayout::default());
    }

    #[test]
    fn vertical_axes_stack_rows_by_text_width() {
        let left = AxisFrame {
            rotation: 0.0,
            side: -1.0,
            parallel: false,
        };
        let groups = layout(&[&["North", "a"], &["South", "b"]], left);
        // "North" is 5 * 0.6 * 12 = 36 wide.
        assert!((groups.labels[0].point.x + 43.0).abs() < 1e-9, "{:?}", groups.labels[0]);
        assert_eq!(groups.labels[0].rotation, 0.0);
    }
}
