// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for tick-count estimation, the tick pipeline and tree layout.

use axle::{
    Axis, AxisKind, AxisOrient, AxisSpec, LabelTree, MAX_PIPELINE_ITERATIONS,
    estimate_tick_count,
};
use axle_text::HeuristicTextMeasurer;
use kurbo::Rect;
use proptest::prelude::*;

fn spacing() -> impl Strategy<Value = f64> {
    prop_oneof![Just(f64::NAN), 1.0..400.0_f64]
}

fn category_axis(labels: &[String], width: f64, auto_rotate: bool) -> Axis {
    let mut axis = Axis::new("c", AxisOrient::Bottom, AxisKind::Category { padding: 0.1 });
    axis.set_plot(Rect::new(0.0, 0.0, width, 200.0));
    axis.set_categories(labels.iter().cloned());
    let spec = if auto_rotate {
        AxisSpec::default().with_auto_rotate(335.0)
    } else {
        AxisSpec::default()
    };
    axis.set_spec(spec).unwrap();
    axis
}

proptest! {
    #[test]
    fn envelope_is_ordered(
        range_length in 0.5..10_000.0_f64,
        min_spacing in spacing(),
        max_spacing in spacing(),
        min_rect in proptest::option::of(0.5..200.0_f64),
    ) {
        let e = estimate_tick_count(range_length, min_spacing, max_spacing, min_rect);
        prop_assert!(1 <= e.min_tick_count, "{e:?}");
        prop_assert!(e.min_tick_count <= e.default_tick_count, "{e:?}");
        prop_assert!(e.default_tick_count <= e.max_tick_count, "{e:?}");
    }

    #[test]
    fn category_pipeline_terminates_and_is_idempotent(
        labels in proptest::collection::vec("[a-z]{1,18}( [a-z]{1,8})?", 1..60),
        width in 40.0..900.0_f64,
        auto_rotate in any::<bool>(),
    ) {
        let mut axis = category_axis(&labels, width, auto_rotate);
        axis.calculate_layout(&HeuristicTextMeasurer, None).unwrap();
        let first = axis.tick_generation_result().unwrap().clone();
        prop_assert!(first.iterations <= MAX_PIPELINE_ITERATIONS + 1, "{first:?}");

        axis.calculate_layout(&HeuristicTextMeasurer, None).unwrap();
        let second = axis.tick_generation_result().unwrap();
        prop_assert_eq!(&first, second);
    }

    #[test]
    fn numeric_pipeline_stays_in_range(
        d0 in -1.0e6..1.0e6_f64,
        span in 1.0e-3..1.0e6_f64,
        width in 20.0..2000.0_f64,
    ) {
        let mut axis = Axis::new("n", AxisOrient::Bottom, AxisKind::Number { nice: true });
        axis.set_plot(Rect::new(0.0, 0.0, width, 100.0));
        axis.set_domain(d0, d0 + span);
        axis.calculate_layout(&HeuristicTextMeasurer, None).unwrap();
        let result = axis.tick_generation_result().unwrap();
        prop_assert!(result.iterations <= MAX_PIPELINE_ITERATIONS + 1);
        for t in &result.tick_data.ticks {
            prop_assert!(t.offset >= -1e-3 && t.offset <= width + 1e-3, "{t:?}");
        }
    }

    #[test]
    fn tree_layout_invariants(
        paths in proptest::collection::vec(
            proptest::collection::vec("[abc]", 1..4),
            1..25,
        ),
    ) {
        let tree = LabelTree::from_paths(&paths);
        prop_assert_eq!(tree.root().leaf_count, paths.len());
        let leaves = tree.leaves();
        for (i, &leaf) in leaves.iter().enumerate() {
            prop_assert!((tree.node(leaf).x - i as f64).abs() < 1e-9, "leaf {i}");
        }
        for node in tree.nodes() {
            // Groups with the same label under one parent are merged, wherever they appear.
            let groups: Vec<&str> = node
                .children
                .iter()
                .map(|&c| tree.node(c))
                .filter(|c| !c.is_leaf())
                .map(|c| c.label.as_str())
                .collect();
            for (i, label) in groups.iter().enumerate() {
                prop_assert!(!groups[..i].contains(label), "{label:?} repeated in {groups:?}");
            }
            for pair in node.children.windows(2) {
                let (left, right) = (tree.node(pair[0]), tree.node(pair[1]));
                if left.is_leaf() && right.is_leaf() {
                    prop_assert!((right.x - left.x - 1.0).abs() < 1e-9, "{left:?} {right:?}");
                }
                // Sibling subtrees never overlap.
                prop_assert!(left.subtree_right < right.subtree_left, "{left:?} {right:?}");
            }
            if !node.is_leaf() {
                prop_assert!(
                    node.subtree_left <= node.x && node.x <= node.subtree_right,
                    "{node:?}"
                );
            }
        }
    }
}
