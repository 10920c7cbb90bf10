// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label collision detection.
//!
//! Each label is a (possibly rotated) rectangle grown by half the minimum spacing on every
//! side, so two labels collide when they are closer than the spacing. A sweep over the
//! rotated bounding boxes finds candidate pairs; a separating-axis test on the rotated
//! rectangles decides.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};

use crate::label::LabelPlacement;

const EPSILON: f64 = 1e-9;

/// Returns `true` when any two non-empty labels are closer than `min_spacing`.
pub fn labels_overlap(placements: &[LabelPlacement], min_spacing: f64) -> bool {
    let padding = min_spacing.max(0.0) / 2.0;
    let mut shapes: Vec<([Point; 4], Rect)> = placements
        .iter()
        .filter(|p| !p.text.is_empty())
        .map(|p| {
            let corners = p.corners(padding);
            (corners, bounds(&corners))
        })
        .collect();
    shapes.sort_by(|a, b| a.1.y0.total_cmp(&b.1.y0));

    for (i, (corners_a, box_a)) in shapes.iter().enumerate() {
        for (corners_b, box_b) in &shapes[i + 1..] {
            if box_b.y0 >= box_a.y1 - EPSILON {
                break;
            }
            if intervals_overlap(box_a.x0, box_a.x1, box_b.x0, box_b.x1)
                && quads_overlap(corners_a, corners_b)
            {
                return true;
            }
        }
    }
    false
}

fn bounds(corners: &[Point; 4]) -> Rect {
    corners
        .iter()
        .skip(1)
        .fold(Rect::from_points(corners[0], corners[0]), |r, p| {
            r.union_pt(*p)
        })
}

fn intervals_overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> bool {
    a0 < b1 - EPSILON && b0 < a1 - EPSILON
}

/// Separating-axis test for two convex quadrilaterals.
fn quads_overlap(a: &[Point; 4], b: &[Point; 4]) -> bool {
    let edge_normals = |q: &[Point; 4]| {
        [q[1] - q[0], q[2] - q[1]].map(|e| Vec2::new(-e.y, e.x))
    };
    edge_normals(a)
        .into_iter()
        .chain(edge_normals(b))
        .filter(|n| n.hypot2() > 0.0)
        .all(|axis| {
            let (a0, a1) = project(a, axis);
            let (b0, b1) = project(b, axis);
            let scale = axis.hypot();
            intervals_overlap(a0 / scale, a1 / scale, b0 / scale, b1 / scale)
        })
}

fn project(q: &[Point; 4], axis: Vec2) -> (f64, f64) {
    q.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        let d = p.to_vec2().dot(axis);
        (lo.min(d), hi.max(d))
    })
}
