// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label rotation, alignment and placement geometry.
//!
//! All geometry here lives in the axis-local frame: the axis line runs along `y` (from
//! `range.0` to `range.1`) and labels sit on the `x` side given by the axis side flag. The
//! axis group transform rotates this frame into place, so horizontal axes rotate by −90°.

use alloc::string::String;
use core::f64::consts::{FRAC_PI_2, PI, TAU};

use kurbo::{Affine, Point, Rect};

/// Horizontal text alignment relative to the label anchor, along the text direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextAlign {
    /// The text starts at the anchor.
    Start,
    /// The text is centred on the anchor.
    Center,
    /// The text ends at the anchor.
    End,
}

/// Vertical text alignment relative to the label anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// The text hangs below the anchor.
    Top,
    /// The text is centred on the anchor.
    Middle,
    /// The text sits above the anchor.
    Bottom,
}

/// Where an axis sits relative to the plot, reduced to what label geometry needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisFrame {
    /// Rotation of the axis group in radians.
    pub rotation: f64,
    /// `-1` when labels sit on the negative local `x` side, `+1` otherwise.
    pub side: f64,
    /// Whether unrotated labels read along the axis.
    pub parallel: bool,
}

impl AxisFrame {
    pub(crate) fn parallel_flip_rotation(&self) -> f64 {
        normalize_angle_360(self.rotation)
    }

    pub(crate) fn regular_flip_rotation(&self) -> f64 {
        normalize_angle_360(self.rotation - FRAC_PI_2)
    }
}

/// The rotation of tick labels and the flags it was derived from.
///
/// The rendered rotation is always `default_rotation + configured_rotation + auto_rotation`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationState {
    /// The user-configured rotation, normalised to `[0, 2π)`.
    pub configured_rotation: f64,
    /// Rotation that makes unrotated labels upright for this axis placement.
    pub default_rotation: f64,
    /// Rotation added by collision avoidance.
    pub auto_rotation: f64,
    /// `-1` or `1`; flips parallel labels so they stay upright.
    pub parallel_flip_flag: f64,
    /// `-1` or `1`; flips perpendicular labels so they stay upright.
    pub regular_flip_flag: f64,
}

impl RotationState {
    /// Derives the rotation state for `frame` with an optional rotation in degrees.
    pub fn new(frame: AxisFrame, rotation_degrees: Option<f64>) -> Self {
        let configured_rotation = match rotation_degrees {
            Some(deg) if deg != 0.0 => normalize_angle_360(deg.to_radians()),
            _ => 0.0,
        };
        let unconfigured = configured_rotation == 0.0;
        let flip = |angle: f64| {
            if unconfigured && (0.0..=PI).contains(&angle) {
                -1.0
            } else {
                1.0
            }
        };
        let parallel_flip_flag = flip(frame.parallel_flip_rotation());
        let regular_flip_flag = flip(frame.regular_flip_rotation());
        let default_rotation = if frame.parallel {
            parallel_flip_flag * FRAC_PI_2
        } else if regular_flip_flag == -1.0 {
            PI
        } else {
            0.0
        };
        Self {
            configured_rotation,
            default_rotation,
            auto_rotation: 0.0,
            parallel_flip_flag,
            regular_flip_flag,
        }
    }

    /// Returns a copy with `auto_rotation` replaced.
    pub fn with_auto_rotation(mut self, auto_rotation: f64) -> Self {
        self.auto_rotation = auto_rotation;
        self
    }

    /// The rotation before collision avoidance.
    pub fn initial(&self) -> f64 {
        self.default_rotation + self.configured_rotation
    }

    /// The rotation labels are rendered with.
    pub fn combined(&self) -> f64 {
        self.initial() + self.auto_rotation
    }

    /// Whether any user or automatic rotation applies.
    pub fn is_rotated(&self) -> bool {
        self.configured_rotation != 0.0 || self.auto_rotation != 0.0
    }

    /// Text alignment for tick labels on `frame`.
    pub fn text_align(&self, frame: AxisFrame) -> TextAlign {
        let turned = |a: f64| a > 0.0 && a <= PI;
        let align_flag = if turned(self.configured_rotation) || turned(self.auto_rotation) {
            -1.0
        } else {
            1.0
        };
        if frame.parallel {
            if !self.is_rotated() {
                TextAlign::Center
            } else if frame.side * align_flag == -1.0 {
                TextAlign::End
            } else {
                TextAlign::Start
            }
        } else if frame.side * self.regular_flip_flag == -1.0 {
            TextAlign::End
        } else {
            TextAlign::Start
        }
    }

    /// Text baseline for tick labels on `frame`.
    pub fn text_baseline(&self, frame: AxisFrame) -> TextBaseline {
        if frame.parallel && !self.is_rotated() {
            if frame.side * self.parallel_flip_flag == -1.0 {
                TextBaseline::Top
            } else {
                TextBaseline::Bottom
            }
        } else {
            TextBaseline::Middle
        }
    }
}

/// Normalises an angle in radians to `[0, 2π)`.
pub fn normalize_angle_360(angle: f64) -> f64 {
    let a = angle % TAU;
    let a = if a < 0.0 { a + TAU } else { a };
    if a >= TAU { 0.0 } else { a }
}

/// Minimum padding between labels: `min_spacing`, or a default that depends on rotation.
pub fn label_spacing(min_spacing: f64, rotated: bool) -> f64 {
    if !min_spacing.is_nan() {
        min_spacing
    } else if rotated {
        0.0
    } else {
        10.0
    }
}

/// A label positioned for overlap testing.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelPlacement {
    /// The anchor point in the axis-local frame.
    pub point: Point,
    /// Measured text width.
    pub width: f64,
    /// Measured text height.
    pub height: f64,
    /// Rotation about `point`, in radians.
    pub rotation: f64,
    /// Alignment along the text direction.
    pub text_align: TextAlign,
    /// Alignment across the text direction.
    pub text_baseline: TextBaseline,
    /// The label text.
    pub text: String,
}

impl LabelPlacement {
    /// The text rectangle before rotation.
    pub fn unrotated_rect(&self) -> Rect {
        let Point { x, y } = self.point;
        let (x0, x1) = match self.text_align {
            TextAlign::Start => (x, x + self.width),
            TextAlign::Center => (x - self.width / 2.0, x + self.width / 2.0),
            TextAlign::End => (x - self.width, x),
        };
        let (y0, y1) = match self.text_baseline {
            TextBaseline::Top => (y, y + self.height),
            TextBaseline::Middle => (y - self.height / 2.0, y + self.height / 2.0),
            TextBaseline::Bottom => (y - self.height, y),
        };
        Rect::new(x0, y0, x1, y1)
    }

    fn transform(&self) -> Affine {
        Affine::rotate_about(self.rotation, self.point)
    }

    /// Corners of the rotated text rectangle grown by `padding` on every side.
    pub fn corners(&self, padding: f64) -> [Point; 4] {
        let r = self.unrotated_rect().inflate(padding, padding);
        let t = self.transform();
        [
            t * Point::new(r.x0, r.y0),
            t * Point::new(r.x1, r.y0),
            t * Point::new(r.x1, r.y1),
            t * Point::new(r.x0, r.y1),
        ]
    }

    /// Axis-aligned bounds of the rotated text rectangle.
    pub fn bounding_box(&self) -> Rect {
        self.transform().transform_rect_bbox(self.unrotated_rect())
    }
}

/// Rotation and baseline of the axis title on `frame`.
///
/// The title reads along the axis and stays upright on screen.
pub fn title_rotation(frame: AxisFrame) -> (f64, TextBaseline) {
    let pfr = frame.parallel_flip_rotation();
    let flag = if frame.side == -1.0 && pfr > PI && pfr < TAU {
        -1.0
    } else {
        1.0
    };
    let baseline = if flag == -1.0 {
        TextBaseline::Top
    } else {
        TextBaseline::Bottom
    };
    (flag * frame.side * FRAC_PI_2, baseline)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOTTOM: AxisFrame = AxisFrame {
        rotation: -FRAC_PI_2,
        side: -1.0,
        parallel: true,
    };
    const TOP: AxisFrame = AxisFrame {
        rotation: -FRAC_PI_2,
        side: 1.0,
        parallel: true,
    };
    const LEFT: AxisFrame = AxisFrame {
        rotation: 0.0,
        side: -1.0,
        parallel: false,
    };

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn horizontal_labels_are_upright_on_screen() {
        for frame in [BOTTOM, TOP, LEFT] {
            let r = RotationState::new(frame, None);
            let screen = normalize_angle_360(frame.rotation + r.combined());
            assert!(close(screen, 0.0), "{frame:?} renders at {screen}");
        }
    }

    #[test]
    fn bottom_axis_labels_hang_below_the_line() {
        let r = RotationState::new(BOTTOM, None);
        assert_eq!(r.text_align(BOTTOM), TextAlign::Center);
        assert_eq!(r.text_baseline(BOTTOM), TextBaseline::Top);
        let r = RotationState::new(TOP, None);
        assert_eq!(r.text_baseline(TOP), TextBaseline::Bottom);
    }

    #[test]
    fn left_axis_labels_end_at_the_tick() {
        let r = RotationState::new(LEFT, None);
        assert_eq!(r.text_align(LEFT), TextAlign::End);
        assert_eq!(r.text_baseline(LEFT), TextBaseline::Middle);
    }

    #[test]
    fn rotated_bottom_labels_anchor_by_direction() {
        let r = RotationState::new(BOTTOM, Some(45.0));
        assert_eq!(r.text_align(BOTTOM), TextAlign::Start);
        let r = RotationState::new(BOTTOM, None).with_auto_rotation(335_f64.to_radians());
        assert_eq!(r.text_align(BOTTOM), TextAlign::End);
        assert_eq!(r.text_baseline(BOTTOM), TextBaseline::Middle);
    }

    #[test]
    fn angles_normalise_into_one_turn() {
        assert!(close(normalize_angle_360(-FRAC_PI_2), 3.0 * FRAC_PI_2));
        assert!(close(normalize_angle_360(TAU + 1.0), 1.0));
        assert_eq!(normalize_angle_360(0.0), 0.0);
    }

    #[test]
    fn spacing_defaults_depend_on_rotation() {
        assert_eq!(label_spacing(f64::NAN, false), 10.0);
        assert_eq!(label_spacing(f64::NAN, true), 0.0);
        assert_eq!(label_spacing(4.0, true), 4.0);
    }

    #[test]
    fn placement_rect_follows_alignment() {
        let p = LabelPlacement {
            point: Point::new(10.0, 20.0),
            width: 30.0,
            height: 10.0,
            rotation: 0.0,
            text_align: TextAlign::End,
            text_baseline: TextBaseline::Top,
            text: "x".into(),
        };
        assert_eq!(p.unrotated_rect(), Rect::new(-20.0, 20.0, 10.0, 30.0));
        let rotated = LabelPlacement {
            rotation: FRAC_PI_2,
            ..p
        };
        let b = rotated.bounding_box();
        assert!(close(b.width(), 10.0) && close(b.height(), 30.0), "got {b:?}");
    }

    #[test]
    fn titles_read_upright() {
        let (r, baseline) = title_rotation(BOTTOM);
        assert!(close(normalize_angle_360(BOTTOM.rotation + r), 0.0));
        assert_eq!(baseline, TextBaseline::Top);
        let (r, baseline) = title_rotation(LEFT);
        assert!(close(r, -FRAC_PI_2));
        assert_eq!(baseline, TextBaseline::Bottom);
    }
}
