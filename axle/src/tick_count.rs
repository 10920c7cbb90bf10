// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick-count envelope estimation from pixel spacing constraints.

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Default smallest pixel distance between adjacent ticks.
pub const DEFAULT_TICK_MIN_SPACING: f64 = 50.0;
/// The default minimum spacing never packs more than this many ticks into the range.
pub const DEFAULT_MAX_TICK_COUNT: usize = 6;
/// Preferred tick count when the envelope allows it.
pub const DEFAULT_TICK_COUNT: usize = 5;

/// Acceptable tick counts for an axis of a given length.
///
/// Always satisfies `1 <= min_tick_count <= default_tick_count <= max_tick_count`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickCountEnvelope {
    /// Fewest ticks that keep adjacent ticks within the maximum spacing.
    pub min_tick_count: usize,
    /// Most ticks that keep adjacent ticks at least the minimum spacing apart.
    pub max_tick_count: usize,
    /// The count to try first.
    pub default_tick_count: usize,
}

impl TickCountEnvelope {
    /// The envelope of a degenerate (zero-length) axis.
    pub const SINGLE: Self = Self {
        min_tick_count: 1,
        max_tick_count: 1,
        default_tick_count: 1,
    };
}

/// Estimates the tick-count envelope for an axis.
///
/// `min_spacing` and `max_spacing` are pixel constraints where `NaN` means unspecified.
/// `min_rect_distance` is the smallest distance between adjacent data items, when the chart
/// knows it; it only caps the maximum count when an explicit `max_spacing` is given.
pub fn estimate_tick_count(
    range_length: f64,
    min_spacing: f64,
    max_spacing: f64,
    min_rect_distance: Option<f64>,
) -> TickCountEnvelope {
    if !range_length.is_finite() || range_length <= 0.0 {
        return TickCountEnvelope::SINGLE;
    }

    let default_min_spacing =
        DEFAULT_TICK_MIN_SPACING.max(range_length / DEFAULT_MAX_TICK_COUNT as f64);
    let explicit_min = !min_spacing.is_nan();
    let explicit_max = !max_spacing.is_nan();
    let mut min_spacing = if explicit_min {
        min_spacing
    } else {
        default_min_spacing
    };
    let mut max_spacing = if explicit_max {
        max_spacing
    } else {
        range_length
    };

    // Explicit constraints win over defaults.
    if min_spacing > max_spacing {
        if explicit_min {
            max_spacing = min_spacing;
        } else {
            min_spacing = max_spacing;
        }
    }

    let upper_bound = match min_rect_distance {
        Some(d) if explicit_max && d > 0.0 && d < default_min_spacing => {
            count_floor(range_length / d).max(1)
        }
        _ => usize::MAX,
    };

    // At least one pixel per tick.
    let per_pixel = count_floor(range_length).max(1);
    let max_tick_count = if min_spacing > 0.0 {
        count_floor(range_length / min_spacing)
    } else {
        per_pixel
    }
    .min(per_pixel)
    .clamp(1, upper_bound);
    let min_tick_count = if max_spacing > 0.0 {
        count_ceil(range_length / max_spacing)
    } else {
        max_tick_count
    }
    .clamp(1, max_tick_count);
    let default_tick_count = DEFAULT_TICK_COUNT.clamp(min_tick_count, max_tick_count);

    TickCountEnvelope {
        min_tick_count,
        max_tick_count,
        default_tick_count,
    }
}

/// `floor`, tolerant of ratios that land a hair below an integer.
fn count_floor(ratio: f64) -> usize {
    to_count((ratio + 1e-9).floor())
}

fn count_ceil(ratio: f64) -> usize {
    to_count((ratio - 1e-9).ceil())
}

fn to_count(v: f64) -> usize {
    if v.is_nan() || v <= 0.0 {
        return 0;
    }
    let v = v.min(u32::MAX as f64);
    #[allow(clippy::cast_possible_truncation, reason = "clamped to [0, u32::MAX]")]
    {
        v as usize
    }
}
