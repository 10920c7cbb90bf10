// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales consumed by the axis engine.
//!
//! A scale maps domain values to a 1-D screen range. Continuous scales (linear, log, time)
//! map `f64` values; the band scale maps category indices, so every raw tick value is an
//! `f64` regardless of the scale kind.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::error::AxisError;
use crate::time;

/// Upper bound on the number of ticks any scale will produce.
const MAX_TICKS: f64 = 10_000.0;
/// How many times a continuous scale re-steps to land inside the requested envelope.
const MAX_ENVELOPE_RETRIES: usize = 10;

/// A tick-count hint with an optional acceptable envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickRequest {
    /// The preferred number of ticks.
    pub tick_count: usize,
    /// The smallest acceptable number of ticks.
    pub min_tick_count: usize,
    /// The largest acceptable number of ticks.
    pub max_tick_count: usize,
}

impl TickRequest {
    /// A request for roughly `tick_count` ticks with no envelope.
    pub fn new(tick_count: usize) -> Self {
        Self {
            tick_count,
            min_tick_count: 0,
            max_tick_count: usize::MAX,
        }
    }

    /// Sets the acceptable `[min, max]` tick count envelope.
    pub fn with_envelope(mut self, min_tick_count: usize, max_tick_count: usize) -> Self {
        self.min_tick_count = min_tick_count;
        self.max_tick_count = max_tick_count;
        self
    }
}

/// The closed set of scales an axis can own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AxisScale {
    /// Linear scale.
    Linear(ScaleLinear),
    /// Log scale.
    Log(ScaleLog),
    /// Time scale (seconds).
    Time(ScaleTime),
    /// Band scale over category indices.
    Band(ScaleBand),
}

impl AxisScale {
    /// Whether this scale maps a continuous domain.
    pub fn is_continuous(&self) -> bool {
        !matches!(self, Self::Band(_))
    }

    /// A short name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Linear(_) => "linear",
            Self::Log(_) => "log",
            Self::Time(_) => "time",
            Self::Band(_) => "band",
        }
    }

    /// Maps a domain value (or category index) to a range position.
    pub fn convert(&self, value: f64) -> f64 {
        match self {
            Self::Linear(s) => s.convert(value),
            Self::Log(s) => s.convert(value),
            Self::Time(s) => s.convert(value),
            Self::Band(s) => s.convert(value),
        }
    }

    /// Maps a range position back to a domain value (or category index).
    pub fn invert(&self, position: f64) -> Option<f64> {
        match self {
            Self::Linear(s) => s.invert(position),
            Self::Log(s) => s.invert(position),
            Self::Time(s) => s.invert(position),
            Self::Band(s) => s.invert(position),
        }
    }

    /// Returns candidate tick values for the request.
    pub fn ticks(&self, request: TickRequest) -> Vec<f64> {
        match self {
            Self::Linear(s) => s.ticks(request),
            Self::Log(s) => s.ticks(request),
            Self::Time(s) => s.ticks(request),
            Self::Band(s) => s.ticks(),
        }
    }

    /// Returns ticks spaced by an explicit `interval`.
    ///
    /// Continuous scales use multiples of `interval` inside the domain. Log scales step the
    /// exponent by `interval`. Band scales keep every `interval`-th category.
    pub fn interval_ticks(&self, interval: f64) -> Vec<f64> {
        match self {
            Self::Linear(s) => multiples_within(s.domain, interval),
            Self::Time(s) => multiples_within(s.inner.domain, interval),
            Self::Log(s) => s.interval_ticks(interval),
            Self::Band(s) => {
                let every = interval.round().max(1.0);
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "rounded and at least 1; saturating cast is fine for a stride"
                )]
                let every = every as usize;
                (0..s.count).step_by(every).map(|i| i as f64).collect()
            }
        }
    }

    /// Returns ticks aligned to a primary axis that drew `primary_tick_count` ticks.
    ///
    /// Only linear scales support this. On success the scale domain becomes the first and
    /// last returned tick.
    pub fn secondary_ticks(&mut self, primary_tick_count: usize) -> Result<Vec<f64>, AxisError> {
        let scale = self.kind_name();
        match self {
            Self::Linear(s) => Ok(s.secondary_ticks(primary_tick_count)),
            Self::Log(_) | Self::Time(_) | Self::Band(_) => {
                Err(AxisError::UnsupportedSecondaryAxis { scale })
            }
        }
    }

    /// Width of one band, or `0` for continuous scales.
    pub fn bandwidth(&self) -> f64 {
        match self {
            Self::Band(s) => s.band_width(),
            _ => 0.0,
        }
    }

    /// The scale's output range.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.range,
            Self::Log(s) => s.range,
            Self::Time(s) => s.inner.range,
            Self::Band(s) => s.range,
        }
    }

    /// Replaces the scale's output range.
    pub fn set_range(&mut self, range: (f64, f64)) {
        match self {
            Self::Linear(s) => s.range = range,
            Self::Log(s) => s.range = range,
            Self::Time(s) => s.inner.range = range,
            Self::Band(s) => s.range = range,
        }
    }

    /// The scale's domain; for band scales this is `(0, count)`.
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.domain,
            Self::Log(s) => s.domain,
            Self::Time(s) => s.inner.domain,
            Self::Band(s) => (0.0, s.count as f64),
        }
    }
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Extends the domain outward to multiples of the tick step for `tick_count` ticks.
    pub fn nice(mut self, tick_count: usize) -> Self {
        let (d0, d1) = self.domain;
        let (lo, hi) = ordered(d0, d1);
        let step = nice_step((hi - lo) / tick_count.max(1) as f64);
        if step > 0.0 {
            let lo = (lo / step).floor() * step;
            let hi = (hi / step).ceil() * step;
            self.domain = if d0 <= d1 { (lo, hi) } else { (hi, lo) };
        }
        self
    }

    /// The current domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Maps a value from domain space into range space.
    pub fn convert(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Maps a range position back into domain space.
    pub fn invert(&self, position: f64) -> Option<f64> {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return None;
        }
        Some(d0 + (position - r0) / denom * (d1 - d0))
    }

    /// Returns “nice” tick values inside the domain.
    pub fn ticks(&self, request: TickRequest) -> Vec<f64> {
        let (d0, d1) = self.domain;
        within_envelope(request, |count| linear_ticks(d0, d1, count))
    }

    fn secondary_ticks(&mut self, count: usize) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain.0, self.domain.1);
        if count < 2 || !lo.is_finite() || !hi.is_finite() {
            return alloc::vec![lo];
        }
        let span = if hi > lo { hi - lo } else { lo.abs().max(1.0) };
        let intervals = (count - 1) as f64;
        let mut step = nice_step_ceil(span / intervals);
        let mut start = (lo / step).floor() * step;
        // Raising the step is bounded: each pass moves at least one rung up the 1-2-5 ladder.
        for _ in 0..32 {
            if start + step * intervals >= hi - step * 1e-9 {
                break;
            }
            step = nice_step_ceil(step * (1.0 + 1e-6));
            start = (lo / step).floor() * step;
        }
        let ticks: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
        if let (Some(&first), Some(&last)) = (ticks.first(), ticks.last()) {
            self.domain = (first, last);
        }
        ticks
    }
}

/// A log-scale mapping from a positive domain to a range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLog {
    domain: (f64, f64),
    range: (f64, f64),
    base: f64,
}

impl ScaleLog {
    /// Creates a new log scale (base 10).
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            base: 10.0,
        }
    }

    /// Sets the log base.
    pub fn with_base(mut self, base: f64) -> Self {
        self.base = if base.is_finite() && base > 0.0 && base != 1.0 {
            base
        } else {
            10.0
        };
        self
    }

    /// The log base.
    pub fn base(&self) -> f64 {
        self.base
    }

    fn log_base(&self, x: f64) -> f64 {
        x.ln() / self.base.ln()
    }

    /// Maps a value from domain space into range space.
    ///
    /// Non-positive values map to `NaN`.
    pub fn convert(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if x <= 0.0 || d0 <= 0.0 || d1 <= 0.0 {
            return f64::NAN;
        }
        let ld0 = self.log_base(d0);
        let ld1 = self.log_base(d1);
        let denom = ld1 - ld0;
        if denom == 0.0 {
            return r0;
        }
        let t = (self.log_base(x) - ld0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Maps a range position back into domain space.
    pub fn invert(&self, position: f64) -> Option<f64> {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d0 <= 0.0 || d1 <= 0.0 || r1 == r0 {
            return None;
        }
        let ld0 = self.log_base(d0);
        let ld1 = self.log_base(d1);
        let t = (position - r0) / (r1 - r0);
        Some(self.base.powf(ld0 + t * (ld1 - ld0)))
    }

    /// Returns powers of `base` inside the domain, strided down to roughly the requested count.
    ///
    /// Domains spanning less than two powers fall back to linear ticks.
    pub fn ticks(&self, request: TickRequest) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain.0, self.domain.1);
        if lo <= 0.0 || !lo.is_finite() || !hi.is_finite() {
            return Vec::new();
        }
        let (Some(e0), Some(e1)) = (
            to_i32((self.log_base(lo) - 1e-9).ceil()),
            to_i32((self.log_base(hi) + 1e-9).floor()),
        ) else {
            return Vec::new();
        };
        if e1 < e0 {
            return within_envelope(request, |count| linear_ticks(lo, hi, count));
        }
        let powers: Vec<f64> = (e0..=e1)
            .map(|e| self.base.powi(e))
            .filter(|v| *v >= lo * (1.0 - 1e-12) && *v <= hi * (1.0 + 1e-12))
            .collect();
        if powers.len() < 2 {
            return within_envelope(request, |count| linear_ticks(lo, hi, count));
        }
        let target = request
            .tick_count
            .clamp(request.min_tick_count.max(1), request.max_tick_count.max(1));
        let stride = powers.len().div_ceil(target.max(1)).max(1);
        powers.into_iter().step_by(stride).collect()
    }

    fn interval_ticks(&self, interval: f64) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain.0, self.domain.1);
        if lo <= 0.0 {
            return Vec::new();
        }
        multiples_within((self.log_base(lo), self.log_base(hi)), interval)
            .into_iter()
            .map(|e| self.base.powf(e))
            .collect()
    }
}

/// A time scale: a linear scale over timestamps in **seconds**.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTime {
    inner: ScaleLinear,
}

impl ScaleTime {
    /// Creates a new time scale.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: ScaleLinear::new(domain, range),
        }
    }

    /// Maps a timestamp into range space.
    pub fn convert(&self, t: f64) -> f64 {
        self.inner.convert(t)
    }

    /// Maps a range position back to a timestamp.
    pub fn invert(&self, position: f64) -> Option<f64> {
        self.inner.invert(position)
    }

    /// Returns ticks on second/minute/hour/day boundaries inside the domain.
    pub fn ticks(&self, request: TickRequest) -> Vec<f64> {
        let (d0, d1) = self.inner.domain;
        within_envelope(request, |count| time::time_ticks_seconds(d0, d1, count))
    }
}

/// A discrete band scale for categorical axes.
///
/// Bands are laid out from the first range value towards the second, so a reversed range
/// places the first category at the larger coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBand {
    range: (f64, f64),
    count: usize,
    padding_inner: f64,
    padding_outer: f64,
}

impl ScaleBand {
    /// Creates a new band scale covering `count` bands over `range`.
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            range,
            count,
            padding_inner: 0.1,
            padding_outer: 0.1,
        }
    }

    /// Sets inner and outer padding in band units.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.clamp(0.0, 1.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Returns the computed band width.
    pub fn band_width(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.count as f64;
        if n <= 0.0 {
            return 0.0;
        }
        let span = (r1 - r0).abs();
        let denom = n + self.padding_inner * (n - 1.0) + 2.0 * self.padding_outer;
        if denom == 0.0 { 0.0 } else { span / denom }
    }

    /// The distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        self.band_width() * (1.0 + self.padding_inner)
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the lower-coordinate edge of the band at `index`.
    pub fn convert(&self, index: f64) -> f64 {
        let (r0, r1) = self.range;
        let n = self.count as f64;
        if index.is_nan() || index < 0.0 || index >= n {
            return f64::NAN;
        }
        let slot = if r1 >= r0 { index } else { n - 1.0 - index };
        r0.min(r1) + self.band_width() * self.padding_outer + self.step() * slot
    }

    /// Returns the index of the band whose step contains `position`.
    pub fn invert(&self, position: f64) -> Option<f64> {
        let (r0, r1) = self.range;
        let step = self.step();
        if self.count == 0 || step <= 0.0 {
            return None;
        }
        let start = r0.min(r1) + self.band_width() * self.padding_outer;
        let slot = ((position - start) / step).floor();
        let n = self.count as f64;
        if slot < 0.0 || slot >= n {
            return None;
        }
        Some(if r1 >= r0 { slot } else { n - 1.0 - slot })
    }

    /// Every category index.
    pub fn ticks(&self) -> Vec<f64> {
        (0..self.count).map(|i| i as f64).collect()
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

fn to_i32(v: f64) -> Option<i32> {
    if !v.is_finite() {
        return None;
    }
    let v = v.clamp(i32::MIN as f64, i32::MAX as f64);
    #[allow(clippy::cast_possible_truncation, reason = "clamped to the i32 range")]
    Some(v as i32)
}

/// Calls `generate` with adjusted counts until the result lies within the request envelope.
fn within_envelope(request: TickRequest, generate: impl Fn(usize) -> Vec<f64>) -> Vec<f64> {
    let mut count = request.tick_count.max(1);
    let mut ticks = generate(count);
    for _ in 0..MAX_ENVELOPE_RETRIES {
        if ticks.len() > request.max_tick_count && count > 1 {
            count -= 1;
        } else if ticks.len() < request.min_tick_count && count < request.max_tick_count {
            count += 1;
        } else {
            break;
        }
        ticks = generate(count);
    }
    ticks
}

/// Evenly stepped ticks inside `[d0, d1]`, in domain order.
pub(crate) fn linear_ticks(d0: f64, d1: f64, count: usize) -> Vec<f64> {
    if count == 0 || !d0.is_finite() || !d1.is_finite() {
        return Vec::new();
    }
    if d0 == d1 {
        return alloc::vec![d0];
    }
    let (lo, hi) = ordered(d0, d1);
    let step = nice_step((hi - lo) / count as f64);
    let mut ticks = stepped(lo, hi, step);
    if d0 > d1 {
        ticks.reverse();
    }
    ticks
}

fn multiples_within(domain: (f64, f64), interval: f64) -> Vec<f64> {
    if !(interval.is_finite() && interval > 0.0) {
        return Vec::new();
    }
    let (lo, hi) = ordered(domain.0, domain.1);
    stepped(lo, hi, interval)
}

/// Multiples of `step` inside `[lo, hi]`.
///
/// Steps below one are applied as divisions by their reciprocal to keep decimal ticks exact.
pub(crate) fn stepped(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    if !(step.is_finite() && step > 0.0) || !lo.is_finite() || !hi.is_finite() {
        return Vec::new();
    }
    let inverse = (1.0 / step).round();
    let use_inverse = step < 1.0 && inverse > 0.0 && ((1.0 / inverse) - step).abs() < step * 1e-9;
    let (i0, i1) = if use_inverse {
        ((lo * inverse).ceil(), (hi * inverse).floor())
    } else {
        ((lo / step - 1e-9).ceil(), (hi / step + 1e-9).floor())
    };
    let n = i1 - i0;
    if !(n.is_finite() && n >= 0.0) {
        return Vec::new();
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "guarded by finite/non-negative checks and capped at MAX_TICKS"
    )]
    let n = n.min(MAX_TICKS) as u64;
    (0..=n)
        .map(|k| {
            let i = i0 + k as f64;
            let v = if use_inverse { i / inverse } else { i * step };
            if v == 0.0 { 0.0 } else { v }
        })
        .collect()
}

pub(crate) fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// The smallest 1-2-5 multiple of a power of ten that is at least `step`.
fn nice_step_ceil(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 1.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .find(|n| *n >= error * (1.0 - 1e-12))
        .unwrap_or(10.0);
    nice * base
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn linear_ticks_stay_inside_domain() {
        let s = ScaleLinear::new((0.5, 99.0), (0.0, 500.0));
        let ticks = s.ticks(TickRequest::new(5));
        assert!(!ticks.is_empty());
        assert!(
            ticks.iter().all(|t| *t >= 0.5 && *t <= 99.0),
            "ticks escaped domain: {ticks:?}"
        );
    }

    #[test]
    fn linear_ticks_are_exact_decimals() {
        let ticks = linear_ticks(0.0, 1.0, 10);
        assert_eq!(ticks[3], 0.3, "got {ticks:?}");
        assert_eq!(ticks.len(), 11);
    }

    #[test]
    fn envelope_limits_tick_count() {
        let s = ScaleLinear::new((0.0, 100.0), (0.0, 500.0));
        let ticks = s.ticks(TickRequest::new(10).with_envelope(1, 4));
        assert!(ticks.len() <= 4, "got {ticks:?}");
    }

    #[test]
    fn nice_extends_domain_to_step_multiples() {
        let s = ScaleLinear::new((0.3, 9.2), (0.0, 1.0)).nice(5);
        assert_eq!(s.domain(), (0.0, 10.0));
    }

    #[test]
    fn linear_invert_round_trips_convert() {
        let s = ScaleLinear::new((10.0, 20.0), (100.0, 0.0));
        let p = s.convert(12.5);
        let v = s.invert(p).expect("non-degenerate range");
        assert!((v - 12.5).abs() < 1e-9, "got {v}");
    }

    #[test]
    fn log_scale_maps_endpoints_to_range() {
        let s = ScaleLog::new((1.0, 100.0), (0.0, 10.0));
        assert!((s.convert(1.0) - 0.0).abs() < 1e-9);
        assert!((s.convert(100.0) - 10.0).abs() < 1e-9);
        assert!(s.convert(-1.0).is_nan());
    }

    #[test]
    fn log_ticks_are_powers_of_base() {
        let s = ScaleLog::new((1.0, 1000.0), (0.0, 300.0));
        let ticks = s.ticks(TickRequest::new(10));
        assert_eq!(ticks, std::vec![1.0, 10.0, 100.0, 1000.0]);
    }

    #[test]
    fn log_ticks_stride_when_too_many_powers() {
        let s = ScaleLog::new((1.0, 1e8), (0.0, 300.0));
        let ticks = s.ticks(TickRequest::new(3));
        assert!(ticks.len() <= 3, "got {ticks:?}");
        assert_eq!(ticks[0], 1.0);
    }

    #[test]
    fn band_reversed_range_places_first_category_last() {
        let s = ScaleBand::new((100.0, 0.0), 4).with_padding(0.0, 0.0);
        assert!((s.band_width() - 25.0).abs() < 1e-9);
        assert!((s.convert(0.0) - 75.0).abs() < 1e-9);
        assert!((s.convert(3.0) - 0.0).abs() < 1e-9);
        assert_eq!(s.invert(80.0), Some(0.0));
        assert!(s.convert(4.0).is_nan());
    }

    #[test]
    fn band_interval_ticks_keep_every_nth_category() {
        let s = AxisScale::Band(ScaleBand::new((0.0, 100.0), 7));
        assert_eq!(s.interval_ticks(3.0), std::vec![0.0, 3.0, 6.0]);
    }

    #[test]
    fn secondary_ticks_match_primary_count_and_cover_domain() {
        let mut s = AxisScale::Linear(ScaleLinear::new((0.0, 37.0), (0.0, 100.0)));
        let ticks = s.secondary_ticks(6).expect("linear supports secondary ticks");
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[0], 0.0);
        assert!(*ticks.last().unwrap() >= 37.0, "got {ticks:?}");
        assert_eq!(s.domain(), (ticks[0], ticks[5]));
    }

    #[test]
    fn secondary_ticks_on_log_scale_are_an_error() {
        let mut s = AxisScale::Log(ScaleLog::new((1.0, 100.0), (0.0, 100.0)));
        assert_eq!(
            s.secondary_ticks(5),
            Err(AxisError::UnsupportedSecondaryAxis { scale: "log" })
        );
    }
}
