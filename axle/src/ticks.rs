// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick records: raw tick values positioned, labelled and identified.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use hashbrown::HashMap;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::format::{LabelDomain, LabelFormatterFn, ResolvedFormat, TickLabeler, fraction_digits};
use crate::scale::AxisScale;

/// Ticks this far outside the axis range (in pixels) are still kept.
pub const RANGE_TOLERANCE: f64 = 0.001;

/// One positioned tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickRecord {
    /// The raw tick value (a category index on category axes).
    pub value: f64,
    /// The label text; may contain `\n` after wrapping.
    pub label: String,
    /// Stable identity derived from the formatted label.
    pub id: String,
    /// Position along the axis, in the axis-local frame.
    pub offset: f64,
}

/// The tick set produced by one tick-generation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickData {
    /// Every raw tick value the generation strategy produced.
    pub raw_ticks: Vec<f64>,
    /// The raw ticks that land inside the visible range, positioned and labelled.
    pub ticks: Vec<TickRecord>,
    /// Number of ticks with non-empty label text.
    pub label_count: usize,
    /// Fraction digits used by default numeric labels.
    pub fraction_digits: usize,
}

impl TickData {
    /// Recounts labels after label text changed.
    pub(crate) fn recount_labels(&mut self) {
        self.label_count = self.ticks.iter().filter(|t| !t.label.is_empty()).count();
    }
}

/// Derives tick ids from label text, suffixing repeats with `_1`, `_2`, ….
#[derive(Debug, Default)]
pub(crate) struct TickIdGenerator {
    seen: HashMap<String, usize>,
}

impl TickIdGenerator {
    pub(crate) fn id_for(&mut self, label: &str) -> String {
        let count = self.seen.entry(String::from(label)).or_insert(0);
        let id = if *count == 0 {
            String::from(label)
        } else {
            alloc::format!("{label}_{count}")
        };
        *count += 1;
        id
    }
}

/// Keeps every Nth tick of `raw`.
///
/// With explicit spacing constraints N is `ceil(len / tick_count)`; otherwise the ticks are
/// simply halved.
pub(crate) fn filter_ticks(raw: &[f64], tick_count: usize, explicit_spacing: bool) -> Vec<f64> {
    let keep_every = if explicit_spacing {
        raw.len().div_ceil(tick_count.max(1))
    } else {
        2
    };
    raw.iter().step_by(keep_every.max(1)).copied().collect()
}

/// Smallest distance between adjacent raw ticks, or `0` with fewer than two ticks.
pub(crate) fn tick_step(raw: &[f64]) -> f64 {
    raw.windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .filter(|d| *d > 0.0 && d.is_finite())
        .min_by(f64::total_cmp)
        .unwrap_or(0.0)
}

/// Everything needed to turn raw tick values into tick records.
pub(crate) struct TickSource<'a> {
    pub(crate) scale: &'a AxisScale,
    /// Ordered `(min, max)` of the visible axis range.
    pub(crate) visible: (f64, f64),
    pub(crate) label_domain: LabelDomain<'a>,
    pub(crate) format: &'a ResolvedFormat,
    pub(crate) formatter: Option<&'a LabelFormatterFn>,
}

impl TickSource<'_> {
    fn offset(&self, value: f64) -> f64 {
        self.scale.convert(value) + self.scale.bandwidth() / 2.0
    }

    /// The slice of `raw` whose positions may fall inside the visible range.
    ///
    /// Positions are monotone in raw order, so the window is found by binary search.
    fn visible_window(&self, raw: &[f64]) -> Range<usize> {
        let (lo, hi) = (
            self.visible.0 - RANGE_TOLERANCE,
            self.visible.1 + RANGE_TOLERANCE,
        );
        let (Some(&first), Some(&last)) = (raw.first(), raw.last()) else {
            return 0..0;
        };
        let increasing = !(self.offset(first) > self.offset(last));
        let (start, end) = if increasing {
            (
                raw.partition_point(|v| self.offset(*v) < lo),
                raw.partition_point(|v| !(self.offset(*v) > hi)),
            )
        } else {
            (
                raw.partition_point(|v| self.offset(*v) > hi),
                raw.partition_point(|v| !(self.offset(*v) < lo)),
            )
        };
        start..end.max(start)
    }

    /// Positions, labels and identifies the visible part of `raw_ticks`.
    pub(crate) fn materialize(&self, raw_ticks: Vec<f64>) -> TickData {
        let digits = match self.label_domain {
            LabelDomain::Number => fraction_digits(&raw_ticks),
            _ => 0,
        };
        let labeler = TickLabeler {
            domain: self.label_domain,
            format: self.format,
            user: self.formatter,
            step: tick_step(&raw_ticks),
            fraction_digits: digits,
        };
        let (lo, hi) = (
            self.visible.0 - RANGE_TOLERANCE,
            self.visible.1 + RANGE_TOLERANCE,
        );

        let mut ids = TickIdGenerator::default();
        let mut ticks = Vec::new();
        for &value in &raw_ticks[self.visible_window(&raw_ticks)] {
            let offset = self.offset(value);
            if offset.is_nan() || offset < lo || offset > hi {
                continue;
            }
            let label = labeler.label(value);
            let id = ids.id_for(&label);
            ticks.push(TickRecord {
                value,
                label,
                id,
                offset,
            });
        }

        let mut data = TickData {
            raw_ticks,
            ticks,
            label_count: 0,
            fraction_digits: digits,
        };
        data.recount_labels();
        data
    }
}

/// Rounds `v` to a whole number of pixels for wrap limits.
pub(crate) fn round_px(v: f64) -> f64 {
    v.round()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::scale::{ScaleBand, ScaleLinear};
    use alloc::string::ToString;

    fn linear(domain: (f64, f64), range: (f64, f64)) -> AxisScale {
        AxisScale::Linear(ScaleLinear::new(domain, range))
    }

    #[test]
    fn repeated_labels_get_suffixed_ids() {
        let mut ids = TickIdGenerator::default();
        assert_eq!(ids.id_for("a"), "a");
        assert_eq!(ids.id_for("b"), "b");
        assert_eq!(ids.id_for("a"), "a_1");
        assert_eq!(ids.id_for("a"), "a_2");
    }

    #[test]
    fn filter_halves_without_explicit_spacing() {
        let raw = [0.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(filter_ticks(&raw, 4, false), std::vec![0.0, 2.0, 4.0]);
        assert_eq!(filter_ticks(&raw, 2, true), std::vec![0.0, 3.0]);
    }

    #[test]
    fn ticks_outside_the_range_are_skipped() {
        let scale = linear((0.0, 100.0), (0.0, 500.0));
        let format = ResolvedFormat::Default;
        let source = TickSource {
            scale: &scale,
            visible: (0.0, 500.0),
            label_domain: LabelDomain::Number,
            format: &format,
            formatter: None,
        };
        let data = source.materialize(std::vec![-10.0, 0.0, 50.0, 100.0, 100.0001, f64::NAN]);
        let values: std::vec::Vec<f64> = data.ticks.iter().map(|t| t.value).collect();
        assert_eq!(values, std::vec![0.0, 50.0, 100.0]);
        assert_eq!(data.raw_ticks.len(), 6);
        assert_eq!(data.label_count, 3);
    }

    #[test]
    fn window_limits_materialised_ticks_on_zoom() {
        // Domain stretched to twice the visible length: only the first half is visible.
        let scale = linear((0.0, 100.0), (0.0, 1000.0));
        let format = ResolvedFormat::Default;
        let source = TickSource {
            scale: &scale,
            visible: (0.0, 500.0),
            label_domain: LabelDomain::Number,
            format: &format,
            formatter: None,
        };
        let raw: std::vec::Vec<f64> = (0..=10).map(|i| f64::from(i) * 10.0).collect();
        let data = source.materialize(raw);
        let labels: std::vec::Vec<&str> = data.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["0", "10", "20", "30", "40", "50"]);
    }

    #[test]
    fn reversed_range_keeps_domain_order() {
        let scale = linear((0.0, 100.0), (500.0, 0.0));
        let format = ResolvedFormat::Default;
        let source = TickSource {
            scale: &scale,
            visible: (0.0, 500.0),
            label_domain: LabelDomain::Number,
            format: &format,
            formatter: None,
        };
        let data = source.materialize(std::vec![0.0, 50.0, 100.0]);
        let offsets: std::vec::Vec<f64> = data.ticks.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, std::vec![500.0, 250.0, 0.0]);
    }

    #[test]
    fn band_ticks_sit_at_band_centres() {
        let scale = AxisScale::Band(ScaleBand::new((0.0, 100.0), 4).with_padding(0.0, 0.0));
        let categories = ["a", "b", "a", "c"].map(|s| s.to_string());
        let format = ResolvedFormat::Default;
        let source = TickSource {
            scale: &scale,
            visible: (0.0, 100.0),
            label_domain: LabelDomain::Category(&categories),
            format: &format,
            formatter: None,
        };
        let data = source.materialize(scale.ticks(crate::scale::TickRequest::new(4)));
        let offsets: std::vec::Vec<f64> = data.ticks.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, std::vec![12.5, 37.5, 62.5, 87.5]);
        let ids: std::vec::Vec<&str> = data.ticks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "a_1", "c"]);
    }

    #[test]
    fn tick_step_is_smallest_gap() {
        assert_eq!(tick_step(&[0.0, 2.0, 3.0, 7.0]), 1.0);
        assert_eq!(tick_step(&[1.0]), 0.0);
    }
}
