// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tick strategy pipeline.
//!
//! Tick generation is a bounded loop. Each pass runs an ordered list of strategies: one that
//! generates ticks, an optional extra decimation step, and an optional collision
//! mitigation (wrap or rotate). After every strategy the labels are re-checked for overlap.
//! The loop stops when labels no longer overlap, when a strategy asks it to terminate, or
//! when the iteration budget runs out. In the last case the final tick set is kept as is.

use alloc::vec::Vec;

use axle_text::TextMeasurer;
use kurbo::Point;
use smallvec::SmallVec;

use crate::config::AxisSpec;
use crate::error::AxisError;
use crate::format::{LabelDomain, ResolvedFormat};
use crate::label::{
    AxisFrame, LabelPlacement, RotationState, TextAlign, TextBaseline, label_spacing,
    normalize_angle_360,
};
use crate::overlap::labels_overlap;
use crate::scale::{AxisScale, TickRequest};
use crate::tick_count::{TickCountEnvelope, estimate_tick_count};
use crate::ticks::{TickData, TickRecord, TickSource, filter_ticks, round_px};

/// Hard cap on the number of pipeline passes, whatever the envelope says.
pub const MAX_PIPELINE_ITERATIONS: usize = 50;
/// Pass budget for discrete scales, and for explicit intervals.
const DISCRETE_MAX_ITERATIONS: usize = 10;

/// How a pass produces its raw ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TickGenerationType {
    /// Ask the scale for ticks.
    Create,
    /// Align to a primary axis's tick count.
    CreateSecondary,
    /// Thin the previous pass's ticks.
    Filter,
    /// Use the explicit tick values.
    Values,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TickStrategy {
    Generate(TickGenerationType),
    ExtraFilter,
    Rotate,
    Wrap,
}

/// The outcome of one pipeline run.
#[derive(Clone, Debug, PartialEq)]
pub struct TickGenerationResult {
    /// The final tick set.
    pub tick_data: TickData,
    /// The raw tick count a linked secondary axis should match.
    ///
    /// For a secondary axis this is the count it was given.
    pub primary_tick_count: Option<usize>,
    /// Label rotation, including any automatic rotation.
    pub rotation: RotationState,
    /// Alignment of tick labels along the text direction.
    pub text_align: TextAlign,
    /// Alignment of tick labels across the text direction.
    pub text_baseline: TextBaseline,
    /// Number of pipeline passes run.
    pub iterations: usize,
    /// Whether labels still overlap (possible when the budget ran out).
    pub label_overlap: bool,
}

impl TickGenerationResult {
    /// The rendered label rotation in the axis-local frame.
    pub fn combined_rotation(&self) -> f64 {
        self.rotation.combined()
    }
}

/// Positions the non-empty labels of `ticks` at `label_x` for overlap tests and bounds.
pub(crate) fn place_labels(
    ticks: &[TickRecord],
    label_x: f64,
    rotation: &RotationState,
    frame: AxisFrame,
    measurer: &dyn TextMeasurer,
    style: &axle_text::TextStyle,
) -> Vec<LabelPlacement> {
    let text_align = rotation.text_align(frame);
    let text_baseline = rotation.text_baseline(frame);
    ticks
        .iter()
        .filter(|t| !t.label.is_empty())
        .map(|t| {
            let size = measurer.measure_lines(&t.label, style);
            LabelPlacement {
                point: Point::new(label_x, t.offset),
                width: size.width,
                height: size.height,
                rotation: rotation.combined(),
                text_align,
                text_baseline,
                text: t.label.clone(),
            }
        })
        .collect()
}

/// Local `x` of the label anchors: past the tick marks and the label padding.
pub(crate) fn label_x(spec: &AxisSpec, frame: AxisFrame) -> f64 {
    let tick_extent = if spec.tick.enabled { spec.tick.size } else { 0.0 };
    frame.side * (tick_extent + spec.label.padding)
}

/// Mutable state threaded through the strategies of a run.
#[derive(Debug, Default)]
struct PassState {
    tick_data: TickData,
    index: usize,
    auto_rotation: f64,
    terminate: bool,
    label_overlap: bool,
}

/// Everything one pipeline run reads.
pub(crate) struct TickPipeline<'a> {
    pub(crate) scale: &'a mut AxisScale,
    pub(crate) spec: &'a AxisSpec,
    pub(crate) frame: AxisFrame,
    pub(crate) measurer: &'a dyn TextMeasurer,
    pub(crate) label_domain: LabelDomain<'a>,
    pub(crate) format: &'a ResolvedFormat,
    /// Ordered `(min, max)` of the visible range.
    pub(crate) visible: (f64, f64),
    /// Smallest distance between data items, reported by the chart after a previous pass.
    pub(crate) min_rect_distance: Option<f64>,
}

impl TickPipeline<'_> {
    fn range_length(&self) -> f64 {
        self.visible.1 - self.visible.0
    }

    fn envelope(&self) -> TickCountEnvelope {
        estimate_tick_count(
            self.range_length(),
            self.spec.tick.min_spacing,
            self.spec.tick.max_spacing,
            self.min_rect_distance,
        )
    }

    fn max_iterations(&self, envelope: TickCountEnvelope) -> usize {
        let budget = if self.scale.is_continuous() && self.spec.tick.interval.is_none() {
            envelope.max_tick_count
        } else {
            DISCRETE_MAX_ITERATIONS
        };
        budget.min(MAX_PIPELINE_ITERATIONS)
    }

    fn avoids_collisions(&self) -> bool {
        self.spec.label.enabled && self.spec.label.avoid_collisions
    }

    fn has_explicit_ticks(&self) -> bool {
        self.spec.tick.values.is_some() || self.spec.tick.interval.is_some()
    }

    /// The ordered strategies for pass `index`.
    fn strategies(&self, index: usize, secondary: bool) -> SmallVec<[TickStrategy; 3]> {
        let continuous = self.scale.is_continuous();
        let kind = if self.spec.tick.values.is_some() {
            TickGenerationType::Values
        } else if secondary {
            // Band, log and time scales reject this in `secondary_ticks`.
            TickGenerationType::CreateSecondary
        } else if !continuous && index != 0 && self.avoids_collisions() {
            TickGenerationType::Filter
        } else {
            TickGenerationType::Create
        };

        let mut strategies = SmallVec::new();
        strategies.push(TickStrategy::Generate(kind));
        if !continuous
            && self.spec.tick.has_explicit_spacing()
            && kind == TickGenerationType::Create
        {
            strategies.push(TickStrategy::ExtraFilter);
        }
        if !self.avoids_collisions() || self.spec.tick.values.is_some() {
            return strategies;
        }
        let label = &self.spec.label;
        if label.auto_wrap {
            strategies.push(TickStrategy::Wrap);
        } else if label.auto_rotate && label.rotation.is_none() {
            strategies.push(TickStrategy::Rotate);
        }
        strategies
    }

    /// Runs the pipeline.
    ///
    /// `primary_tick_count` makes this a secondary axis aligned to a primary one.
    pub(crate) fn run(
        &mut self,
        primary_tick_count: Option<usize>,
    ) -> Result<TickGenerationResult, AxisError> {
        let envelope = self.envelope();
        let max_iterations = self.max_iterations(envelope);
        let base_rotation = RotationState::new(self.frame, self.spec.label.rotation);
        let secondary = primary_tick_count.is_some();

        let mut state = PassState {
            label_overlap: true,
            ..PassState::default()
        };
        let mut iterations = 0;
        while state.label_overlap && state.index <= max_iterations && !state.terminate {
            iterations += 1;
            state.auto_rotation = 0.0;
            for strategy in self.strategies(state.index, secondary) {
                tracing::trace!(?strategy, index = state.index, "tick strategy");
                match strategy {
                    TickStrategy::Generate(kind) => {
                        self.generate(kind, &mut state, envelope, max_iterations, primary_tick_count)?;
                    }
                    TickStrategy::ExtraFilter => {
                        let raw = filter_ticks(
                            &state.tick_data.raw_ticks,
                            envelope.max_tick_count,
                            true,
                        );
                        state.tick_data = self.materialize(raw);
                    }
                    TickStrategy::Rotate => {
                        state.auto_rotation = if state.label_overlap {
                            normalize_angle_360(self.spec.label.auto_rotate_angle.to_radians())
                        } else {
                            0.0
                        };
                    }
                    TickStrategy::Wrap => {
                        self.wrap_labels(&mut state.tick_data);
                        state.terminate = true;
                    }
                }
                let rotation = base_rotation.with_auto_rotation(state.auto_rotation);
                state.label_overlap = self.check_overlap(&state.tick_data.ticks, &rotation);
            }
        }

        let rotation = base_rotation.with_auto_rotation(state.auto_rotation);
        let primary_tick_count = match primary_tick_count {
            Some(count) => Some(count),
            None if !state.tick_data.raw_ticks.is_empty() => Some(state.tick_data.raw_ticks.len()),
            None => None,
        };
        tracing::debug!(
            iterations,
            ticks = state.tick_data.ticks.len(),
            auto_rotation = state.auto_rotation,
            label_overlap = state.label_overlap,
            "generated ticks"
        );
        Ok(TickGenerationResult {
            tick_data: state.tick_data,
            primary_tick_count,
            text_align: rotation.text_align(self.frame),
            text_baseline: rotation.text_baseline(self.frame),
            rotation,
            iterations,
            label_overlap: state.label_overlap,
        })
    }

    /// Runs one generation strategy, re-querying with lower counts while the ticks repeat.
    fn generate(
        &mut self,
        kind: TickGenerationType,
        state: &mut PassState,
        envelope: TickCountEnvelope,
        max_iterations: usize,
        primary_tick_count: Option<usize>,
    ) -> Result<(), AxisError> {
        let continuous = self.scale.is_continuous();
        let count_at = |index: usize| {
            if continuous {
                envelope
                    .default_tick_count
                    .saturating_sub(index)
                    .max(envelope.min_tick_count)
            } else {
                envelope.max_tick_count
            }
        };
        let regenerate = !self.has_explicit_ticks()
            && count_at(state.index) > envelope.min_tick_count
            && match kind {
                TickGenerationType::Create => continuous,
                TickGenerationType::Filter => true,
                TickGenerationType::CreateSecondary | TickGenerationType::Values => false,
            };

        loop {
            let tick_count = count_at(state.index);
            let raw = self.raw_ticks(
                kind,
                &state.tick_data.raw_ticks,
                tick_count,
                envelope,
                primary_tick_count,
            )?;
            let unchanged = regenerate && raw == state.tick_data.raw_ticks;
            state.tick_data = self.materialize(raw);
            state.index += 1;
            if !unchanged || state.index > max_iterations {
                break;
            }
        }
        state.terminate |= self.has_explicit_ticks();
        Ok(())
    }

    fn raw_ticks(
        &mut self,
        kind: TickGenerationType,
        previous: &[f64],
        tick_count: usize,
        envelope: TickCountEnvelope,
        primary_tick_count: Option<usize>,
    ) -> Result<Vec<f64>, AxisError> {
        Ok(match kind {
            TickGenerationType::Values => self.spec.tick.values.clone().unwrap_or_default(),
            TickGenerationType::CreateSecondary => {
                let count = primary_tick_count.unwrap_or(envelope.default_tick_count);
                self.scale.secondary_ticks(count)?
            }
            TickGenerationType::Filter => {
                filter_ticks(previous, tick_count, self.spec.tick.has_explicit_spacing())
            }
            TickGenerationType::Create => match self.spec.tick.interval {
                Some(interval) => self.scale.interval_ticks(interval),
                None => self.scale.ticks(
                    TickRequest::new(tick_count)
                        .with_envelope(envelope.min_tick_count, envelope.max_tick_count),
                ),
            },
        })
    }

    fn materialize(&self, raw: Vec<f64>) -> TickData {
        TickSource {
            scale: &*self.scale,
            visible: self.visible,
            label_domain: self.label_domain,
            format: self.format,
            formatter: self.spec.label.formatter.as_ref(),
        }
        .materialize(raw)
    }

    /// Wraps every label to the space one label may occupy.
    fn wrap_labels(&self, tick_data: &mut TickData) {
        let label = &self.spec.label;
        let per_label = round_px(self.range_length() / tick_data.label_count.max(1) as f64);
        let (default_width, default_height) = if self.frame.parallel {
            (per_label, self.spec.max_thickness)
        } else {
            (self.spec.max_thickness, per_label)
        };
        let max_width = label.max_width.unwrap_or(default_width);
        let max_height = label.max_height.unwrap_or(default_height);
        for tick in &mut tick_data.ticks {
            tick.label =
                self.measurer
                    .wrap(&tick.label, max_width, max_height, &label.style, label.wrapping);
        }
        tick_data.recount_labels();
    }

    fn check_overlap(&self, ticks: &[TickRecord], rotation: &RotationState) -> bool {
        if !self.avoids_collisions() {
            return false;
        }
        let placements = place_labels(
            ticks,
            label_x(self.spec, self.frame),
            rotation,
            self.frame,
            self.measurer,
            &self.spec.label.style,
        );
        labels_overlap(
            &placements,
            label_spacing(self.spec.label.min_spacing, rotation.is_rotated()),
        )
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::scale::{ScaleBand, ScaleLinear, ScaleLog};
    use alloc::format;
    use alloc::string::String;
    use axle_text::{HeuristicTextMeasurer, WrapStrategy};
    use core::f64::consts::FRAC_PI_2;

    const BOTTOM: AxisFrame = AxisFrame {
        rotation: -FRAC_PI_2,
        side: -1.0,
        parallel: true,
    };
    const LEFT: AxisFrame = AxisFrame {
        rotation: 0.0,
        side: -1.0,
        parallel: false,
    };

    fn run(
        scale: &mut AxisScale,
        spec: &AxisSpec,
        frame: AxisFrame,
        domain: LabelDomain<'_>,
        primary: Option<usize>,
    ) -> Result<TickGenerationResult, AxisError> {
        let (r0, r1) = scale.range();
        let format = ResolvedFormat::Default;
        TickPipeline {
            scale,
            spec,
            frame,
            measurer: &HeuristicTextMeasurer,
            label_domain: domain,
            format: &format,
            visible: (r0.min(r1), r0.max(r1)),
            min_rect_distance: None,
        }
        .run(primary)
    }

    fn long_categories(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Category number {i:02}")).collect()
    }

    #[test]
    fn numeric_ticks_fit_the_envelope() {
        let mut scale = AxisScale::Linear(ScaleLinear::new((0.0, 100.0), (0.0, 500.0)));
        let spec = AxisSpec::default();
        let result = run(&mut scale, &spec, BOTTOM, LabelDomain::Number, None).unwrap();
        let envelope = estimate_tick_count(500.0, f64::NAN, f64::NAN, None);
        let n = result.tick_data.ticks.len();
        assert!(
            (envelope.min_tick_count..=envelope.max_tick_count).contains(&n),
            "{n} ticks outside {envelope:?}"
        );
        for t in &result.tick_data.ticks {
            assert!((0.0..=500.0).contains(&t.offset), "{t:?}");
        }
        assert!(!result.label_overlap);
        assert_eq!(result.primary_tick_count, Some(result.tick_data.raw_ticks.len()));
    }

    #[test]
    fn crowded_categories_rotate_and_thin() {
        let categories = long_categories(20);
        let mut scale = AxisScale::Band(ScaleBand::new((0.0, 400.0), 20).with_padding(0.0, 0.0));
        let spec = AxisSpec::default().with_auto_rotate(335.0);
        let result = run(
            &mut scale,
            &spec,
            BOTTOM,
            LabelDomain::Category(&categories),
            None,
        )
        .unwrap();
        assert!(result.rotation.auto_rotation != 0.0, "{result:?}");
        assert!(!result.label_overlap);
        assert!(result.tick_data.ticks.len() < 20);

        let placements = place_labels(
            &result.tick_data.ticks,
            label_x(&spec, BOTTOM),
            &result.rotation,
            BOTTOM,
            &HeuristicTextMeasurer,
            &spec.label.style,
        );
        assert!(!labels_overlap(&placements, 0.0));
    }

    #[test]
    fn explicit_values_end_after_one_pass() {
        let mut scale = AxisScale::Linear(ScaleLinear::new((0.0, 10.0), (0.0, 30.0)));
        let spec = AxisSpec::default().with_tick_values([0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        let result = run(&mut scale, &spec, BOTTOM, LabelDomain::Number, None).unwrap();
        assert_eq!(result.iterations, 1);
        assert_eq!(result.tick_data.raw_ticks, [0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        // The values are kept even though the labels crowd each other.
        assert!(result.label_overlap);
    }

    #[test]
    fn unresolvable_overlap_still_terminates() {
        let categories = long_categories(50);
        let mut scale = AxisScale::Band(ScaleBand::new((0.0, 60.0), 50));
        let spec = AxisSpec::default();
        let result = run(
            &mut scale,
            &spec,
            BOTTOM,
            LabelDomain::Category(&categories),
            None,
        )
        .unwrap();
        assert!(result.iterations <= DISCRETE_MAX_ITERATIONS + 1);
        assert!(result.tick_data.ticks.len() <= 1 || result.label_overlap);
    }

    #[test]
    fn auto_wrap_breaks_lines_and_terminates() {
        let categories: Vec<String> = (0..6).map(|i| format!("A rather long label {i}")).collect();
        let mut scale = AxisScale::Band(ScaleBand::new((0.0, 300.0), 6));
        let spec = AxisSpec::default().with_auto_wrap(WrapStrategy::OnSpace);
        let result = run(
            &mut scale,
            &spec,
            BOTTOM,
            LabelDomain::Category(&categories),
            None,
        )
        .unwrap();
        assert_eq!(result.iterations, 1);
        assert!(result.tick_data.ticks.iter().all(|t| t.label.contains('\n')));
    }

    #[test]
    fn secondary_axis_matches_primary_count() {
        let mut scale = AxisScale::Linear(ScaleLinear::new((3.0, 87.0), (300.0, 0.0)));
        let spec = AxisSpec::default();
        let result = run(&mut scale, &spec, LEFT, LabelDomain::Number, Some(4)).unwrap();
        assert_eq!(result.tick_data.raw_ticks.len(), 4);
        assert_eq!(result.primary_tick_count, Some(4));
        let (d0, d1) = scale.domain();
        assert!(d0 <= 3.0 && d1 >= 87.0, "domain {d0}..{d1}");
    }

    #[test]
    fn log_secondary_axis_is_a_configuration_error() {
        let mut scale = AxisScale::Log(ScaleLog::new((1.0, 1000.0), (300.0, 0.0)));
        let spec = AxisSpec::default();
        let err = run(&mut scale, &spec, LEFT, LabelDomain::Number, Some(4)).unwrap_err();
        assert_eq!(err, AxisError::UnsupportedSecondaryAxis { scale: "log" });
    }

    #[test]
    fn band_secondary_axis_is_a_configuration_error() {
        let categories = long_categories(4);
        let mut scale = AxisScale::Band(ScaleBand::new((0.0, 400.0), 4));
        let spec = AxisSpec::default();
        let err = run(
            &mut scale,
            &spec,
            BOTTOM,
            LabelDomain::Category(&categories),
            Some(4),
        )
        .unwrap_err();
        assert_eq!(err, AxisError::UnsupportedSecondaryAxis { scale: "band" });
    }

    #[test]
    fn runs_are_idempotent() {
        let categories = long_categories(20);
        let spec = AxisSpec::default().with_auto_rotate(335.0);
        let mut scale = AxisScale::Band(ScaleBand::new((0.0, 400.0), 20));
        let a = run(&mut scale, &spec, BOTTOM, LabelDomain::Category(&categories), None).unwrap();
        let b = run(&mut scale, &spec, BOTTOM, LabelDomain::Category(&categories), None).unwrap();
        assert_eq!(a, b);
    }
}
