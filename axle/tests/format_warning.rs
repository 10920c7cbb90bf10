// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unsupported label formats fall back to default formatting with a single warning.

use axle::{Axis, AxisKind, AxisOrient, AxisSpec, SkipAnimation};
use axle_text::HeuristicTextMeasurer;
use kurbo::Rect;
use tracing_test::traced_test;

#[traced_test]
#[test]
fn unsupported_format_warns_once_and_falls_back() {
    let mut axis = Axis::new("y", AxisOrient::Left, AxisKind::Number { nice: true });
    axis.set_plot(Rect::new(40.0, 10.0, 540.0, 310.0));
    axis.set_domain(0.0, 100.0);
    for _ in 0..3 {
        axis.set_spec(AxisSpec::default().with_label_format("%Q"))
            .unwrap();
        axis.calculate_layout(&HeuristicTextMeasurer, None).unwrap();
    }
    axis.update(&mut SkipAnimation);

    let labels: Vec<&str> = axis
        .records()
        .labels
        .iter()
        .map(|l| l.text.as_str())
        .collect();
    assert_eq!(labels, ["0", "20", "40", "60", "80", "100"]);

    assert!(logs_contain("unsupported label format"));
    logs_assert(|lines: &[&str]| {
        match lines
            .iter()
            .filter(|line| line.contains("unsupported label format"))
            .count()
        {
            1 => Ok(()),
            n => Err(format!("expected one warning, saw {n}")),
        }
    });
}

#[traced_test]
#[test]
fn valid_time_format_is_silent() {
    let mut axis = Axis::new("t", AxisOrient::Bottom, AxisKind::Time);
    axis.set_plot(Rect::new(0.0, 0.0, 600.0, 200.0));
    axis.set_domain(0.0, 3600.0);
    axis.set_spec(AxisSpec::default().with_label_format("%H:%M"))
        .unwrap();
    axis.calculate_layout(&HeuristicTextMeasurer, None).unwrap();
    axis.update(&mut SkipAnimation);
    assert!(axis.records().labels.iter().any(|l| l.text == "00:00"));
    assert!(!logs_contain("unsupported label format"));
}
