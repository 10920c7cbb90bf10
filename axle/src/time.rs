// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time tick generation and formatting helpers.
//!
//! Time is modelled as a numeric value in **seconds**. This module provides:
//! - "nice" tick steps for seconds/minutes/hours/days
//! - default tick label formatting (e.g. `1:05`, `2:03:00`)
//! - `%`-directive format strings (`%H:%M:%S.%L`)

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::error::FormatError;
use crate::scale::stepped;

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;

/// Returns tick values on "nice" time boundaries inside `[d0, d1]` (seconds), in domain order.
pub fn time_ticks_seconds(d0: f64, d1: f64, count: usize) -> Vec<f64> {
    if count == 0 || !d0.is_finite() || !d1.is_finite() {
        return Vec::new();
    }
    if d0 == d1 {
        return alloc::vec![d0];
    }
    let (lo, hi) = if d0 < d1 { (d0, d1) } else { (d1, d0) };
    let step = nice_time_step_seconds((hi - lo) / count as f64);
    let mut ticks = stepped(lo, hi, step);
    if d0 > d1 {
        ticks.reverse();
    }
    ticks
}

fn nice_time_step_seconds(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 1.0;
    }
    if step < 1.0 {
        return crate::scale::nice_step(step);
    }

    const STEPS: &[f64] = &[
        1.0,
        2.0,
        5.0,
        10.0,
        15.0,
        30.0,
        MINUTE,
        2.0 * MINUTE,
        5.0 * MINUTE,
        10.0 * MINUTE,
        15.0 * MINUTE,
        30.0 * MINUTE,
        HOUR,
        2.0 * HOUR,
        3.0 * HOUR,
        6.0 * HOUR,
        12.0 * HOUR,
        DAY,
        2.0 * DAY,
        7.0 * DAY,
    ];

    for &s in STEPS {
        if s >= step {
            return s;
        }
    }
    // Beyond a week, step in whole days with a 1-2-5 multiplier.
    crate::scale::nice_step(step / DAY).max(1.0).ceil() * DAY
}

/// Formats a tick value (seconds) given the tick step (seconds).
pub fn format_time_seconds(v: f64, step: f64) -> String {
    if !v.is_finite() {
        return alloc::format!("{v}");
    }

    let sign = if v < 0.0 { "-" } else { "" };
    let secs = whole(v.abs().round());
    let step = step.abs();

    let h = secs / 3600;
    let m = (secs / 60) % 60;
    let s = secs % 60;

    if step >= HOUR || h > 0 {
        alloc::format!("{sign}{h}:{m:02}:{s:02}")
    } else if step >= MINUTE || m > 0 {
        alloc::format!("{sign}{m}:{s:02}")
    } else {
        alloc::format!("{sign}{s}")
    }
}

fn whole(v: f64) -> i64 {
    let v = v.clamp(i64::MIN as f64, i64::MAX as f64);
    #[allow(clippy::cast_possible_truncation, reason = "clamped to the i64 range")]
    {
        v as i64
    }
}

/// One piece of a parsed time format string.
#[derive(Clone, Debug, PartialEq, Eq)]
enum TimePart {
    Literal(String),
    /// Hour of day, `00`–`23`.
    Hour,
    /// Minute, `00`–`59`.
    Minute,
    /// Second, `00`–`59`.
    Second,
    /// Millisecond, `000`–`999`.
    Millis,
}

/// A parsed `%`-directive time format, e.g. `%H:%M` or `%M:%S.%L`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeFormat {
    parts: Vec<TimePart>,
}

impl TimeFormat {
    /// Parses a format string. Supported directives are `%H %M %S %L %%`.
    pub fn parse(spec: &str) -> Result<Self, FormatError> {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = spec.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            let part = match chars.next() {
                Some('%') => {
                    literal.push('%');
                    continue;
                }
                Some('H') => TimePart::Hour,
                Some('M') => TimePart::Minute,
                Some('S') => TimePart::Second,
                Some('L') => TimePart::Millis,
                Some(other) => return Err(FormatError::UnsupportedDirective(other)),
                None => return Err(FormatError::UnsupportedDirective('%')),
            };
            if !literal.is_empty() {
                parts.push(TimePart::Literal(core::mem::take(&mut literal)));
            }
            parts.push(part);
        }
        if !literal.is_empty() {
            parts.push(TimePart::Literal(literal));
        }
        Ok(Self { parts })
    }

    /// Formats a timestamp in seconds.
    pub fn format(&self, seconds: f64) -> String {
        if !seconds.is_finite() {
            return alloc::format!("{seconds}");
        }
        let millis = whole((seconds * 1000.0).round()).rem_euclid(DAY_MILLIS);
        let mut out = String::new();
        for part in &self.parts {
            match part {
                TimePart::Literal(s) => out.push_str(s),
                TimePart::Hour => out.push_str(&alloc::format!("{:02}", millis / 3_600_000)),
                TimePart::Minute => {
                    out.push_str(&alloc::format!("{:02}", (millis / 60_000) % 60));
                }
                TimePart::Second => out.push_str(&alloc::format!("{:02}", (millis / 1000) % 60)),
                TimePart::Millis => out.push_str(&alloc::format!("{:03}", millis % 1000)),
            }
        }
        out
    }
}

const DAY_MILLIS: i64 = 86_400_000;
