// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick label formatting.
//!
//! Numeric labels default to the number of fraction digits the tick set needs. A label
//! format specifier can override that:
//! - numbers: `[,][.precision][~][type]` with `type` one of `f e % s d` (or omitted)
//! - time: `%`-directives, see [`TimeFormat`]

use alloc::string::{String, ToString};
use alloc::sync::Arc;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::error::FormatError;
use crate::time::{self, TimeFormat};

/// Largest number of fraction digits used by default formatting.
pub const MAX_FRACTION_DIGITS: usize = 10;

/// Inputs handed to a user label formatter.
#[derive(Clone, Copy, Debug)]
pub struct LabelDatum<'a> {
    /// The raw tick value (a category index on category axes).
    pub value: f64,
    /// The category text, on category axes.
    pub category: Option<&'a str>,
    /// Distance between adjacent raw ticks, or `0` when unknown.
    pub step: f64,
    /// Fraction digits the default formatter would use.
    pub fraction_digits: usize,
}

/// A user-supplied tick label formatter.
pub type LabelFormatterFn = Arc<dyn Fn(&LabelDatum<'_>) -> String + Send + Sync>;

/// Numeric presentation type of a [`NumberFormat`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NumberType {
    /// Shortest representation, or `precision` fraction digits when given.
    Plain,
    Fixed,
    Exponent,
    Percent,
    Si,
    Integer,
}

/// A parsed numeric format specifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumberFormat {
    group: bool,
    precision: Option<usize>,
    trim: bool,
    kind: NumberType,
}

impl NumberFormat {
    /// Parses `[,][.precision][~][type]`.
    pub fn parse(spec: &str) -> Result<Self, FormatError> {
        let invalid = || FormatError::InvalidSpecifier(spec.to_string());
        let mut rest = spec;

        let group = rest.starts_with(',');
        if group {
            rest = &rest[1..];
        }

        let mut precision = None;
        if let Some(after) = rest.strip_prefix('.') {
            let digits = after.chars().take_while(char::is_ascii_digit).count();
            if digits == 0 || digits > 2 {
                return Err(invalid());
            }
            precision = Some(after[..digits].parse::<usize>().map_err(|_| invalid())?);
            rest = &after[digits..];
        }

        let trim = rest.starts_with('~');
        if trim {
            rest = &rest[1..];
        }

        let kind = match rest {
            "" => NumberType::Plain,
            "f" => NumberType::Fixed,
            "e" => NumberType::Exponent,
            "%" => NumberType::Percent,
            "s" => NumberType::Si,
            "d" => NumberType::Integer,
            _ => return Err(invalid()),
        };

        Ok(Self {
            group,
            precision,
            trim,
            kind,
        })
    }

    /// Formats `v`.
    pub fn format(&self, v: f64) -> String {
        if !v.is_finite() {
            return alloc::format!("{v}");
        }
        let (body, suffix) = match self.kind {
            NumberType::Plain => match self.precision {
                Some(p) => (alloc::format!("{v:.p$}"), ""),
                None => (alloc::format!("{v}"), ""),
            },
            NumberType::Fixed => {
                let p = self.precision.unwrap_or(6);
                (alloc::format!("{v:.p$}"), "")
            }
            NumberType::Exponent => {
                let p = self.precision.unwrap_or(6);
                (alloc::format!("{v:.p$e}"), "")
            }
            NumberType::Percent => {
                let p = self.precision.unwrap_or(0);
                let percent = v * 100.0;
                (alloc::format!("{percent:.p$}"), "%")
            }
            NumberType::Integer => (alloc::format!("{v:.0}"), ""),
            NumberType::Si => {
                let (scaled, prefix) = si_prefix(v);
                let p = self.precision.unwrap_or(2);
                (alloc::format!("{scaled:.p$}"), prefix)
            }
        };
        let si_default = self.kind == NumberType::Si && self.precision.is_none();
        let body = if self.trim || si_default {
            trim_zeros(&body)
        } else {
            body
        };
        let body = if self.group { group_thousands(&body) } else { body };
        let mut out = normalize_negative_zero(body);
        out.push_str(suffix);
        out
    }
}

fn si_prefix(v: f64) -> (f64, &'static str) {
    const PREFIXES: [&str; 17] = [
        "y", "z", "a", "f", "p", "n", "\u{b5}", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
    ];
    if v == 0.0 {
        return (0.0, "");
    }
    let exp = (v.abs().log10() / 3.0).floor().clamp(-8.0, 8.0);
    #[allow(clippy::cast_possible_truncation, reason = "clamped to [-8, 8]")]
    let index = (exp as i32 + 8) as usize;
    (v / 1000_f64.powf(exp), PREFIXES[index])
}

/// Removes trailing fraction zeros (and a dangling `.`), leaving exponents alone.
fn trim_zeros(s: &str) -> String {
    let (mantissa, exponent) = match s.find('e') {
        Some(i) => s.split_at(i),
        None => (s, ""),
    };
    if !mantissa.contains('.') {
        return s.to_string();
    }
    let trimmed = mantissa.trim_end_matches('0').trim_end_matches('.');
    alloc::format!("{trimmed}{exponent}")
}

fn group_thousands(s: &str) -> String {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let int_len = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let (int, tail) = digits.split_at(int_len);
    let mut out = String::from(sign);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int_len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push_str(tail);
    out
}

fn normalize_negative_zero(s: String) -> String {
    match s.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| matches!(c, '0' | '.' | ',')) => rest.to_string(),
        _ => s,
    }
}

/// Formats `v` with exactly `fraction_digits` digits after the point.
pub fn format_fixed(v: f64, fraction_digits: usize) -> String {
    if !v.is_finite() {
        return alloc::format!("{v}");
    }
    normalize_negative_zero(alloc::format!("{v:.fraction_digits$}"))
}

/// The fewest fraction digits (at most [`MAX_FRACTION_DIGITS`]) that print every tick exactly.
pub fn fraction_digits(ticks: &[f64]) -> usize {
    ticks
        .iter()
        .filter(|v| v.is_finite())
        .map(|&v| {
            (0..=MAX_FRACTION_DIGITS)
                .find(|&d| {
                    #[allow(clippy::cast_possible_truncation, reason = "d <= 10")]
                    let scaled = v * 10_f64.powi(d as i32);
                    (scaled - scaled.round()).abs() < 1e-7 * scaled.abs().max(1.0)
                })
                .unwrap_or(MAX_FRACTION_DIGITS)
        })
        .max()
        .unwrap_or(0)
}

/// A label format resolved for one axis.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ResolvedFormat {
    Default,
    Number(NumberFormat),
    Time(TimeFormat),
}

impl ResolvedFormat {
    /// Parses `spec` for a numeric or time axis.
    pub(crate) fn parse(spec: &str, is_time: bool) -> Result<Self, FormatError> {
        if is_time && spec.contains('%') && !is_numeric_percent(spec) {
            TimeFormat::parse(spec).map(Self::Time)
        } else {
            NumberFormat::parse(spec).map(Self::Number)
        }
    }
}

fn is_numeric_percent(spec: &str) -> bool {
    spec.ends_with('%') && NumberFormat::parse(spec).is_ok()
}

/// What kind of values the labels represent.
#[derive(Clone, Copy, Debug)]
pub(crate) enum LabelDomain<'a> {
    Number,
    Time,
    Category(&'a [String]),
}

/// Turns raw tick values into label text for one tick-generation pass.
pub(crate) struct TickLabeler<'a> {
    pub(crate) domain: LabelDomain<'a>,
    pub(crate) format: &'a ResolvedFormat,
    pub(crate) user: Option<&'a LabelFormatterFn>,
    pub(crate) step: f64,
    pub(crate) fraction_digits: usize,
}

impl TickLabeler<'_> {
    pub(crate) fn label(&self, value: f64) -> String {
        let category = match self.domain {
            LabelDomain::Category(categories) => category_at(categories, value),
            _ => None,
        };
        if let Some(user) = self.user {
            return user(&LabelDatum {
                value,
                category,
                step: self.step,
                fraction_digits: self.fraction_digits,
            });
        }
        match (self.domain, self.format) {
            (LabelDomain::Category(_), _) => category.map(str::to_string).unwrap_or_default(),
            (_, ResolvedFormat::Number(f)) => f.format(value),
            (_, ResolvedFormat::Time(f)) => f.format(value),
            (LabelDomain::Time, ResolvedFormat::Default) => time::format_time_seconds(value, self.step),
            (LabelDomain::Number, ResolvedFormat::Default) => format_fixed(value, self.fraction_digits),
        }
    }
}

fn category_at(categories: &[String], value: f64) -> Option<&str> {
    if value.is_nan() || value < 0.0 {
        return None;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "non-negative; out-of-range indices fall through to `get`"
    )]
    let index = value.round() as usize;
    categories.get(index).map(String::as_str)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn fraction_digits_follow_tick_precision() {
        assert_eq!(fraction_digits(&[0.0, 20.0, 40.0]), 0);
        assert_eq!(fraction_digits(&[0.0, 0.1, 0.2, 0.3]), 1);
        assert_eq!(fraction_digits(&[0.0, 0.25, 0.5]), 2);
        assert_eq!(fraction_digits(&[]), 0);
    }

    #[test]
    fn fixed_format_normalises_negative_zero() {
        assert_eq!(format_fixed(-0.0, 1), "0.0");
        assert_eq!(format_fixed(-0.00001, 2), "0.00");
        assert_eq!(format_fixed(-1.5, 1), "-1.5");
    }

    #[test]
    fn number_specifiers() {
        let f = |spec: &str, v: f64| NumberFormat::parse(spec).expect(spec).format(v);
        assert_eq!(f(".2f", 1.23456), "1.23");
        assert_eq!(f(",.0f", 1234567.0), "1,234,567");
        assert_eq!(f(".0%", 0.256), "26%");
        assert_eq!(f("d", 41.6), "42");
        assert_eq!(f(".3~f", 1.5), "1.5");
        assert_eq!(f("s", 1500.0), "1.5k");
        assert_eq!(f("~s", 2_000_000.0), "2M");
        assert_eq!(f("", 0.5), "0.5");
    }

    #[test]
    fn invalid_number_specifier_is_rejected() {
        assert_eq!(
            NumberFormat::parse(".x"),
            Err(FormatError::InvalidSpecifier(".x".into()))
        );
        assert!(NumberFormat::parse("q").is_err());
        assert!(NumberFormat::parse(".123f").is_err());
    }

    #[test]
    fn time_axis_specifier_prefers_directives() {
        assert!(matches!(
            ResolvedFormat::parse("%H:%M", true),
            Ok(ResolvedFormat::Time(_))
        ));
        assert!(matches!(
            ResolvedFormat::parse(".0%", true),
            Ok(ResolvedFormat::Number(_))
        ));
    }

    #[test]
    fn labeler_uses_categories_and_user_formatter() {
        let categories = std::vec![String::from("a"), String::from("b")];
        let format = ResolvedFormat::Default;
        let labeler = TickLabeler {
            domain: LabelDomain::Category(&categories),
            format: &format,
            user: None,
            step: 1.0,
            fraction_digits: 0,
        };
        assert_eq!(labeler.label(1.0), "b");
        assert_eq!(labeler.label(5.0), "");

        let user: LabelFormatterFn =
            Arc::new(|d: &LabelDatum<'_>| alloc::format!("<{}>", d.category.unwrap_or("?")));
        let labeler = TickLabeler {
            user: Some(&user),
            ..labeler
        };
        assert_eq!(labeler.label(0.0), "<a>");
    }
}
