// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy line wrapping on top of [`TextMeasurer::measure`].

use alloc::string::String;
use alloc::vec::Vec;

use crate::{TextMeasurer, TextStyle};

const ELLIPSIS: char = '\u{2026}';

/// How to break text that does not fit the available width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapStrategy {
    /// Never break lines; overlong lines are truncated with `…`.
    Never,
    /// Break at spaces, and inside words that are wider than a line.
    Always,
    /// Break at spaces only; words wider than a line are truncated with `…`.
    #[default]
    OnSpace,
    /// Like [`WrapStrategy::Always`], but words broken mid-way end with `-`.
    Hyphenate,
}

pub(crate) fn wrap_text<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    max_width: f64,
    max_height: f64,
    style: &TextStyle,
    strategy: WrapStrategy,
) -> String {
    if max_width.is_nan() || max_width <= 0.0 {
        return String::from(text);
    }
    let fits = |s: &str| measurer.measure(s, style).advance_width <= max_width;

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        if strategy == WrapStrategy::Never {
            lines.push(if fits(paragraph) {
                String::from(paragraph)
            } else {
                truncate(paragraph, &fits)
            });
            continue;
        }
        fill_paragraph(paragraph, strategy, &fits, &mut lines);
    }

    let line_height = measurer.measure(text, style).line_height();
    let max_lines = max_line_count(max_height, line_height);
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            *last = append_ellipsis(last, &fits);
        }
    }

    lines.join("\n")
}

fn fill_paragraph(
    paragraph: &str,
    strategy: WrapStrategy,
    fits: &impl Fn(&str) -> bool,
    lines: &mut Vec<String>,
) {
    let mut current = String::new();
    let mut any_word = false;
    for word in paragraph.split_whitespace() {
        any_word = true;
        let mut candidate = current.clone();
        if !candidate.is_empty() {
            candidate.push(' ');
        }
        candidate.push_str(word);
        if fits(&candidate) {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(core::mem::take(&mut current));
        }
        if fits(word) {
            current.push_str(word);
            continue;
        }

        match strategy {
            WrapStrategy::Always | WrapStrategy::Hyphenate => {
                let mut pieces = break_word(word, strategy == WrapStrategy::Hyphenate, fits);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
            WrapStrategy::OnSpace | WrapStrategy::Never => lines.push(truncate(word, fits)),
        }
    }
    if !current.is_empty() || !any_word {
        lines.push(current);
    }
}

fn break_word(word: &str, hyphenate: bool, fits: &impl Fn(&str) -> bool) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut chunk = String::new();
    for c in word.chars() {
        let mut candidate = chunk.clone();
        candidate.push(c);
        if hyphenate {
            candidate.push('-');
        }
        if !chunk.is_empty() && !fits(&candidate) {
            if hyphenate {
                chunk.push('-');
            }
            pieces.push(core::mem::take(&mut chunk));
        }
        chunk.push(c);
    }
    if !chunk.is_empty() {
        pieces.push(chunk);
    }
    pieces
}

/// Shortens `s` until `s…` fits, always keeping the ellipsis.
fn truncate(s: &str, fits: &impl Fn(&str) -> bool) -> String {
    let mut kept: String = String::from(s);
    loop {
        let mut candidate = String::from(kept.trim_end());
        candidate.push(ELLIPSIS);
        if kept.is_empty() || fits(&candidate) {
            return candidate;
        }
        kept.pop();
    }
}

fn append_ellipsis(line: &str, fits: &impl Fn(&str) -> bool) -> String {
    if line.ends_with(ELLIPSIS) {
        return String::from(line);
    }
    truncate(line, fits)
}

fn max_line_count(max_height: f64, line_height: f64) -> usize {
    if !max_height.is_finite() || line_height.is_nan() || line_height <= 0.0 {
        return usize::MAX;
    }
    let n = (max_height / line_height).clamp(1.0, u32::MAX as f64);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "clamped to [1, u32::MAX]; truncation is the intended floor"
    )]
    {
        n as usize
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::HeuristicTextMeasurer;

    // 10px font: every char is 6px wide and a line is 10px tall.
    fn style() -> TextStyle {
        TextStyle::new(10.0)
    }

    #[test]
    fn short_text_is_unchanged() {
        let out = HeuristicTextMeasurer.wrap("abc", 100.0, 100.0, &style(), WrapStrategy::OnSpace);
        assert_eq!(out, "abc");
    }

    #[test]
    fn on_space_breaks_between_words() {
        let out = HeuristicTextMeasurer.wrap(
            "alpha beta gamma",
            60.0,
            f64::INFINITY,
            &style(),
            WrapStrategy::OnSpace,
        );
        assert_eq!(out, "alpha beta\ngamma");
    }

    #[test]
    fn on_space_truncates_long_words() {
        let out = HeuristicTextMeasurer.wrap(
            "abcdefghijkl",
            36.0,
            f64::INFINITY,
            &style(),
            WrapStrategy::OnSpace,
        );
        assert_eq!(out, "abcde\u{2026}");
    }

    #[test]
    fn always_breaks_inside_words() {
        let out = HeuristicTextMeasurer.wrap(
            "abcdefghij",
            24.0,
            f64::INFINITY,
            &style(),
            WrapStrategy::Always,
        );
        assert_eq!(out, "abcd\nefgh\nij");
    }

    #[test]
    fn hyphenate_marks_broken_words() {
        let out = HeuristicTextMeasurer.wrap(
            "abcdefgh",
            24.0,
            f64::INFINITY,
            &style(),
            WrapStrategy::Hyphenate,
        );
        for line in out.lines().take(out.lines().count() - 1) {
            assert!(line.ends_with('-'), "expected hyphen in {out:?}");
        }
        assert!(
            out.lines().all(|l| l.chars().count() <= 4),
            "line too wide in {out:?}"
        );
    }

    #[test]
    fn never_truncates_instead_of_breaking() {
        let out = HeuristicTextMeasurer.wrap(
            "alpha beta",
            36.0,
            f64::INFINITY,
            &style(),
            WrapStrategy::Never,
        );
        assert_eq!(out, "alpha\u{2026}");
    }

    #[test]
    fn max_height_limits_line_count_and_marks_truncation() {
        let out = HeuristicTextMeasurer.wrap(
            "one two three four five",
            30.0,
            25.0,
            &style(),
            WrapStrategy::OnSpace,
        );
        let lines: std::vec::Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2, "got {out:?}");
        assert!(lines[1].ends_with('\u{2026}'), "got {out:?}");
    }

    #[test]
    fn explicit_newlines_are_kept() {
        let out = HeuristicTextMeasurer.wrap(
            "a\nb",
            100.0,
            f64::INFINITY,
            &style(),
            WrapStrategy::OnSpace,
        );
        assert_eq!(out, "a\nb");
    }
}
