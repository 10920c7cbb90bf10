// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

/// Errors reported by axis configuration and layout.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AxisError {
    /// A configuration field failed validation.
    #[error("invalid axis configuration for `{field}`: {message}")]
    InvalidConfig {
        /// Dotted path of the offending field (e.g. `label.font_size`).
        field: &'static str,
        /// What the field must satisfy.
        message: &'static str,
    },
    /// The axis was asked to align its ticks to a primary axis, but its scale cannot do that.
    ///
    /// This is a misconfigured axis pairing, not a transient condition.
    #[error("{scale} scales cannot generate secondary-axis ticks")]
    UnsupportedSecondaryAxis {
        /// Name of the scale kind.
        scale: &'static str,
    },
}

/// Errors from parsing a label format specifier.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The numeric specifier did not match `[,][.precision][~][type]`.
    #[error("invalid number format specifier `{0}`")]
    InvalidSpecifier(alloc::string::String),
    /// A time specifier used a `%` directive that is not supported.
    #[error("unsupported time format directive `%{0}`")]
    UnsupportedDirective(char),
}
