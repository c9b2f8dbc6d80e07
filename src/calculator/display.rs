//! What the calculator screen shows after each input.

use serde::{Serialize, Serializer};
use std::fmt;

/// Marker shown in place of a number when something went wrong.
pub const ERROR_MARKER: &str = "Error";

/// Read-only projection of the engine state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayValue {
    /// A number, either as typed (`"23."`) or formatted from a result.
    Number(String),
    /// Shown on any absorbed failure.
    Error,
}

impl DisplayValue {
    pub fn zero() -> Self {
        Self::Number("0".to_string())
    }

    /// Display for a computed value. Non-finite values become `Error`.
    pub fn from_value(value: f64) -> Self {
        if value.is_finite() {
            Self::Number(format_number(value))
        } else {
            Self::Error
        }
    }

    /// Display for an operand still being typed.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            Self::zero()
        } else {
            Self::Number(text.to_string())
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Number(text) => text,
            Self::Error => ERROR_MARKER,
        }
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DisplayValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Format a finite number without separators or trailing zeros.
///
/// Results are rounded to 10 decimal places so `0.1 + 0.2` shows `0.3`.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }

    let formatted = format!("{:.10}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');

    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}
