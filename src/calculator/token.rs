//! Input tokens understood by the engine.

use serde::Serialize;
use std::fmt;

/// A binary operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl Operator {
    /// Parse an operator from its symbol.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }

    /// Apply the operator with plain `f64` semantics.
    ///
    /// Division by zero yields an infinity or NaN, never a panic.
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide => lhs / rhs,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One discrete calculator input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// A single decimal digit, `0..=9`.
    Digit(u8),
    Dot,
    Operator(Operator),
    Percent,
    Equals,
    ClearAll,
    ClearEntry,
}

impl Token {
    /// Parse a single-character token.
    ///
    /// Control tokens (`ClearAll`, `ClearEntry`) have no character form and
    /// are only reachable through a [`Keymap`](crate::keymap::Keymap).
    pub fn from_char(c: char) -> Option<Self> {
        if let Some(d) = c.to_digit(10) {
            return Some(Self::Digit(d as u8));
        }

        match c {
            '.' => Some(Self::Dot),
            '%' => Some(Self::Percent),
            '=' => Some(Self::Equals),
            _ => Operator::from_symbol(c).map(Self::Operator),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digit(d) => write!(f, "{}", d),
            Self::Dot => f.write_str("."),
            Self::Operator(op) => write!(f, "{}", op),
            Self::Percent => f.write_str("%"),
            Self::Equals => f.write_str("="),
            Self::ClearAll => f.write_str("AC"),
            Self::ClearEntry => f.write_str("CE"),
        }
    }
}
