//! The ordered token buffer holding the in-progress expression.

use super::display::format_number;
use super::error::EngineError;
use super::token::Operator;
use serde::Serialize;

/// A numeric slot in the buffer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Operand {
    /// Digits typed by the user, kept verbatim (`"23."`, `"0.50"`).
    Text(String),
    /// A value produced by a reduction or a percent.
    Value(f64),
}

impl Operand {
    /// Numeric value of this operand. Empty text counts as zero.
    pub fn value(&self) -> Result<f64, EngineError> {
        match self {
            Self::Value(v) => Ok(*v),
            Self::Text(t) if t.is_empty() => Ok(0.0),
            Self::Text(t) => t
                .parse::<f64>()
                .map_err(|_| EngineError::InvalidOperand(t.clone())),
        }
    }

    /// The operand as text, formatting computed values.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(t) => t.clone(),
            Self::Value(v) => format_number(*v),
        }
    }

    /// Check if the operand already contains a decimal point.
    pub fn has_dot(&self) -> bool {
        self.to_text().contains('.')
    }
}

/// One buffer slot.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Operand(Operand),
    Operator(Operator),
}

impl Entry {
    /// Check if this slot holds an operator.
    pub fn is_operator(&self) -> bool {
        matches!(self, Self::Operator(_))
    }

    /// The operand in this slot, if any.
    pub fn as_operand(&self) -> Option<&Operand> {
        match self {
            Self::Operand(o) => Some(o),
            Self::Operator(_) => None,
        }
    }
}

/// Ordered sequence of entries. Never empty and always starts with an
/// operand; a trailing operator is allowed while input is in progress.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OperationBuffer {
    entries: Vec<Entry>,
}

impl Default for OperationBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationBuffer {
    /// A buffer holding just `0`.
    pub fn new() -> Self {
        Self::with_value(0.0)
    }

    /// A buffer holding just `value`.
    pub fn with_value(value: f64) -> Self {
        Self {
            entries: vec![Entry::Operand(Operand::Value(value))],
        }
    }

    /// Number of entries, always at least one.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The trailing entry.
    pub fn last(&self) -> &Entry {
        // Non-empty by construction.
        &self.entries[self.entries.len() - 1]
    }

    fn last_mut(&mut self) -> &mut Entry {
        let idx = self.entries.len() - 1;
        &mut self.entries[idx]
    }

    /// Check if input stopped on an operator.
    pub fn last_is_operator(&self) -> bool {
        self.last().is_operator()
    }

    /// The most recent operand, scanning backwards past operators.
    pub fn last_operand(&self) -> Option<&Operand> {
        self.entries.iter().rev().find_map(Entry::as_operand)
    }

    /// The most recent operator, scanning backwards past operands.
    pub fn last_operator(&self) -> Option<Operator> {
        self.entries.iter().rev().find_map(|e| match e {
            Entry::Operator(op) => Some(*op),
            Entry::Operand(_) => None,
        })
    }

    /// The leading operand.
    pub fn first_operand(&self) -> &Operand {
        match &self.entries[0] {
            Entry::Operand(o) => o,
            Entry::Operator(_) => unreachable!("buffer always starts with an operand"),
        }
    }

    /// Append an entry without folding.
    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Overwrite the trailing entry.
    pub fn set_last(&mut self, entry: Entry) {
        *self.last_mut() = entry;
    }

    /// Drop the trailing entry, reseeding with `fallback` if the buffer
    /// would otherwise be empty.
    pub fn pop(&mut self, fallback: f64) -> Entry {
        let popped = self.entries.pop().unwrap_or(Entry::Operand(Operand::Value(0.0)));
        if self.entries.is_empty() {
            self.entries.push(Entry::Operand(Operand::Value(fallback)));
        }
        popped
    }

    /// Drop a trailing operator, if there is one.
    pub fn pop_operator(&mut self) -> Option<Operator> {
        match self.last() {
            Entry::Operator(op) => {
                let op = *op;
                self.entries.pop();
                Some(op)
            }
            Entry::Operand(_) => None,
        }
    }

    /// Replace the whole buffer with `operand operator operand`.
    pub fn set_triple(&mut self, lhs: Operand, op: Operator, rhs: Operand) {
        self.entries = vec![
            Entry::Operand(lhs),
            Entry::Operator(op),
            Entry::Operand(rhs),
        ];
    }

    /// Apply the leading `operand operator operand` and return the result.
    pub fn evaluate_front(&self) -> Result<f64, EngineError> {
        match self.entries.get(..3) {
            Some([Entry::Operand(lhs), Entry::Operator(op), Entry::Operand(rhs)]) => {
                Ok(op.apply(lhs.value()?, rhs.value()?))
            }
            _ => Err(EngineError::MalformedReduction(self.describe())),
        }
    }

    /// Replace the leading triple with `value`, keeping anything after it.
    pub fn collapse_front(&mut self, value: f64) {
        let tail = self.entries.split_off(3.min(self.entries.len()));
        self.entries = vec![Entry::Operand(Operand::Value(value))];
        self.entries.extend(tail);
    }

    /// Compact single-line rendering, e.g. `2 + 3.`.
    pub fn describe(&self) -> String {
        self.entries
            .iter()
            .map(|e| match e {
                Entry::Operand(o) => o.to_text(),
                Entry::Operator(op) => op.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
