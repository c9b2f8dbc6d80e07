//! Token-driven running-total engine.
//!
//! The engine keeps a short buffer of `operand operator operand` entries and
//! folds it left to right as input arrives, the way a pocket calculator
//! does. There is no precedence: `2 + 3 * 4 =` is `20`.

use super::buffer::{Entry, Operand, OperationBuffer};
use super::detection::{is_numeric_literal, normalize_literal};
use super::display::DisplayValue;
use super::error::EngineError;
use super::token::{Operator, Token};
use crate::keymap::Keymap;
use serde::Serialize;
use tracing::{debug, warn};

/// Inputs accepted by [`ExpressionEngine::push_digit_or_dot`].
#[derive(Clone, Copy, Debug)]
enum Input {
    Digit(u8),
    Dot,
    Operator(Operator),
}

/// Serializable view of the engine state.
#[derive(Clone, Debug, Serialize)]
pub struct EngineSnapshot {
    pub buffer: OperationBuffer,
    pub last_operator: Option<Operator>,
    pub last_number: Option<f64>,
    pub display: DisplayValue,
}

/// Incremental calculator state machine.
#[derive(Clone, Debug, Default)]
pub struct ExpressionEngine {
    buffer: OperationBuffer,
    /// Operator re-applied by a repeated `=`.
    last_operator: Option<Operator>,
    /// Right operand re-applied by a repeated `=`.
    last_number: Option<f64>,
    /// Latched until the next accepted input.
    error: Option<EngineError>,
}

impl ExpressionEngine {
    /// A fresh engine showing `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one token and return the resulting display.
    pub fn push(&mut self, token: Token) -> DisplayValue {
        self.error = None;

        let outcome = match token {
            Token::Digit(d) => self.push_digit_or_dot(Input::Digit(d)),
            Token::Dot => self.add_dot(),
            Token::Operator(op) => self.push_digit_or_dot(Input::Operator(op)),
            Token::Percent => self.add_percent(),
            Token::Equals => self.reduce(),
            Token::ClearAll => {
                self.clear_all();
                Ok(())
            }
            Token::ClearEntry => {
                self.clear_entry();
                Ok(())
            }
        };

        if let Err(e) = outcome {
            self.fail(e);
        }

        let shown = self.display();
        debug!(%token, buffer = %self.buffer.describe(), %shown, "token processed");
        shown
    }

    /// Resolve `key` through `keymap` and feed the token.
    ///
    /// Unknown keys show `Error` and leave the buffer untouched.
    pub fn press(&mut self, keymap: &Keymap, key: &str) -> DisplayValue {
        match keymap.resolve(key) {
            Some(token) => self.push(token),
            None => {
                self.fail(EngineError::InvalidKey(key.to_string()));
                self.display()
            }
        }
    }

    /// Use pasted text as the current operand. Anything that is not a plain
    /// number is ignored.
    pub fn paste(&mut self, text: &str) -> DisplayValue {
        let text = text.trim();
        if !is_numeric_literal(text) {
            debug!(text, "ignoring non-numeric paste");
            return self.display();
        }

        self.error = None;
        let operand = Entry::Operand(Operand::Text(normalize_literal(text)));
        if self.buffer.last_is_operator() {
            self.buffer.push(operand);
        } else {
            self.buffer.set_last(operand);
        }
        self.display()
    }

    /// Current display without changing any state.
    pub fn display(&self) -> DisplayValue {
        if self.error.is_some() {
            return DisplayValue::Error;
        }

        match self.buffer.last_operand() {
            Some(Operand::Text(text)) => DisplayValue::from_text(text),
            Some(Operand::Value(value)) => DisplayValue::from_value(*value),
            None => DisplayValue::zero(),
        }
    }

    /// The in-progress expression.
    pub fn buffer(&self) -> &OperationBuffer {
        &self.buffer
    }

    /// Operator a repeated `=` would re-apply.
    pub fn last_operator(&self) -> Option<Operator> {
        self.last_operator
    }

    /// Right operand a repeated `=` would re-apply.
    pub fn last_number(&self) -> Option<f64> {
        self.last_number
    }

    /// Serializable copy of the current state.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            buffer: self.buffer.clone(),
            last_operator: self.last_operator,
            last_number: self.last_number,
            display: self.display(),
        }
    }

    fn push_digit_or_dot(&mut self, input: Input) -> Result<(), EngineError> {
        let last_is_operand = !self.buffer.last_is_operator();

        match input {
            // Extend the operand being typed. A lone "0" or a computed value
            // is replaced rather than extended.
            Input::Digit(d) if last_is_operand => {
                let digit = char::from(b'0' + d);
                let text = match self.buffer.last() {
                    Entry::Operand(Operand::Text(t)) if t != "0" => format!("{}{}", t, digit),
                    _ => digit.to_string(),
                };
                self.buffer.set_last(Entry::Operand(Operand::Text(text)));
            }
            // Last operator wins.
            Input::Operator(op) if !last_is_operand => {
                self.last_operator = Some(op);
                self.buffer.set_last(Entry::Operator(op));
            }
            Input::Operator(op) => {
                self.last_operator = Some(op);
                if let Some(operand) = self.buffer.last_operand() {
                    self.last_number = Some(operand.value()?);
                }
                self.push_entry(Entry::Operator(op))?;
            }
            Input::Dot => match self.buffer.last() {
                Entry::Operand(operand) => {
                    let text = format!("{}.", operand.to_text());
                    self.buffer.set_last(Entry::Operand(Operand::Text(text)));
                }
                Entry::Operator(_) => {
                    self.push_entry(Entry::Operand(Operand::Text("0.".to_string())))?;
                }
            },
            Input::Digit(d) => {
                let digit = char::from(b'0' + d);
                self.push_entry(Entry::Operand(Operand::Text(digit.to_string())))?;
            }
        }

        Ok(())
    }

    /// Append an entry, folding the front of the buffer once it holds more
    /// than one complete operation.
    fn push_entry(&mut self, entry: Entry) -> Result<(), EngineError> {
        self.buffer.push(entry);

        while self.buffer.len() > 3 {
            let result = self.buffer.evaluate_front()?;
            self.buffer.collapse_front(result);
            self.last_number = Some(result);
            debug!(result, "folded running total");
        }

        Ok(())
    }

    fn add_percent(&mut self) -> Result<(), EngineError> {
        self.buffer.pop_operator();

        if let Entry::Operand(operand) = self.buffer.last() {
            let value = operand.value()? / 100.0;
            self.buffer.set_last(Entry::Operand(Operand::Value(value)));
        }

        Ok(())
    }

    fn add_dot(&mut self) -> Result<(), EngineError> {
        if self.buffer.last_is_operator() {
            self.buffer
                .push(Entry::Operand(Operand::Text("0".to_string())));
        }

        if let Entry::Operand(operand) = self.buffer.last()
            && operand.has_dot()
        {
            return Ok(());
        }

        self.push_digit_or_dot(Input::Dot)
    }

    fn clear_entry(&mut self) {
        if self.buffer.last_is_operator() {
            self.last_operator = None;
        }

        self.buffer.pop(self.last_number.unwrap_or(0.0));
    }

    fn clear_all(&mut self) {
        self.buffer = OperationBuffer::new();
        self.last_operator = None;
        self.last_number = None;
    }

    /// The `=` key.
    fn reduce(&mut self) -> Result<(), EngineError> {
        let Some(pending) = self.last_operator else {
            let value = self.current_value()?;
            self.last_number = Some(value);
            self.buffer = OperationBuffer::with_value(value);
            return Ok(());
        };

        let op = self.buffer.last_operator().unwrap_or(pending);
        self.last_operator = Some(op);

        // A bare result (or a dangling operator): repeat the last operation.
        if self.buffer.len() < 3 {
            let rhs = match self.last_number {
                Some(n) => n,
                None => self.current_value()?,
            };
            let lhs = self.buffer.first_operand().clone();
            self.buffer.set_triple(lhs, op, Operand::Value(rhs));
        }

        // `push_entry` folds anything longer, so the buffer is a full triple.
        if let Some(Entry::Operand(rhs)) = self.buffer.entries().get(2) {
            self.last_number = Some(rhs.value()?);
        }

        let result = self.evaluate()?;
        self.buffer = OperationBuffer::with_value(result);

        Ok(())
    }

    /// Apply the buffer's `operand operator operand`, completing a dangling
    /// operator with the last known number.
    fn evaluate(&mut self) -> Result<f64, EngineError> {
        if self.buffer.last_is_operator() {
            let fallback = self.current_value()?;
            self.buffer
                .push(Entry::Operand(Operand::Value(fallback)));
        }

        self.buffer.evaluate_front()
    }

    /// Value of the most recent operand, falling back to `last_number`.
    fn current_value(&self) -> Result<f64, EngineError> {
        match self.buffer.last_operand() {
            Some(operand) => operand.value(),
            None => Ok(self.last_number.unwrap_or(0.0)),
        }
    }

    fn fail(&mut self, error: EngineError) {
        warn!(%error, buffer = %self.buffer.describe(), "calculator error");

        if !matches!(error, EngineError::InvalidKey(_)) {
            self.buffer = OperationBuffer::new();
        }
        self.error = Some(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed a compact key string. `A` is clear-all, `E` is clear-entry.
    fn feed(engine: &mut ExpressionEngine, keys: &str) -> DisplayValue {
        let mut display = engine.display();
        for c in keys.chars() {
            let token = match c {
                'A' => Token::ClearAll,
                'E' => Token::ClearEntry,
                other => Token::from_char(other).unwrap(),
            };
            display = engine.push(token);
        }
        display
    }

    fn run(keys: &str) -> (ExpressionEngine, String) {
        let mut engine = ExpressionEngine::new();
        let display = feed(&mut engine, keys);
        (engine, display.to_string())
    }

    #[test]
    fn test_fresh_engine_shows_zero() {
        let engine = ExpressionEngine::new();
        assert_eq!(engine.display().as_str(), "0");
        assert_eq!(engine.buffer().len(), 1);
    }

    #[test]
    fn test_bare_equals_is_identity() {
        let (engine, display) = run("=");
        assert_eq!(display, "0");
        assert_eq!(engine.buffer().describe(), "0");

        let (_, display) = run("42=");
        assert_eq!(display, "42");
    }

    #[test]
    fn test_chaining_left_to_right() {
        let mut engine = ExpressionEngine::new();
        assert_eq!(feed(&mut engine, "2+3+").as_str(), "5");
        assert_eq!(engine.buffer().describe(), "5 +");
        assert_eq!(feed(&mut engine, "4=").as_str(), "9");

        let (_, display) = run("2+3*4=");
        assert_eq!(display, "20");
    }

    #[test]
    fn test_buffer_never_exceeds_three_entries() {
        let mut engine = ExpressionEngine::new();
        for c in "1+2-3*4/5+6".chars() {
            engine.push(Token::from_char(c).unwrap());
            assert!(engine.buffer().len() <= 3);
        }
    }

    #[test]
    fn test_operator_replacement() {
        let (engine, display) = run("5+*3=");
        assert_eq!(display, "15");
        assert_eq!(engine.last_operator(), Some(Operator::Multiply));
    }

    #[test]
    fn test_decimal_deduplication() {
        let (engine, display) = run("1.2.3");
        assert_eq!(display, "1.23");
        assert_eq!(engine.buffer().describe(), "1.23");
    }

    #[test]
    fn test_dot_shown_while_typing() {
        let (_, display) = run("23.");
        assert_eq!(display, "23.");
    }

    #[test]
    fn test_dot_after_operator_seeds_zero() {
        let mut engine = ExpressionEngine::new();
        assert_eq!(feed(&mut engine, "5+.").as_str(), "0.");
        assert_eq!(feed(&mut engine, "5=").as_str(), "5.5");
    }

    #[test]
    fn test_no_leading_zeros() {
        assert_eq!(run("007").1, "7");
        assert_eq!(run("0.05").1, "0.05");
        assert_eq!(run("00").1, "0");
    }

    #[test]
    fn test_repeat_equals() {
        let mut engine = ExpressionEngine::new();
        assert_eq!(feed(&mut engine, "4+2=").as_str(), "6");
        assert_eq!(feed(&mut engine, "=").as_str(), "8");
        assert_eq!(feed(&mut engine, "=").as_str(), "10");
        assert_eq!(engine.last_number(), Some(2.0));
    }

    #[test]
    fn test_equals_after_dangling_operator_reuses_operand() {
        assert_eq!(run("2+=").1, "4");
        assert_eq!(run("3*=").1, "9");
    }

    #[test]
    fn test_new_operand_after_result_repeats_operation() {
        let mut engine = ExpressionEngine::new();
        feed(&mut engine, "4+2=");
        assert_eq!(feed(&mut engine, "7").as_str(), "7");
        assert_eq!(feed(&mut engine, "=").as_str(), "9");
    }

    #[test]
    fn test_operator_after_result_continues() {
        assert_eq!(run("4+2=*3=").1, "18");
    }

    #[test]
    fn test_percent() {
        let (engine, display) = run("50%");
        assert_eq!(display, "0.5");
        assert_eq!(engine.buffer().len(), 1);
    }

    #[test]
    fn test_percent_drops_dangling_operator() {
        let (engine, display) = run("50+%");
        assert_eq!(display, "0.5");
        assert_eq!(engine.buffer().describe(), "0.5");
    }

    #[test]
    fn test_clear_entry_on_operator() {
        let (engine, display) = run("7+E");
        assert_eq!(display, "7");
        assert_eq!(engine.buffer().describe(), "7");
        assert_eq!(engine.last_operator(), None);

        let mut engine = engine;
        assert_eq!(feed(&mut engine, "=").as_str(), "7");
    }

    #[test]
    fn test_clear_entry_on_operand() {
        let mut engine = ExpressionEngine::new();
        assert_eq!(feed(&mut engine, "12+34E").as_str(), "12");
        assert_eq!(engine.buffer().describe(), "12 +");
        assert_eq!(feed(&mut engine, "5=").as_str(), "17");
    }

    #[test]
    fn test_clear_entry_reseeds_empty_buffer() {
        let (engine, display) = run("7E");
        assert_eq!(display, "0");
        assert_eq!(engine.buffer().len(), 1);

        // Falls back to the last remembered operand.
        let (_, display) = run("4+2=E");
        assert_eq!(display, "2");
    }

    #[test]
    fn test_clear_all_resets_repeat_state() {
        let (engine, display) = run("4+2=A");
        assert_eq!(display, "0");
        assert_eq!(engine.last_operator(), None);
        assert_eq!(engine.last_number(), None);

        assert_eq!(run("4+2=A=").1, "0");
    }

    #[test]
    fn test_division_by_zero_shows_error() {
        let mut engine = ExpressionEngine::new();
        let display = feed(&mut engine, "5/0=");
        assert!(display.is_error());

        // Non-finite values propagate until replaced.
        assert!(feed(&mut engine, "+1=").is_error());
        assert_eq!(feed(&mut engine, "3").as_str(), "3");
    }

    #[test]
    fn test_unknown_key_keeps_buffer() {
        let keymap = Keymap::default();
        let mut engine = ExpressionEngine::new();
        feed(&mut engine, "12+");

        let display = engine.press(&keymap, "x");
        assert!(display.is_error());
        assert_eq!(engine.buffer().describe(), "12 +");

        assert_eq!(engine.press(&keymap, "3").as_str(), "3");
        assert_eq!(engine.press(&keymap, "Enter").as_str(), "15");
    }

    #[test]
    fn test_paste_numeric() {
        let mut engine = ExpressionEngine::new();
        feed(&mut engine, "5+");
        assert_eq!(engine.paste(" 12.5 ").as_str(), "12.5");
        assert_eq!(feed(&mut engine, "=").as_str(), "17.5");
    }

    #[test]
    fn test_paste_replaces_operand() {
        let mut engine = ExpressionEngine::new();
        feed(&mut engine, "99");
        assert_eq!(engine.paste("-3").as_str(), "-3");
        assert_eq!(feed(&mut engine, "*2=").as_str(), "-6");
    }

    #[test]
    fn test_paste_ignores_text() {
        let mut engine = ExpressionEngine::new();
        feed(&mut engine, "8");
        assert_eq!(engine.paste("hello").as_str(), "8");
        assert_eq!(engine.paste("1.2.3").as_str(), "8");
        assert_eq!(engine.buffer().describe(), "8");
    }

    #[test]
    fn test_bad_operand_resets_buffer_keeps_repeat_state() {
        let mut engine = ExpressionEngine::new();
        feed(&mut engine, "4+");
        engine
            .buffer
            .push(Entry::Operand(Operand::Text("1.2.3".to_string())));

        assert!(feed(&mut engine, "=").is_error());
        assert_eq!(engine.buffer().describe(), "0");
        assert_eq!(engine.last_operator(), Some(Operator::Add));
        assert_eq!(engine.last_number(), Some(4.0));

        assert_eq!(feed(&mut engine, "7").as_str(), "7");
        assert_eq!(feed(&mut engine, "=").as_str(), "11");
    }

    #[test]
    fn test_malformed_reduction_latches_error() {
        let mut engine = ExpressionEngine::new();
        feed(&mut engine, "4+2=");
        engine.fail(EngineError::MalformedReduction("4 +".to_string()));

        assert!(engine.display().is_error());
        assert_eq!(engine.buffer().describe(), "0");
        assert_eq!(engine.last_operator(), Some(Operator::Add));
        assert_eq!(engine.last_number(), Some(2.0));

        assert_eq!(feed(&mut engine, "5").as_str(), "5");
        assert_eq!(feed(&mut engine, "=").as_str(), "7");
    }

    #[test]
    fn test_paste_strips_leading_zeros() {
        let mut engine = ExpressionEngine::new();
        assert_eq!(engine.paste("007").as_str(), "7");
        assert_eq!(engine.paste("-0").as_str(), "0");
        assert_eq!(feed(&mut engine, "5").as_str(), "5");
        assert_eq!(engine.paste("-00.50").as_str(), "-0.50");
        assert_eq!(engine.paste(".5").as_str(), "0.5");
        assert_eq!(feed(&mut engine, "+1=").as_str(), "1.5");
    }

    #[test]
    fn test_snapshot_serializes() {
        let (engine, _) = run("4+2");
        let json = serde_json::to_value(engine.snapshot()).unwrap();
        assert_eq!(json["buffer"], serde_json::json!(["4", "+", "2"]));
        assert_eq!(json["last_operator"], "+");
        assert_eq!(json["last_number"], 4.0);
        assert_eq!(json["display"], "2");
    }
}
