//! Key bindings from keyboard keys and button names to calculator tokens.

use crate::calculator::{Operator, Token};
use std::collections::HashMap;
use thiserror::Error;

/// Built-in named bindings. Single characters (`0`-`9`, `.`, `+`, `%`, ...)
/// resolve without an entry here.
const DEFAULT_BINDINGS: &[(&str, &str)] = &[
    // Keyboard
    ("escape", "clear-all"),
    ("backspace", "clear-entry"),
    ("enter", "equals"),
    (",", "dot"),
    // Buttons
    ("ac", "clear-all"),
    ("ce", "clear-entry"),
    ("add", "add"),
    ("subtract", "subtract"),
    ("multiply", "multiply"),
    ("divide", "divide"),
    ("percent", "percent"),
    ("equals", "equals"),
    ("dot", "dot"),
];

#[derive(Debug, Error, PartialEq)]
pub enum KeymapError {
    #[error("unknown action '{action}' bound to key '{key}'")]
    UnknownAction { key: String, action: String },
}

/// Parse an action name (`clear-all`, `add`, ...) or a single token
/// character into a token.
pub fn parse_action(action: &str) -> Option<Token> {
    let token = match action {
        "clear-all" => Token::ClearAll,
        "clear-entry" => Token::ClearEntry,
        "equals" => Token::Equals,
        "percent" => Token::Percent,
        "dot" => Token::Dot,
        "add" => Token::Operator(Operator::Add),
        "subtract" => Token::Operator(Operator::Subtract),
        "multiply" => Token::Operator(Operator::Multiply),
        "divide" => Token::Operator(Operator::Divide),
        other => {
            let mut chars = other.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Token::from_char(c),
                _ => None,
            };
        }
    };
    Some(token)
}

/// Resolves key names to tokens. Lookups are case-insensitive.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<String, Token>,
}

impl Default for Keymap {
    fn default() -> Self {
        let bindings = DEFAULT_BINDINGS
            .iter()
            .filter_map(|(key, action)| Some((key.to_string(), parse_action(action)?)))
            .collect();

        Self { bindings }
    }
}

impl Keymap {
    /// Default bindings plus user overrides (`key -> action`).
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Result<Self, KeymapError> {
        let mut keymap = Self::default();
        for (key, action) in overrides {
            keymap.bind(key, action)?;
        }
        Ok(keymap)
    }

    pub fn bind(&mut self, key: &str, action: &str) -> Result<(), KeymapError> {
        let token = parse_action(action).ok_or_else(|| KeymapError::UnknownAction {
            key: key.to_string(),
            action: action.to_string(),
        })?;

        self.bindings.insert(key.to_lowercase(), token);
        Ok(())
    }

    /// Token for `key`, if any.
    pub fn resolve(&self, key: &str) -> Option<Token> {
        if let Some(token) = self.bindings.get(&key.to_lowercase()) {
            return Some(*token);
        }

        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Token::from_char(c),
            _ => None,
        }
    }

    /// Split a word into keys: the word itself if it is bound, otherwise
    /// one key per character (`12+3=`).
    pub fn split_keys(&self, word: &str) -> Vec<String> {
        if self.bindings.contains_key(&word.to_lowercase()) {
            return vec![word.to_string()];
        }

        word.chars().map(String::from).collect()
    }
}
