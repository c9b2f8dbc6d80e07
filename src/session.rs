//! Line-oriented driver feeding keys into an engine.
//!
//! Each input line is either a command (`copy`, `paste`, `quit`) or a
//! whitespace-separated key sequence such as `12 + 3 =` or `12+3=`.

use crate::calculator::{
    DisplayValue, EngineSnapshot, ExpressionEngine, Token, copy_to_clipboard,
    read_from_clipboard,
};
use crate::keymap::Keymap;
use tracing::{info, warn};

/// A parsed input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Keys(Vec<String>),
    Copy,
    Paste,
    Quit,
}

impl Command {
    pub fn parse(line: &str, keymap: &Keymap) -> Self {
        match line.trim() {
            "copy" => Self::Copy,
            "paste" => Self::Paste,
            "quit" | "exit" => Self::Quit,
            keys => Self::Keys(
                keys.split_whitespace()
                    .flat_map(|word| keymap.split_keys(word))
                    .collect(),
            ),
        }
    }
}

/// Display after a single key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub key: String,
    pub display: DisplayValue,
}

/// An engine plus the bindings and options used to drive it.
pub struct Session {
    engine: ExpressionEngine,
    keymap: Keymap,
    copy_on_equals: bool,
}

impl Session {
    pub fn new(keymap: Keymap, copy_on_equals: bool) -> Self {
        Self {
            engine: ExpressionEngine::new(),
            keymap,
            copy_on_equals,
        }
    }

    pub fn display(&self) -> DisplayValue {
        self.engine.display()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.engine.snapshot()
    }

    /// Press each key in order, returning the display after every one.
    pub fn feed<S: AsRef<str>>(&mut self, keys: &[S]) -> Vec<Step> {
        let mut steps = Vec::with_capacity(keys.len());

        for key in keys {
            let key = key.as_ref();
            let display = self.engine.press(&self.keymap, key);

            if self.copy_on_equals && self.keymap.resolve(key) == Some(Token::Equals) {
                self.copy();
            }

            steps.push(Step {
                key: key.to_string(),
                display,
            });
        }

        steps
    }

    /// Run one input line. Returns `None` when the session should end.
    pub fn run_line(&mut self, line: &str) -> Option<Vec<Step>> {
        match Command::parse(line, &self.keymap) {
            Command::Keys(keys) => Some(self.feed(&keys)),
            Command::Copy => {
                self.copy();
                Some(Vec::new())
            }
            Command::Paste => {
                self.paste();
                Some(Vec::new())
            }
            Command::Quit => None,
        }
    }

    /// Copy the display to the clipboard. Failures are logged only.
    pub fn copy(&self) {
        let shown = self.engine.display();
        match copy_to_clipboard(shown.as_str()) {
            Ok(()) => info!(%shown, "copied to clipboard"),
            Err(e) => warn!("{:#}", e),
        }
    }

    /// Paste the clipboard text as the current operand.
    pub fn paste(&mut self) {
        match read_from_clipboard() {
            Ok(text) => {
                self.engine.paste(&text);
            }
            Err(e) => warn!("{:#}", e),
        }
    }
}
