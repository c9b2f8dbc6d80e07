//! Clipboard access for copying the display and pasting operands.

use anyhow::{Context, Result};
use arboard::Clipboard;

/// Copy text to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;

    clipboard
        .set_text(text.to_string())
        .context("Failed to copy to clipboard")
}

/// Read the current text contents of the system clipboard.
pub fn read_from_clipboard() -> Result<String> {
    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;

    clipboard
        .get_text()
        .context("Failed to read from clipboard")
}
