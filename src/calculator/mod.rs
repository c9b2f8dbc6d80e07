//! Calculator module: the running-total expression engine.
//!
//! This module provides:
//! - Typed input tokens and the ordered operation buffer
//! - The token-driven engine producing a display after every input
//! - Clipboard helpers for copying the display and pasting operands

mod buffer;
mod clipboard;
mod detection;
mod display;
mod engine;
mod error;
mod token;

pub use buffer::{Entry, Operand, OperationBuffer};
pub use clipboard::{copy_to_clipboard, read_from_clipboard};
pub use detection::{is_numeric_literal, normalize_literal};
pub use display::{DisplayValue, ERROR_MARKER, format_number};
pub use engine::{EngineSnapshot, ExpressionEngine};
pub use error::EngineError;
pub use token::{Operator, Token};
