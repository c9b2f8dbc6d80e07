//! Detection of plain numeric literals in pasted text.
//!
//! Only text that the engine could have produced by typing (an optional
//! leading minus, digits and at most one dot) is accepted.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `12`, `-3`, `4.`, `0.25`, `.5`
    static ref NUMERIC_LITERAL: Regex = Regex::new(
        r"^-?(\d+\.?\d*|\.\d+)$"
    ).unwrap();
}

/// Check if `input` is a number the calculator can take as an operand.
pub fn is_numeric_literal(input: &str) -> bool {
    NUMERIC_LITERAL.is_match(input)
}

/// Canonical form of a numeric literal: no redundant leading zeros and no
/// sign on a bare zero (`007` is `7`, `-0` is `0`, `.5` is `0.5`).
///
/// Expects input accepted by [`is_numeric_literal`]. A trailing dot and
/// fractional digits are kept as typed.
pub fn normalize_literal(input: &str) -> String {
    let (negative, unsigned) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (int_part, frac_part) = match unsigned.find('.') {
        Some(pos) => unsigned.split_at(pos),
        None => (unsigned, ""),
    };

    let int_part = match int_part.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };

    if negative && (int_part != "0" || !frac_part.is_empty()) {
        format!("-{}{}", int_part, frac_part)
    } else {
        format!("{}{}", int_part, frac_part)
    }
}
