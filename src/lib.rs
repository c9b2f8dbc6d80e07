//! zcalc: a running-total calculator engine.
//!
//! Input arrives one key at a time and the engine answers with what a
//! pocket calculator would show. See [`calculator::ExpressionEngine`].

pub mod calculator;
pub mod config;
pub mod keymap;
pub mod session;
