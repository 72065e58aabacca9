//! Error types surfaced by this crate.
//!
//! Regex compilation is the only fallible operation; everything downstream
//! (conversion, minimization, scanning) is total over well-formed automata.

use thiserror::Error;

/// A regex pattern failed to parse.
///
/// `position` is a **character** offset into the offending pattern (not a
/// byte offset), so it remains usable for caret-style diagnostics regardless
/// of multi-byte characters earlier in the string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (at position {position})")]
pub struct SyntaxError {
    pub message: String,
    pub position: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        SyntaxError {
            message: message.into(),
            position,
        }
    }
}
