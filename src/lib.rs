//! # lexgen
//!
//! `lexgen` compiles an ordered list of regex rules into a single
//! table-driven lexical analyzer. Given rules like
//!
//! ```
//! use lexgen::lexer::LexerFactory;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Token {
//!     Keyword,
//!     Ident,
//!     Space,
//! }
//!
//! let factory = LexerFactory::compile([
//!     ("ab|ac", Token::Keyword),
//!     ("[a-c]+", Token::Ident),
//!     (" +", Token::Space),
//! ])
//! .unwrap();
//!
//! let mut lexer = factory.scanner("ac ab");
//! assert_eq!(lexer.next(), (Some(Token::Keyword), "ac"));
//! assert_eq!(lexer.next(), (Some(Token::Space), " "));
//! assert_eq!(lexer.next(), (Some(Token::Keyword), "ab"));
//! assert_eq!(lexer.next(), (None, ""));
//! ```
//!
//! `next()` always returns the *longest* prefix of the remaining input that
//! reaches an accepting state; among rules that tie on length, the
//! earliest-listed rule wins. `"abc"` above is scanned as a single `Ident`
//! token even though `"ab"` would also match the `Keyword` rule, because
//! `[a-c]+` reaches one character further.
//!
//! The compilation pipeline underneath is the traditional one:
//!
//! - [`regex`] parses each pattern into an [`automaton::Automaton`] (an NFA)
//!   with ε-transitions, via recursive-descent parsing over a small regex
//!   grammar (literals, escapes, `[a-c]` ranges, grouping, alternation, and
//!   `*`/`+`/`?` quantifiers).
//! - [`convert::nfa_to_dfa`] removes ε-transitions with the classic
//!   ε-closure subset construction.
//! - [`minimize::minimize`] merges indistinguishable states.
//!
//! What makes this more than a textbook exercise is that every rule's
//! accepting states are tracked in their own partition block throughout both
//! rewrites, so that after minimization the lexer can still tell *which*
//! rule fired at any accepting state — and two states are never merged if
//! they accept for different rules, even though both are "accepting."
//!
//! [`automaton::Automaton`] also exposes [`automaton::Automaton::graph_dump`],
//! a `digraph { ... }` description suitable for an external graph-drawing
//! tool; it exists purely for debugging and isn't wired to any renderer here.

pub mod automaton;
pub mod convert;
pub mod error;
pub mod lexer;
pub mod minimize;
pub mod regex;
mod union_find;

pub use error::SyntaxError;
pub use lexer::{Lexer, LexerFactory};

#[cfg(test)]
mod tests;
