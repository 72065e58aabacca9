//! Parses the surface regex syntax into an [`Automaton`] with exactly one
//! accepting state.
//!
//! Parsing is a two-phase pipeline: [`parser::parse_regex_tree`] builds a
//! small AST ([`RegexTree`]), and [`build`] walks it to splice together an
//! [`Automaton`] one combinator at a time (char, sequence, alternation, and
//! the three quantifiers).

mod parser;

use crate::automaton::{Automaton, Symbol};
use crate::error::SyntaxError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RegexTree {
    Char(char),
    /// One or more alternative (lo, hi) character ranges, inclusive. A bare
    /// char is represented as `(c, c)`. A range with `hi < lo` is kept as
    /// parsed and simply contributes no transitions when built.
    Range(Vec<(char, char)>),
    Sequence(Vec<RegexTree>),
    Alt(Vec<RegexTree>),
    Star(Box<RegexTree>),
    Plus(Box<RegexTree>),
    Opt(Box<RegexTree>),
}

/// A parsed regular expression, ready to be compiled into an automaton.
pub struct Regex {
    tree: RegexTree,
}

impl Regex {
    /// Parses `pattern` according to this crate's regex grammar.
    pub fn parse(pattern: &str) -> Result<Regex, SyntaxError> {
        let tree = parser::parse_regex_tree(pattern)?;
        Ok(Regex { tree })
    }

    /// Builds an automaton with exactly one accepting state recognizing this
    /// pattern's language.
    pub fn to_automaton(&self) -> Automaton {
        build(&self.tree)
    }
}

/// Parses and compiles `pattern` in one step.
pub fn compile(pattern: &str) -> Result<Automaton, SyntaxError> {
    Ok(Regex::parse(pattern)?.to_automaton())
}

fn build(tree: &RegexTree) -> Automaton {
    match tree {
        RegexTree::Char(c) => build_char(*c),
        RegexTree::Range(ranges) => build_range(ranges),
        RegexTree::Sequence(items) => build_sequence(items),
        RegexTree::Alt(branches) => build_alt(branches),
        RegexTree::Star(inner) => build_repeat(inner, true, true),
        RegexTree::Plus(inner) => build_repeat(inner, false, true),
        RegexTree::Opt(inner) => build_repeat(inner, true, false),
    }
}

fn build_char(c: char) -> Automaton {
    let mut a = Automaton::new();
    let accept = a.add_accepting_state();
    a.add_transition(0, accept, Symbol::Char(c));
    a
}

fn build_range(ranges: &[(char, char)]) -> Automaton {
    let mut a = Automaton::new();
    let accept = a.add_accepting_state();
    for &(lo, hi) in ranges {
        if hi < lo {
            continue;
        }
        let mut c = lo as u32;
        let hi = hi as u32;
        while c <= hi {
            if let Some(ch) = char::from_u32(c) {
                a.add_transition(0, accept, Symbol::Char(ch));
            }
            c += 1;
        }
    }
    a
}

/// Accumulates sub-automata left to right, collapsing the running accept
/// back to a single state after every splice so the invariant "accepting has
/// exactly one entry" holds at every step.
fn build_sequence(items: &[RegexTree]) -> Automaton {
    if items.is_empty() {
        let mut a = Automaton::new();
        a.add_accepting(0);
        return a;
    }
    let mut acc = build(&items[0]);
    let mut accept_state = acc.accepting()[0];
    for item in &items[1..] {
        let next = build(item);
        let next_accept = next.accepting()[0];
        let offset = acc.combine(&next);
        acc.add_epsilon(accept_state, offset);
        accept_state = offset + next_accept;
        acc.set_sole_accepting(accept_state);
    }
    acc
}

fn build_alt(branches: &[RegexTree]) -> Automaton {
    let mut a = Automaton::new();
    let shared_accept = a.add_accepting_state();
    for branch in branches {
        let sub = build(branch);
        let sub_accept = sub.accepting()[0];
        let offset = a.combine(&sub);
        a.add_epsilon(0, offset);
        a.add_epsilon(offset + sub_accept, shared_accept);
        a.set_sole_accepting(shared_accept);
    }
    a
}

fn build_repeat(inner: &RegexTree, allow_zero: bool, allow_many: bool) -> Automaton {
    let mut a = build(inner);
    let accept = a.accepting()[0];
    if allow_zero {
        a.add_epsilon(0, accept);
    }
    if allow_many {
        a.add_epsilon(accept, 0);
    }
    a
}
