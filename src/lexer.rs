//! Composes the regex parser, NFA→DFA converter, and minimizer into a
//! compact transition table, and scans input strings against it.
//!
//! The factory builds one master NFA by ε-joining each rule's pattern NFA to
//! a fresh start state, tracks each rule's own accepting states as its own
//! partition block, and converts/minimizes through that partition so later
//! lookups can still tell which rule a given DFA state belongs to. The
//! scanner's `next()` tracks the most recent accepting position and category
//! seen while advancing (`success_pos`/`success_category`), implementing
//! longest-match with earliest-rule-wins tie-breaking.

use crate::automaton::{Automaton, Partition, StateId, Symbol};
use crate::convert::nfa_to_dfa;
use crate::error::SyntaxError;
use crate::minimize::minimize;
use crate::regex;
use std::collections::{BTreeSet, HashMap};

/// An immutable, shareable compiled lexer. Construction is the only
/// fallible operation; a successfully constructed factory never exposes a
/// partially-built state.
///
/// `LexerFactory` is `Send + Sync` whenever `C` is, since it holds no
/// interior mutability — every `Lexer` scanning against it owns its own
/// mutable position.
pub struct LexerFactory<C> {
    transitions: Vec<HashMap<char, StateId>>,
    categories: Vec<Option<C>>,
}

impl<C: Clone> LexerFactory<C> {
    /// Compiles an ordered rule list into a single table-driven lexer.
    /// Rule order is priority order: on a length tie, the earlier rule wins.
    ///
    /// ```
    /// use lexgen::lexer::LexerFactory;
    ///
    /// #[derive(Clone, Debug, PartialEq)]
    /// enum Token { Keyword, Ident }
    ///
    /// let factory = LexerFactory::compile([
    ///     ("ab|ac", Token::Keyword),
    ///     ("[a-c]+", Token::Ident),
    /// ]).unwrap();
    /// let mut lexer = factory.scanner("ab");
    /// assert_eq!(lexer.next(), (Some(Token::Keyword), "ab"));
    /// assert_eq!(lexer.next(), (None, ""));
    /// ```
    pub fn compile<'r, I>(rules: I) -> Result<LexerFactory<C>, SyntaxError>
    where
        I: IntoIterator<Item = (&'r str, C)>,
    {
        let rules: Vec<(&str, C)> = rules.into_iter().collect();

        let mut master = Automaton::new();
        let mut partition: Partition = Vec::with_capacity(rules.len());
        for (pattern, _) in &rules {
            let sub = regex::compile(pattern)?;
            let offset = master.combine(&sub);
            master.add_epsilon(0, offset);
            let rule_states: BTreeSet<StateId> =
                sub.accepting_set().iter().map(|s| s + offset).collect();
            partition.push(rule_states);
        }

        let (dfa, dfa_partition) = nfa_to_dfa(&master, &partition);
        let (min_dfa, min_partition) = minimize(&dfa, &dfa_partition);

        let n = min_dfa.state_count();
        let mut transitions = vec![HashMap::new(); n];
        for (state, row) in transitions.iter_mut().enumerate() {
            for t in min_dfa.transitions(state) {
                if let Symbol::Char(c) = t.symbol {
                    row.insert(c, t.target);
                }
            }
        }

        // Only set a state's category the first time a rule claims it. Rule
        // blocks are disjoint after minimization, so this never overwrites a
        // category already assigned; it's a belt-and-braces priority rule.
        let mut categories: Vec<Option<C>> = vec![None; n];
        for (rule_idx, rule_states) in min_partition.iter().enumerate() {
            for &state in rule_states {
                if categories[state].is_none() {
                    categories[state] = Some(rules[rule_idx].1.clone());
                }
            }
        }

        Ok(LexerFactory {
            transitions,
            categories,
        })
    }

    /// Creates a scanner over `input`. The factory may be shared across any
    /// number of scanners, including concurrently from multiple threads.
    pub fn scanner<'f, 'i>(&'f self, input: &'i str) -> Lexer<'f, 'i, C> {
        Lexer::new(self, input)
    }
}

/// A scanning cursor over one input string, borrowed from a [`LexerFactory`].
///
/// Holds the only mutable state in the system: the current scan position.
pub struct Lexer<'f, 'i, C> {
    factory: &'f LexerFactory<C>,
    buf: &'i str,
    chars: Vec<char>,
    /// Byte offset of each character boundary; `boundaries[i]` is the byte
    /// offset of `chars[i]`, and `boundaries[chars.len()]` is `buf.len()`.
    /// Precomputed once so slicing by character position stays zero-copy.
    boundaries: Vec<usize>,
    pos: usize,
}

impl<'f, 'i, C: Clone> Lexer<'f, 'i, C> {
    fn new(factory: &'f LexerFactory<C>, input: &'i str) -> Self {
        let mut lexer = Lexer {
            factory,
            buf: input,
            chars: Vec::new(),
            boundaries: Vec::new(),
            pos: 0,
        };
        lexer.reset(input);
        lexer
    }

    /// Rebinds this scanner to a fresh input, resetting its position to 0.
    pub fn reset(&mut self, input: &'i str) {
        self.buf = input;
        self.chars = input.chars().collect();
        self.boundaries = Vec::with_capacity(self.chars.len() + 1);
        let mut offset = 0;
        for c in &self.chars {
            self.boundaries.push(offset);
            offset += c.len_utf8();
        }
        self.boundaries.push(offset);
        self.pos = 0;
    }

    /// Current position, in characters (not bytes), into the input.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Scans the longest prefix of the remaining input that reaches an
    /// accepting state, breaking length ties by rule priority. Returns
    /// `(None, "")` at end of input, or when the character at the current
    /// position starts no valid token; callers distinguish the two by
    /// comparing `pos()` against the input's character length.
    pub fn next(&mut self) -> (Option<C>, &'i str) {
        let len = self.chars.len();
        let mut state = 0;
        let mut success_pos = self.pos;
        let mut success_category: Option<C> = None;

        let mut cur = self.pos;
        while cur < len {
            let c = self.chars[cur];
            match self.factory.transitions[state].get(&c) {
                Some(&next_state) => {
                    state = next_state;
                    if let Some(category) = &self.factory.categories[state] {
                        success_pos = cur + 1;
                        success_category = Some(category.clone());
                    }
                }
                None => break,
            }
            cur += 1;
        }

        let matched = &self.buf[self.boundaries[self.pos]..self.boundaries[success_pos]];
        self.pos = success_pos;
        (success_category, matched)
    }
}
