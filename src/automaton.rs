//! The mutable, arena-backed automaton graph shared by every compilation stage.
//!
//! An [`Automaton`] is a directed graph of [`State`]s, each holding an ordered
//! list of outgoing [`Transition`]s. State `0` is always the start state.
//! Acceptance is tracked as an ordered multiset of state indices rather than a
//! set, so that the regex builder's splicing operations (see
//! [`crate::regex`]) can append accepting states without losing the order
//! rule priority depends on.

use std::collections::BTreeSet;

/// A symbol consumed by a transition, or the distinguished epsilon value.
///
/// Epsilon transitions consume no input and are only ever present in NFAs;
/// every automaton produced by [`crate::convert::nfa_to_dfa`] is guaranteed
/// free of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    Char(char),
    Epsilon,
}

impl Symbol {
    pub fn is_epsilon(self) -> bool {
        matches!(self, Symbol::Epsilon)
    }
}

/// An index into [`Automaton::states`].
pub type StateId = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub target: StateId,
    pub symbol: Symbol,
}

#[derive(Clone, Debug, Default)]
pub struct State {
    pub transitions: Vec<Transition>,
}

/// An ordered list of disjoint sets of state indices, one set per rule,
/// indexed by rule priority (index 0 is the highest-priority rule).
///
/// A state appears in at most one member set.
pub type Partition = Vec<BTreeSet<StateId>>;

/// A directed graph of states with an ordered accepting multiset.
///
/// State 0 is always the start state; this invariant is maintained by every
/// operation below and by every transformation in [`crate::convert`] and
/// [`crate::minimize`].
#[derive(Clone, Debug)]
pub struct Automaton {
    states: Vec<State>,
    /// Ordered, possibly-duplicated list of accepting state indices.
    accepting: Vec<StateId>,
}

impl Default for Automaton {
    fn default() -> Self {
        Self::new()
    }
}

impl Automaton {
    /// A fresh automaton with a single, non-accepting start state.
    pub fn new() -> Self {
        Automaton {
            states: vec![State::default()],
            accepting: Vec::new(),
        }
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn accepting(&self) -> &[StateId] {
        &self.accepting
    }

    /// The accepting indices as a set, deduplicating any repeats introduced
    /// by splicing.
    pub fn accepting_set(&self) -> BTreeSet<StateId> {
        self.accepting.iter().copied().collect()
    }

    pub fn transitions(&self, state: StateId) -> &[Transition] {
        &self.states[state].transitions
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting.contains(&state)
    }

    /// Appends a fresh, non-accepting state and returns its index.
    pub fn add_state(&mut self) -> StateId {
        self.states.push(State::default());
        self.states.len() - 1
    }

    /// Records `state` as accepting. Duplicates are permitted; callers that
    /// append the same state twice (e.g. two alternation branches sharing an
    /// accept) get it twice in `accepting()`, which is harmless since
    /// consumers only ever look at `accepting_set()` or scan membership.
    pub fn add_accepting(&mut self, state: StateId) {
        debug_assert!(state < self.states.len());
        self.accepting.push(state);
    }

    /// `add_state` followed by `add_accepting`.
    pub fn add_accepting_state(&mut self) -> StateId {
        let s = self.add_state();
        self.add_accepting(s);
        s
    }

    /// Replaces the whole accepting list with the single state `state`.
    ///
    /// Used by the regex builder (see [`crate::regex`]) to restore the "has
    /// exactly one accepting state" invariant after `combine` has appended a
    /// spliced-in sub-automaton's own accepting entries.
    pub fn set_sole_accepting(&mut self, state: StateId) {
        self.accepting.clear();
        self.accepting.push(state);
    }

    /// Appends a transition `src --symbol--> dst`. No deduplication is
    /// performed; a duplicate transition is harmless and is absorbed for
    /// free by subset construction during NFA → DFA conversion.
    pub fn add_transition(&mut self, src: StateId, dst: StateId, symbol: Symbol) {
        debug_assert!(src < self.states.len());
        debug_assert!(dst < self.states.len());
        self.states[src].transitions.push(Transition {
            target: dst,
            symbol,
        });
    }

    pub fn add_epsilon(&mut self, src: StateId, dst: StateId) {
        self.add_transition(src, dst, Symbol::Epsilon);
    }

    /// Splices a deep copy of `other` into `self`: every state, transition
    /// destination, and accepting-list entry of the copy is shifted by
    /// `self`'s prior state count. Returns that count, i.e. the new index of
    /// `other`'s old state 0.
    pub fn combine(&mut self, other: &Automaton) -> StateId {
        let offset = self.states.len();
        for state in &other.states {
            let shifted = state
                .transitions
                .iter()
                .map(|t| Transition {
                    target: t.target + offset,
                    symbol: t.symbol,
                })
                .collect();
            self.states.push(State {
                transitions: shifted,
            });
        }
        self.accepting
            .extend(other.accepting.iter().map(|a| a + offset));
        offset
    }

    /// An independent deep copy.
    pub fn duplicate(&self) -> Automaton {
        self.clone()
    }

    /// Renders a graphviz `digraph` description of this automaton: one
    /// `shape="box"` declaration per accepting state, one labeled edge per
    /// transition, with `(eps)` as the literal label for epsilon edges.
    ///
    /// This exists purely for external debugging tools; it is never parsed
    /// back and is not exercised beyond a basic shape smoke test.
    pub fn graph_dump(&self) -> String {
        let mut out = String::from("digraph {\n");
        for &accept in self.accepting_set().iter() {
            out.push_str(&format!("\t{accept}[shape=\"box\"]\n"));
        }
        for (src, state) in self.states.iter().enumerate() {
            for t in &state.transitions {
                let label = match t.symbol {
                    Symbol::Epsilon => "(eps)".to_string(),
                    Symbol::Char(c) => c.to_string(),
                };
                out.push_str(&format!(
                    "\t{src} -> {dst} [label=\"{label}\"];\n",
                    dst = t.target
                ));
            }
        }
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_automaton_has_single_nonaccepting_state() {
        let a = Automaton::new();
        assert_eq!(a.state_count(), 1);
        assert!(a.accepting().is_empty());
    }

    #[test]
    fn combine_shifts_targets_and_accepting() {
        let mut a = Automaton::new();
        let s1 = a.add_accepting_state();
        a.add_transition(0, s1, Symbol::Char('a'));

        let mut b = Automaton::new();
        let t1 = b.add_accepting_state();
        b.add_transition(0, t1, Symbol::Char('b'));

        let offset = a.combine(&b);
        assert_eq!(offset, 2);
        assert_eq!(a.state_count(), 4);
        assert!(a.accepting_set().contains(&1));
        assert!(a.accepting_set().contains(&3));
        let spliced_transitions = a.transitions(offset);
        assert_eq!(spliced_transitions[0].target, 3);
    }

    #[test]
    fn graph_dump_marks_accepting_states_as_boxes() {
        let mut a = Automaton::new();
        let s1 = a.add_accepting_state();
        a.add_transition(0, s1, Symbol::Char('x'));
        let dump = a.graph_dump();
        assert!(dump.starts_with("digraph {\n"));
        assert!(dump.contains("1[shape=\"box\"]"));
        assert!(dump.contains("0 -> 1 [label=\"x\"];"));
        assert!(dump.trim_end().ends_with('}'));
    }
}
