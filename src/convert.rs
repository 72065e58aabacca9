//! NFA → DFA conversion via ε-closure subset construction, threading a
//! labeled acceptance partition through the rewrite so rule priority survives.
//!
//! Each DFA state is a canonical set of NFA states, deduplicated through a
//! worklist keyed by that set; DFA state 0 is always the start state's own
//! closure. Acceptance isn't a single set but a list of rule partitions, so
//! that after conversion each reachable subset can still be traced back to
//! the earliest rule it satisfies.

use crate::automaton::{Automaton, Partition, StateId, Symbol};
use std::collections::{BTreeSet, HashMap, VecDeque};

type StateSet = BTreeSet<StateId>;

/// Computes, for every state, the set of states reachable via zero or more
/// ε-transitions (including itself), by fixed-point iteration.
fn epsilon_closures(nfa: &Automaton) -> Vec<StateSet> {
    let n = nfa.state_count();
    let mut closures: Vec<StateSet> = (0..n).map(|s| BTreeSet::from([s])).collect();
    let mut changed = true;
    while changed {
        changed = false;
        for s in 0..n {
            let additions: Vec<StateId> = closures[s]
                .iter()
                .flat_map(|&member| {
                    nfa.transitions(member)
                        .iter()
                        .filter(|t| t.symbol.is_epsilon())
                        .map(|t| t.target)
                })
                .filter(|target| !closures[s].contains(target))
                .collect();
            if !additions.is_empty() {
                closures[s].extend(additions);
                changed = true;
            }
        }
    }
    closures
}

fn closure_of_set(closures: &[StateSet], states: &StateSet) -> StateSet {
    states.iter().flat_map(|&s| closures[s].iter().copied()).collect()
}

/// `move(S, v)`: every closure-extended destination reachable from a state
/// in `S` via a transition on `v`.
fn move_set(nfa: &Automaton, closures: &[StateSet], states: &StateSet, symbol: char) -> StateSet {
    let direct: StateSet = states
        .iter()
        .flat_map(|&s| {
            nfa.transitions(s)
                .iter()
                .filter(|t| t.symbol == Symbol::Char(symbol))
                .map(|t| t.target)
        })
        .collect();
    closure_of_set(closures, &direct)
}

fn outgoing_symbols(nfa: &Automaton, states: &StateSet) -> BTreeSet<char> {
    states
        .iter()
        .flat_map(|&s| {
            nfa.transitions(s).iter().filter_map(|t| match t.symbol {
                Symbol::Char(c) => Some(c),
                Symbol::Epsilon => None,
            })
        })
        .collect()
}

/// The rule priority of a subset: the smallest `i` such that the subset
/// intersects `partition[i]`, or `None` if it intersects no rule's set.
fn label_of(partition: &Partition, subset: &StateSet) -> Option<usize> {
    partition
        .iter()
        .position(|rule_states| !rule_states.is_disjoint(subset))
}

/// Converts `nfa` to an equivalent DFA, returning the DFA together with its
/// relabeled partition: `F'_i = { dfa_state(P) : P ∩ Fᵢ ≠ ∅ ∧ ∀j<i, P ∩ Fⱼ = ∅ }`.
pub fn nfa_to_dfa(nfa: &Automaton, partition: &Partition) -> (Automaton, Partition) {
    let closures = epsilon_closures(nfa);
    let start_set = closures[0].clone();

    let mut index_of: HashMap<StateSet, StateId> = HashMap::new();
    let mut subsets: Vec<StateSet> = Vec::new();
    index_of.insert(start_set.clone(), 0);
    subsets.push(start_set.clone());

    let mut work: VecDeque<StateSet> = VecDeque::new();
    work.push_back(start_set);

    // (src subset index, symbol, dst subset)
    let mut edges: Vec<(StateId, char, StateSet)> = Vec::new();

    while let Some(current) = work.pop_front() {
        let src_idx = index_of[&current];
        for symbol in outgoing_symbols(nfa, &current) {
            let dst = move_set(nfa, &closures, &current, symbol);
            if dst.is_empty() {
                continue;
            }
            if !index_of.contains_key(&dst) {
                let idx = subsets.len();
                index_of.insert(dst.clone(), idx);
                subsets.push(dst.clone());
                work.push_back(dst.clone());
            }
            edges.push((src_idx, symbol, dst));
        }
    }

    let mut dfa = Automaton::new();
    for _ in 1..subsets.len() {
        dfa.add_state();
    }
    for (src_idx, symbol, dst) in &edges {
        let dst_idx = index_of[dst];
        dfa.add_transition(*src_idx, dst_idx, Symbol::Char(*symbol));
    }

    let mut output_partition: Partition = vec![BTreeSet::new(); partition.len()];
    for (idx, subset) in subsets.iter().enumerate() {
        if let Some(rule) = label_of(partition, subset) {
            output_partition[rule].insert(idx);
        }
    }
    for rule_states in &output_partition {
        for &state in rule_states {
            dfa.add_accepting(state);
        }
    }

    (dfa, output_partition)
}

/// Simulates `automaton` (treated as an NFA, so ε-transitions are honored)
/// over `input`, returning whether any accepting state is reached after
/// consuming the whole string. Used by tests and by the regex module's
/// doctests as a reference semantics independent of the DFA pipeline.
pub fn nfa_accepts(automaton: &Automaton, input: &str) -> bool {
    let closures = epsilon_closures(automaton);
    let mut current = closures[0].clone();
    for c in input.chars() {
        current = move_set(automaton, &closures, &current, c);
        if current.is_empty() {
            return false;
        }
    }
    let accepting = automaton.accepting_set();
    current.iter().any(|s| accepting.contains(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::compile;

    #[test]
    fn dfa_has_no_epsilon_transitions() {
        let nfa = compile("a*b|c+").unwrap();
        let partition = vec![nfa.accepting_set()];
        let (dfa, _) = nfa_to_dfa(&nfa, &partition);
        for state in 0..dfa.state_count() {
            for t in dfa.transitions(state) {
                assert!(!t.symbol.is_epsilon());
            }
        }
    }

    #[test]
    fn dfa_is_deterministic() {
        let nfa = compile("a*b|c+").unwrap();
        let partition = vec![nfa.accepting_set()];
        let (dfa, _) = nfa_to_dfa(&nfa, &partition);
        for state in 0..dfa.state_count() {
            let mut seen = std::collections::HashSet::new();
            for t in dfa.transitions(state) {
                assert!(seen.insert(t.symbol), "duplicate outgoing symbol");
            }
        }
    }

    #[test]
    fn start_state_is_zero() {
        let nfa = compile("ab").unwrap();
        let partition = vec![nfa.accepting_set()];
        let (dfa, out) = nfa_to_dfa(&nfa, &partition);
        assert!(nfa_accepts(&dfa, "ab"));
        assert!(!out[0].is_empty());
    }

    #[test]
    fn rule_priority_preserved_across_conversion() {
        let kw = compile("ab|ac").unwrap();
        let ident = compile("[a-c]+").unwrap();
        let mut master = Automaton::new();
        let offset_kw = master.combine(&kw);
        master.add_epsilon(0, offset_kw);
        let f0: BTreeSet<StateId> = kw.accepting_set().iter().map(|s| s + offset_kw).collect();
        let offset_ident = master.combine(&ident);
        master.add_epsilon(0, offset_ident);
        let f1: BTreeSet<StateId> = ident
            .accepting_set()
            .iter()
            .map(|s| s + offset_ident)
            .collect();

        let (dfa, out_partition) = nfa_to_dfa(&master, &vec![f0, f1]);
        // "ab" should end in a state labeled under rule 0 (KEYWORD), not rule 1.
        let closures = epsilon_closures(&dfa);
        let mut current = closures[0].clone();
        for c in "ab".chars() {
            current = move_set(&dfa, &closures, &current, c);
        }
        let reached = *current.iter().next().unwrap();
        assert!(out_partition[0].contains(&reached));
        assert!(!out_partition[1].contains(&reached));
    }
}
