//! Partition-refinement DFA minimization, preserving the labeled acceptance
//! partition so rule priority survives minimization.
//!
//! A triangular `combinable[i][j]` table is seeded by separating states that
//! belong to different rules (or no rule at all) up front; a dependency
//! table, `affect`, records which other pairs' combinability rests on a given
//! pair so that marking one pair non-combinable propagates transitively.
//! States still marked combinable once this settles are unioned via
//! [`crate::union_find`] and relabeled into sequential block IDs in a single
//! scan. This is the quadratic (Moore-style) formulation rather than
//! Hopcroft's partition-splitting algorithm; either is valid here, and the
//! quadratic marker makes the rule-priority seeding — the part that actually
//! matters for a lexer — direct to state and to check.

use crate::automaton::{Automaton, Partition, StateId};
use crate::union_find::UnionFind;
use std::collections::{BTreeSet, HashMap};

fn pair(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

fn symbol_set(dfa: &Automaton, state: StateId) -> BTreeSet<char> {
    dfa.transitions(state)
        .iter()
        .filter_map(|t| match t.symbol {
            crate::automaton::Symbol::Char(c) => Some(c),
            crate::automaton::Symbol::Epsilon => None,
        })
        .collect()
}

fn target_on(dfa: &Automaton, state: StateId, symbol: char) -> Option<StateId> {
    dfa.transitions(state)
        .iter()
        .find(|t| t.symbol == crate::automaton::Symbol::Char(symbol))
        .map(|t| t.target)
}

fn mark(
    i: usize,
    j: usize,
    combinable: &mut [Vec<bool>],
    affect: &HashMap<(usize, usize), Vec<(usize, usize)>>,
) {
    let (i, j) = pair(i, j);
    if !combinable[i][j] {
        return;
    }
    combinable[i][j] = false;
    if let Some(deps) = affect.get(&(i, j)) {
        let deps = deps.clone();
        for (x, y) in deps {
            mark(x, y, combinable, affect);
        }
    }
}

fn process_state(
    i: usize,
    j: usize,
    dfa: &Automaton,
    combinable: &mut [Vec<bool>],
    affect: &mut HashMap<(usize, usize), Vec<(usize, usize)>>,
) {
    let syms_i = symbol_set(dfa, i);
    let syms_j = symbol_set(dfa, j);
    if syms_i != syms_j {
        mark(i, j, combinable, affect);
        return;
    }
    for v in syms_i {
        let di = target_on(dfa, i, v).expect("symbol in symbol_set must have a target");
        let dj = target_on(dfa, j, v).expect("symbol in symbol_set must have a target");
        let (x, y) = pair(di, dj);
        if x == y {
            continue;
        }
        if !combinable[x][y] {
            mark(i, j, combinable, affect);
            return;
        }
        affect.entry((x, y)).or_default().push((i, j));
    }
}

/// Block index of state `s`: its rule index if `s` is accepting, or `k`
/// (one past the last rule) if `s` is non-accepting. Seeding the initial
/// partition by this value is what keeps states of different rules from
/// ever merging.
fn initial_block(partition: &Partition, s: StateId) -> usize {
    partition
        .iter()
        .position(|rule_states| rule_states.contains(&s))
        .unwrap_or(partition.len())
}

/// Minimizes `dfa`, returning the minimized automaton together with its
/// relabeled partition.
pub fn minimize(dfa: &Automaton, partition: &Partition) -> (Automaton, Partition) {
    let n = dfa.state_count();
    let blocks: Vec<usize> = (0..n).map(|s| initial_block(partition, s)).collect();

    let mut combinable = vec![vec![true; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            if blocks[i] != blocks[j] {
                combinable[i][j] = false;
            }
        }
    }

    let mut affect: HashMap<(usize, usize), Vec<(usize, usize)>> = HashMap::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if combinable[i][j] {
                process_state(i, j, dfa, &mut combinable, &mut affect);
            }
        }
    }

    let mut uf = UnionFind::new(n);
    for i in 0..n {
        for j in (i + 1)..n {
            if combinable[i][j] {
                uf.union(i, j);
            }
        }
    }

    let mut next_id = 0usize;
    let mut rep_to_new: HashMap<usize, usize> = HashMap::new();
    let mut new_index = vec![0usize; n];
    for (i, slot) in new_index.iter_mut().enumerate() {
        let rep = uf.find(i);
        let id = *rep_to_new.entry(rep).or_insert_with(|| {
            let id = next_id;
            next_id += 1;
            id
        });
        *slot = id;
    }

    let mut min_dfa = Automaton::new();
    for _ in 1..next_id {
        min_dfa.add_state();
    }
    let mut copied = vec![false; next_id];
    for i in 0..n {
        let b = new_index[i];
        if copied[b] {
            continue;
        }
        copied[b] = true;
        for t in dfa.transitions(i) {
            min_dfa.add_transition(b, new_index[t.target], t.symbol);
        }
    }

    let mut new_partition: Partition = Vec::with_capacity(partition.len());
    for rule_states in partition {
        let mapped: BTreeSet<StateId> = rule_states.iter().map(|&q| new_index[q]).collect();
        new_partition.push(mapped);
    }
    for rule_states in &new_partition {
        for &state in rule_states {
            min_dfa.add_accepting(state);
        }
    }

    (min_dfa, new_partition)
}
