//! Crate-wide property and differential tests.
//!
//! A recursive regex generator produces arbitrary syntactically valid
//! patterns, which are run through every pipeline stage and also checked
//! against the `regex` crate as a trusted oracle over the supported syntax
//! subset (char, sequence, alternation, `*`/`+`/`?`, bracketed ranges).

use crate::automaton::Automaton;
use crate::convert::{nfa_accepts, nfa_to_dfa};
use crate::minimize::minimize;
use crate::regex as our_regex;
use proptest::prelude::*;
use regex::Regex as LibRegex;

const ALPHABET: &[char] = &['a', 'b', 'c', 'd'];

fn arb_leaf() -> impl Strategy<Value = String> {
    prop::sample::select(ALPHABET).prop_map(|c| c.to_string())
}

prop_compose! {
    fn arb_range()(mut chars in prop::collection::vec(prop::sample::select(ALPHABET), 1..=2)) -> String {
        chars.sort_unstable();
        chars.dedup();
        format!("[{}]", chars.into_iter().collect::<String>())
    }
}

fn arb_regex() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![arb_leaf(), arb_range()];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            // sequence of 1-3 sub-patterns
            prop::collection::vec(inner.clone(), 1..=3).prop_map(|v| v.concat()),
            // alternation
            prop::collection::vec(inner.clone(), 2..=3)
                .prop_map(|v| format!("({})", v.join("|"))),
            // quantified
            (inner.clone(), prop::sample::select(&["*", "+", "?"][..]))
                .prop_map(|(s, q)| format!("({s}){q}")),
        ]
    })
}

/// Builds a single-rule minimized DFA for `pattern`, returning it alongside
/// the NFA it was converted from (for round-trip comparisons).
fn compile_stages(pattern: &str) -> (Automaton, Automaton, Automaton) {
    let nfa = our_regex::compile(pattern).expect("generator only produces valid patterns");
    let partition = vec![nfa.accepting_set()];
    let (dfa, dfa_partition) = nfa_to_dfa(&nfa, &partition);
    let (min_dfa, _) = minimize(&dfa, &dfa_partition);
    (nfa, dfa, min_dfa)
}

fn sample_strings(alphabet: &[char]) -> Vec<String> {
    let mut out = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..4 {
        let mut next = Vec::new();
        for s in &frontier {
            for c in alphabet {
                let mut t = s.clone();
                t.push(*c);
                out.push(t.clone());
                next.push(t);
            }
        }
        frontier = next;
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// `convert` never invents or drops acceptance: the DFA and the NFA it
    /// came from agree on every short test string.
    #[test]
    fn nfa_to_dfa_round_trip(pattern in arb_regex()) {
        let (nfa, dfa, _) = compile_stages(&pattern);
        for s in sample_strings(ALPHABET) {
            prop_assert_eq!(nfa_accepts(&nfa, &s), nfa_accepts(&dfa, &s));
        }
    }

    /// `minimize` never changes the recognized language.
    #[test]
    fn minimize_round_trip(pattern in arb_regex()) {
        let (_, dfa, min_dfa) = compile_stages(&pattern);
        for s in sample_strings(ALPHABET) {
            prop_assert_eq!(nfa_accepts(&dfa, &s), nfa_accepts(&min_dfa, &s));
        }
    }

    /// Minimizing an already-minimal DFA changes nothing observable.
    #[test]
    fn minimize_is_idempotent(pattern in arb_regex()) {
        let (_, _, min_dfa) = compile_stages(&pattern);
        let partition = vec![min_dfa.accepting_set()];
        let (min_dfa_2, _) = minimize(&min_dfa, &partition);
        for s in sample_strings(ALPHABET) {
            prop_assert_eq!(nfa_accepts(&min_dfa, &s), nfa_accepts(&min_dfa_2, &s));
        }
    }

    /// Differential oracle: for every pattern our recursive-descent grammar
    /// accepts, the compiled-and-minimized DFA agrees with the `regex`
    /// crate's anchored match, over a supported syntax subset (char,
    /// sequence, alternation, star/plus/opt, bracketed char classes).
    #[test]
    fn agrees_with_regex_crate(pattern in arb_regex()) {
        let (_, _, min_dfa) = compile_stages(&pattern);
        let anchored = format!("^(?:{pattern})$");
        let lib_regex = LibRegex::new(&anchored).expect("generator only produces valid regex-crate syntax too");
        for s in sample_strings(ALPHABET) {
            prop_assert_eq!(nfa_accepts(&min_dfa, &s), lib_regex.is_match(&s));
        }
    }

    /// Two independently compiled rules never bleed into each other's
    /// partition block after minimization, regardless of pattern shape.
    #[test]
    fn rule_priority_preserved_for_arbitrary_rule_pairs(
        a in arb_regex(),
        b in arb_regex(),
    ) {
        let nfa_a = our_regex::compile(&a).unwrap();
        let nfa_b = our_regex::compile(&b).unwrap();
        let mut master = Automaton::new();
        let offset_a = master.combine(&nfa_a);
        master.add_epsilon(0, offset_a);
        let f0: std::collections::BTreeSet<usize> =
            nfa_a.accepting_set().iter().map(|s| s + offset_a).collect();
        let offset_b = master.combine(&nfa_b);
        master.add_epsilon(0, offset_b);
        let f1: std::collections::BTreeSet<usize> =
            nfa_b.accepting_set().iter().map(|s| s + offset_b).collect();

        let (dfa, dfa_partition) = nfa_to_dfa(&master, &vec![f0, f1]);
        let (_, min_partition) = minimize(&dfa, &dfa_partition);
        let overlap: Vec<_> = min_partition[0].intersection(&min_partition[1]).collect();
        prop_assert!(overlap.is_empty());
    }
}

#[test]
fn escape_table_matches_source_quirk_exactly() {
    // `\n` and `\r` both map to carriage return; this is intentional, not a
    // bug to silently fix.
    let cr = our_regex::compile("\\n").unwrap();
    assert!(nfa_accepts(&cr, "\r"));
    assert!(!nfa_accepts(&cr, "\n"));
}

#[test]
fn syntax_error_reports_character_position_not_byte_position() {
    let err = our_regex::compile("é+*").unwrap_err();
    assert_eq!(err.position, 2);
}
