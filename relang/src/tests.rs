//! Property-based tests cross-checking the pipeline against an
//! independent oracle (the `regex` crate) and the universal properties
//! every emitted table must satisfy.

use proptest::prelude::*;

use crate::alphabet::Alphabet;
use crate::checker::{check, parse_tests, CheckOutcome};
use crate::dfa::Dfa;
use crate::dfa_spec;
use crate::regex as relang_regex;
use crate::table::{parse_table, write_table};

const TEST_ALPHABET: &str = "ab";

/// A small AST used only to generate random regex source strings for
/// property testing; the production compiler never builds one of these,
/// it goes straight from postfix tokens to an NFA.
#[derive(Debug, Clone)]
enum GenRegex {
    Sym(u8),
    Epsilon,
    Union(Box<GenRegex>, Box<GenRegex>),
    Concat(Box<GenRegex>, Box<GenRegex>),
    Star(Box<GenRegex>),
}

impl GenRegex {
    /// Renders in this crate's grammar (`|` for union, `<eps>` for ε).
    fn to_source(&self) -> String {
        match self {
            GenRegex::Sym(b) => (*b as char).to_string(),
            GenRegex::Epsilon => "<eps>".to_string(),
            GenRegex::Union(a, b) => format!("({}|{})", a.to_source(), b.to_source()),
            GenRegex::Concat(a, b) => format!("{}{}", a.to_source(), b.to_source()),
            GenRegex::Star(a) => format!("({})*", a.to_source()),
        }
    }

    /// Renders as a pattern the `regex` crate accepts, anchored, with ε
    /// spelled as an empty alternation branch.
    fn to_oracle_pattern(&self) -> String {
        let body = match self {
            GenRegex::Sym(b) => regex::escape(&(*b as char).to_string()),
            GenRegex::Epsilon => String::new(),
            GenRegex::Union(a, b) => format!(
                "(?:{}|{})",
                a.to_oracle_pattern(),
                b.to_oracle_pattern()
            ),
            GenRegex::Concat(a, b) => format!("{}{}", a.to_oracle_pattern(), b.to_oracle_pattern()),
            GenRegex::Star(a) => format!("(?:{})*", a.to_oracle_pattern()),
        };
        format!("^(?:{body})$")
    }
}

fn gen_regex() -> impl Strategy<Value = GenRegex> {
    let leaf = prop_oneof![
        Just(GenRegex::Sym(b'a')),
        Just(GenRegex::Sym(b'b')),
        Just(GenRegex::Epsilon),
    ];
    leaf.prop_recursive(6, 32, 4, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| GenRegex::Union(Box::new(a), Box::new(b))),
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| GenRegex::Concat(Box::new(a), Box::new(b))),
            inner.prop_map(|a| GenRegex::Star(Box::new(a))),
        ]
    })
}

fn test_strings() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(prop_oneof![Just(b'a'), Just(b'b')], 0..8)
}

fn minimized(src: &str, alphabet: &Alphabet) -> Dfa {
    let nfa = relang_regex::compile(src, alphabet).expect("generated regex must compile");
    nfa.to_dfa(alphabet).minimize()
}

proptest! {
    /// Property 3: behavioral equivalence between the minimized DFA and
    /// the source regex, witnessed against an independent oracle.
    #[test]
    fn matches_regex_crate_oracle(gen in gen_regex(), inputs in proptest::collection::vec(test_strings(), 1..6)) {
        let alphabet = Alphabet::parse_plain(TEST_ALPHABET).unwrap();
        let dfa = minimized(&gen.to_source(), &alphabet);
        let oracle = regex::Regex::new(&gen.to_oracle_pattern()).unwrap();

        for input in inputs {
            let s: String = input.iter().map(|&b| b as char).collect();
            prop_assert_eq!(dfa.accepts(&input), oracle.is_match(&s));
        }
    }

    /// Property 1: every emitted table is total — every (state, symbol)
    /// cell is defined and in range.
    #[test]
    fn minimized_dfa_is_total(gen in gen_regex()) {
        let alphabet = Alphabet::parse_plain(TEST_ALPHABET).unwrap();
        let dfa = minimized(&gen.to_source(), &alphabet);
        for row in dfa.rows() {
            prop_assert_eq!(row.len(), alphabet.len());
            for &cell in row {
                prop_assert!(cell < dfa.state_count());
            }
        }
    }

    /// Property 6: the alphabet emitted equals the distinct, kept bytes
    /// from the input in first-seen order.
    #[test]
    fn alphabet_is_preserved_in_first_seen_order(noise in "[ab,; ]{0,12}") {
        let parsed = Alphabet::parse_line(&format!("a,b{noise}"));
        if let Ok(a) = parsed {
            prop_assert!(a.symbols() == b"ab" || a.symbols() == b"a" || a.symbols() == b"b");
        }
    }

    /// Property 4/5: checker symmetry and reflexivity over a random test
    /// set drawn from the same alphabet.
    #[test]
    fn checker_is_reflexive_and_symmetric(gen_ref in gen_regex(), gen_user in gen_regex(), inputs in proptest::collection::vec(test_strings(), 1..6)) {
        let alphabet = Alphabet::parse_plain(TEST_ALPHABET).unwrap();
        let dfa_ref = minimized(&gen_ref.to_source(), &alphabet);
        let dfa_user = minimized(&gen_user.to_source(), &alphabet);

        let lines: String = inputs
            .iter()
            .map(|w| {
                let s: String = w.iter().map(|&b| b as char).collect();
                let label = if dfa_ref.accepts(w) { "1" } else { "0" };
                let token = if s.is_empty() { "<eps>".to_string() } else { s };
                format!("{label} {token}\n")
            })
            .collect();
        let tests = parse_tests(&lines, &alphabet).unwrap();

        let reflexive = check(&dfa_ref, &dfa_ref, &tests).unwrap();
        prop_assert!(matches!(reflexive.outcome, CheckOutcome::Pass { .. }));

        let forward = check(&dfa_ref, &dfa_user, &tests).unwrap();
        let backward = check(&dfa_user, &dfa_ref, &tests).unwrap();
        match (forward.outcome, backward.outcome) {
            (CheckOutcome::Pass { .. }, CheckOutcome::Pass { .. }) => {}
            (CheckOutcome::Mismatch { .. }, CheckOutcome::Mismatch { .. }) => {}
            other => prop_assert!(false, "checker symmetry violated: {other:?}"),
        }
    }

    /// Property 2: a minimized table re-parsed and re-minimized is
    /// unchanged (up to the same canonical class numbering).
    #[test]
    fn minimization_is_idempotent(gen in gen_regex()) {
        let alphabet = Alphabet::parse_plain(TEST_ALPHABET).unwrap();
        let once = minimized(&gen.to_source(), &alphabet);
        let text = write_table(&once);
        let reparsed = parse_table(&text).unwrap();
        let twice = reparsed.minimize();
        prop_assert_eq!(once.state_count(), twice.state_count());
        prop_assert_eq!(once.rows().to_vec(), twice.rows().to_vec());
        prop_assert_eq!(once.accepting_states(), twice.accepting_states());
    }
}

#[test]
fn end_to_end_scenario_a_star_b_star() {
    let alphabet = Alphabet::parse_plain("ab").unwrap();
    let dfa = minimized("a*b*", &alphabet);
    let tests = parse_tests("1 <eps>\n1 a\n1 b\n1 aabb\n0 ba\n", &alphabet).unwrap();
    let report = check(&dfa, &dfa, &tests).unwrap();
    assert_eq!(report.outcome, CheckOutcome::Pass { count: 5 });
}

#[test]
fn end_to_end_scenario_dfa_spec_matches_regex_reference() {
    let alphabet = Alphabet::parse_plain("ab").unwrap();
    let reference = minimized("(a|b)*abb", &alphabet);
    let spec = "\
Start: q0
Accept: {q3}
(q0,a)->q1
(q0,b)->q0
(q1,a)->q1
(q1,b)->q2
(q2,a)->q1
(q2,b)->q3
(q3,a)->q1
(q3,b)->q0
";
    let user = dfa_spec::compile(spec, &alphabet).unwrap();
    let tests = parse_tests(
        "0 <eps>\n0 a\n0 ab\n1 abb\n1 aabb\n1 babb\n0 abba\n",
        &alphabet,
    )
    .unwrap();
    let report = check(&reference, &user, &tests).unwrap();
    assert_eq!(report.outcome, CheckOutcome::Pass { count: 7 });
}

#[test]
fn end_to_end_scenario_mismatch_on_first_divergent_line() {
    let alphabet = Alphabet::parse_plain("ab").unwrap();
    let reference = minimized("a*", &alphabet);
    let user = minimized("a", &alphabet);
    let tests = parse_tests("1 <eps>\n1 aa\n", &alphabet).unwrap();
    let report = check(&reference, &user, &tests).unwrap();
    match report.outcome {
        CheckOutcome::Mismatch { lineno, .. } => assert_eq!(lineno, 2),
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[test]
fn end_to_end_scenario_incomplete_spec_accepts_epsilon_reference_does_not() {
    let alphabet = Alphabet::parse_plain("ab").unwrap();
    let reference = minimized("a|b", &alphabet);
    let user = dfa_spec::compile("Start: q0\nAccept: {q0}\n", &alphabet).unwrap();
    let tests = parse_tests("0 <eps>\n1 a\n", &alphabet).unwrap();
    let report = check(&reference, &user, &tests).unwrap();
    match report.outcome {
        CheckOutcome::Mismatch {
            lineno,
            reference_accepts,
            user_accepts,
            ..
        } => {
            assert_eq!(lineno, 1);
            assert!(!reference_accepts);
            assert!(user_accepts);
        }
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[test]
fn end_to_end_scenario_epsilon_token_and_plus_union_agree() {
    let alphabet = Alphabet::parse_plain("a").unwrap();
    let reference = minimized("<eps>|a", &alphabet);
    let user = minimized("<eps>+a", &alphabet);
    let tests = parse_tests("1 <eps>\n1 a\n0 aa\n", &alphabet).unwrap();
    let report = check(&reference, &user, &tests).unwrap();
    assert_eq!(report.outcome, CheckOutcome::Pass { count: 3 });
}

#[test]
fn end_to_end_scenario_ab_star_minimizes_to_three_states() {
    let alphabet = Alphabet::parse_plain("ab").unwrap();
    let dfa = minimized("(ab)*", &alphabet);
    assert_eq!(dfa.state_count(), 3);
    assert!(dfa.accepts(b""));
    assert!(dfa.accepts(b"abab"));
    assert!(!dfa.accepts(b"a"));
    assert!(!dfa.accepts(b"aba"));
}
