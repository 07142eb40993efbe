//! Golden-fixture end-to-end tests: each fixture under `tests/fixtures/`
//! is the literal input a caller would hand the CLI binaries for one of
//! the six end-to-end scenarios, loaded from disk rather than inlined as
//! a string literal.

use relang::checker::{check, parse_tests, CheckOutcome};
use relang::dfa::Dfa;
use relang::dfa_spec;
use relang::input_file::parse_input_file;
use relang::regex::compile;

fn compile_regex_input(text: &str) -> Dfa {
    let input = parse_input_file(text).unwrap();
    let nfa = compile(&input.regex_source, &input.alphabet).unwrap();
    nfa.to_dfa(&input.alphabet).minimize()
}

#[test]
fn scenario1_a_star_b_star_passes() {
    let input = include_str!("fixtures/scenario1_a_star_b_star/input.txt");
    let tests_text = include_str!("fixtures/scenario1_a_star_b_star/tests.txt");

    let dfa = compile_regex_input(input);
    let tests = parse_tests(tests_text, dfa.alphabet()).unwrap();
    let report = check(&dfa, &dfa, &tests).unwrap();
    assert_eq!(report.outcome, CheckOutcome::Pass { count: 5 });
}

#[test]
fn scenario2_abb_suffix_regex_vs_dfa_spec_passes() {
    let reference_input = include_str!("fixtures/scenario2_abb_suffix/reference_input.txt");
    let user_spec = include_str!("fixtures/scenario2_abb_suffix/user_spec.txt");
    let tests_text = include_str!("fixtures/scenario2_abb_suffix/tests.txt");

    let reference = compile_regex_input(reference_input);
    let user = dfa_spec::compile(user_spec, reference.alphabet()).unwrap();
    let tests = parse_tests(tests_text, reference.alphabet()).unwrap();
    let report = check(&reference, &user, &tests).unwrap();
    assert_eq!(report.outcome, CheckOutcome::Pass { count: 7 });
}

#[test]
fn scenario3_mismatch_on_eps_line() {
    let reference_input = include_str!("fixtures/scenario3_mismatch/reference_input.txt");
    let user_input = include_str!("fixtures/scenario3_mismatch/user_input.txt");
    let tests_text = include_str!("fixtures/scenario3_mismatch/tests.txt");

    let reference = compile_regex_input(reference_input);
    let user = compile_regex_input(user_input);
    let tests = parse_tests(tests_text, reference.alphabet()).unwrap();
    let report = check(&reference, &user, &tests).unwrap();
    match report.outcome {
        CheckOutcome::Mismatch { lineno, .. } => assert_eq!(lineno, 1),
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[test]
fn scenario4_incomplete_spec_mismatch_on_eps_line() {
    let reference_input = include_str!("fixtures/scenario4_incomplete_spec/reference_input.txt");
    let user_spec = include_str!("fixtures/scenario4_incomplete_spec/user_spec.txt");
    let tests_text = include_str!("fixtures/scenario4_incomplete_spec/tests.txt");

    let reference = compile_regex_input(reference_input);
    let user = dfa_spec::compile(user_spec, reference.alphabet()).unwrap();
    let tests = parse_tests(tests_text, reference.alphabet()).unwrap();
    let report = check(&reference, &user, &tests).unwrap();
    match report.outcome {
        CheckOutcome::Mismatch { lineno, .. } => assert_eq!(lineno, 1),
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[test]
fn scenario5_epsilon_union_spellings_agree() {
    let reference_input = include_str!("fixtures/scenario5_epsilon_union/reference_input.txt");
    let user_input = include_str!("fixtures/scenario5_epsilon_union/user_input.txt");
    let tests_text = include_str!("fixtures/scenario5_epsilon_union/tests.txt");

    let reference = compile_regex_input(reference_input);
    let user = compile_regex_input(user_input);
    let tests = parse_tests(tests_text, reference.alphabet()).unwrap();
    let report = check(&reference, &user, &tests).unwrap();
    assert_eq!(report.outcome, CheckOutcome::Pass { count: 3 });
}

#[test]
fn scenario6_ab_star_minimizes_to_three_states() {
    let input = include_str!("fixtures/scenario6_ab_star/input.txt");
    let dfa = compile_regex_input(input);
    assert_eq!(dfa.state_count(), 3);
    assert!(dfa.accepts(b""));
    assert!(dfa.accepts(b"abab"));
    assert!(!dfa.accepts(b"a"));
    assert!(!dfa.accepts(b"aba"));
}
