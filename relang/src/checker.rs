//! Equivalence checking: two DFA tables are compared only by simulating
//! both on an explicit list of test strings, never by product-automaton
//! exploration.

use thiserror::Error;

use crate::alphabet::Alphabet;
use crate::dfa::Dfa;

const EPS_LITERAL: &str = "<eps>";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TestsFileError {
    #[error("line {0}: expected a label (0 or 1) followed by a test string")]
    MissingLabel(usize),
    #[error("line {0}: label must be 0 or 1, found {1:?}")]
    BadLabel(usize, String),
    #[error("line {0}: missing test string after label")]
    MissingString(usize),
    #[error("line {0}: byte {1:?} is not in the shared alphabet")]
    SymbolNotInAlphabet(usize, char),
}

#[derive(Debug, Clone)]
pub struct TestCase {
    pub lineno: usize,
    pub label: bool,
    pub input: Vec<u8>,
    pub display: String,
}

/// Parses the tests file: one `<label> <string>` per non-blank,
/// non-comment line, where `<string>` is either the literal `<eps>` or a
/// whitespace-free run of alphabet symbols.
pub fn parse_tests(text: &str, alphabet: &Alphabet) -> Result<Vec<TestCase>, TestsFileError> {
    let mut cases = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let lineno = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut parts = trimmed.split_whitespace();
        let label_tok = parts.next().ok_or(TestsFileError::MissingLabel(lineno))?;
        let label = match label_tok {
            "0" => false,
            "1" => true,
            other => return Err(TestsFileError::BadLabel(lineno, other.to_string())),
        };
        let string_tok = parts.next().ok_or(TestsFileError::MissingString(lineno))?;
        let input: Vec<u8> = if string_tok == EPS_LITERAL {
            Vec::new()
        } else {
            string_tok.bytes().collect()
        };
        for &b in &input {
            if !alphabet.contains(b) {
                return Err(TestsFileError::SymbolNotInAlphabet(lineno, b as char));
            }
        }
        cases.push(TestCase {
            lineno,
            label,
            input,
            display: string_tok.to_string(),
        });
    }
    Ok(cases)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckError {
    #[error("reference alphabet {reference:?} does not match user alphabet {user:?}")]
    AlphabetMismatch { reference: String, user: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Pass { count: usize },
    Mismatch {
        lineno: usize,
        display: String,
        reference_accepts: bool,
        user_accepts: bool,
    },
}

/// A non-fatal discrepancy between a test's declared label and the
/// reference DFA's actual verdict on that string. Advisory only: it never
/// changes the check's outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelWarning {
    pub lineno: usize,
    pub display: String,
    pub label: bool,
    pub reference_accepts: bool,
}

pub struct CheckReport {
    pub outcome: CheckOutcome,
    pub warnings: Vec<LabelWarning>,
}

/// Checks that `reference` and `user` agree on every test case. Alphabets
/// must be byte-equal, same symbols in the same order, or this returns
/// [`CheckError::AlphabetMismatch`] without examining any test.
pub fn check(
    reference: &Dfa,
    user: &Dfa,
    tests: &[TestCase],
) -> Result<CheckReport, CheckError> {
    if !alphabets_match(reference.alphabet(), user.alphabet()) {
        return Err(CheckError::AlphabetMismatch {
            reference: reference.alphabet().to_string(),
            user: user.alphabet().to_string(),
        });
    }

    let mut warnings = Vec::new();
    for case in tests {
        let ref_accepts = reference.accepts(&case.input);
        if ref_accepts != case.label {
            warnings.push(LabelWarning {
                lineno: case.lineno,
                display: case.display.clone(),
                label: case.label,
                reference_accepts: ref_accepts,
            });
        }

        let user_accepts = user.accepts(&case.input);
        if ref_accepts != user_accepts {
            return Ok(CheckReport {
                outcome: CheckOutcome::Mismatch {
                    lineno: case.lineno,
                    display: case.display.clone(),
                    reference_accepts: ref_accepts,
                    user_accepts,
                },
                warnings,
            });
        }
    }

    Ok(CheckReport {
        outcome: CheckOutcome::Pass {
            count: tests.len(),
        },
        warnings,
    })
}

/// Alphabets are comparable only when byte-equal in the same order —
/// never compared as unordered sets.
fn alphabets_match(a: &Alphabet, b: &Alphabet) -> bool {
    a.as_bytes() == b.as_bytes()
}
