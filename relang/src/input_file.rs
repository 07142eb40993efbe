//! The compiler-1 input file: line 1 is the regex source, line 2 is the
//! alphabet. Later lines are ignored.

use thiserror::Error;

use crate::alphabet::{Alphabet, AlphabetError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputFileError {
    #[error("input file is missing the regex line")]
    MissingRegexLine,
    #[error("input file is missing the alphabet line")]
    MissingAlphabetLine,
    #[error("invalid alphabet line: {0}")]
    Alphabet(#[from] AlphabetError),
}

pub struct RegexInput {
    pub regex_source: String,
    pub alphabet: Alphabet,
}

pub fn parse_input_file(text: &str) -> Result<RegexInput, InputFileError> {
    let mut lines = text.lines();
    let regex_source = lines
        .next()
        .ok_or(InputFileError::MissingRegexLine)?
        .to_string();
    let alphabet_line = lines.next().ok_or(InputFileError::MissingAlphabetLine)?;
    let alphabet = Alphabet::parse_line(alphabet_line)?;
    Ok(RegexInput {
        regex_source,
        alphabet,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_regex_and_alphabet_lines() {
        let input = parse_input_file("a*b*\nab\n").unwrap();
        assert_eq!(input.regex_source, "a*b*");
        assert_eq!(input.alphabet.symbols(), b"ab");
    }

    #[test]
    fn rejects_missing_alphabet_line() {
        assert_eq!(
            parse_input_file("a*b*"),
            Err(InputFileError::MissingAlphabetLine)
        );
    }
}
