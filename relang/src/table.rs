//! The canonical DFA table: the line-oriented text format every
//! component reads and writes, and the only thing that crosses process
//! boundaries.

use std::fmt::Write as _;

use thiserror::Error;

use crate::alphabet::{Alphabet, AlphabetError};
use crate::dfa::Dfa;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("expected line starting with {0:?}, found {1:?}")]
    ExpectedKeyword(&'static str, String),
    #[error("truncated table: missing {0}")]
    Truncated(&'static str),
    #[error("alphabet declares {declared} symbols but string has {actual}")]
    AlphabetLengthMismatch { declared: usize, actual: usize },
    #[error("invalid alphabet: {0}")]
    Alphabet(#[from] AlphabetError),
    #[error("state count field is not a valid integer: {0:?}")]
    BadStateCount(String),
    #[error("start state {0} is out of range [0, {1})")]
    StartOutOfRange(usize, usize),
    #[error("accept index {0} is out of range [0, {1})")]
    AcceptOutOfRange(usize, usize),
    #[error("accept list is not strictly ascending at position {0}")]
    AcceptNotSorted(usize),
    #[error("row {0} has {1} cells, expected {2}")]
    WrongRowWidth(usize, usize, usize),
    #[error("transition cell {0:?} is not a valid state index")]
    BadCell(String),
    #[error("expected END, found {0:?}")]
    MissingEnd(String),
    #[error("malformed integer field: {0:?}")]
    BadInteger(String),
}

/// Renders a [`Dfa`] as the canonical table text, per the `ALPHABET` /
/// `STATES` / `START` / `ACCEPT` / `TRANS` format.
pub fn write_table(dfa: &Dfa) -> String {
    let mut out = String::new();
    let alphabet = dfa.alphabet();
    writeln!(out, "ALPHABET {} {}", alphabet.len(), alphabet).unwrap();
    writeln!(out, "STATES {}", dfa.state_count()).unwrap();
    writeln!(out, "START {}", dfa.start()).unwrap();

    let accept = dfa.accepting_states();
    write!(out, "ACCEPT {}", accept.len()).unwrap();
    for a in &accept {
        write!(out, " {a}").unwrap();
    }
    writeln!(out).unwrap();

    writeln!(out, "TRANS").unwrap();
    for row in dfa.rows() {
        let line = row
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{line}").unwrap();
    }
    writeln!(out, "END").unwrap();
    out
}

/// Parses the canonical table text back into a [`Dfa`].
pub fn parse_table(text: &str) -> Result<Dfa, TableError> {
    let mut lines = text.lines();

    let alphabet_line = lines.next().ok_or(TableError::Truncated("ALPHABET line"))?;
    let rest = strip_keyword(alphabet_line, "ALPHABET")?;
    let mut parts = rest.split_whitespace();
    let k: usize = parse_usize(parts.next().ok_or(TableError::Truncated("alphabet count"))?)?;
    let symbols_str = parts
        .next()
        .ok_or(TableError::Truncated("alphabet string"))?;
    if symbols_str.len() != k {
        return Err(TableError::AlphabetLengthMismatch {
            declared: k,
            actual: symbols_str.len(),
        });
    }
    let alphabet = Alphabet::parse_plain(symbols_str)?;
    if alphabet.len() != k {
        return Err(TableError::AlphabetLengthMismatch {
            declared: k,
            actual: alphabet.len(),
        });
    }

    let states_line = lines.next().ok_or(TableError::Truncated("STATES line"))?;
    let rest = strip_keyword(states_line, "STATES")?;
    let n: usize = parse_usize(rest.trim())?;

    let start_line = lines.next().ok_or(TableError::Truncated("START line"))?;
    let rest = strip_keyword(start_line, "START")?;
    let start: usize = parse_usize(rest.trim())?;
    if start >= n {
        return Err(TableError::StartOutOfRange(start, n));
    }

    let accept_line = lines.next().ok_or(TableError::Truncated("ACCEPT line"))?;
    let rest = strip_keyword(accept_line, "ACCEPT")?;
    let mut accept_parts = rest.split_whitespace();
    let m: usize = parse_usize(
        accept_parts
            .next()
            .ok_or(TableError::Truncated("accept count"))?,
    )?;
    let mut accepting = vec![false; n];
    let mut prev: Option<usize> = None;
    for i in 0..m {
        let idx: usize = parse_usize(
            accept_parts
                .next()
                .ok_or(TableError::Truncated("accept index"))?,
        )?;
        if idx >= n {
            return Err(TableError::AcceptOutOfRange(idx, n));
        }
        if let Some(p) = prev {
            if idx <= p {
                return Err(TableError::AcceptNotSorted(i));
            }
        }
        prev = Some(idx);
        accepting[idx] = true;
    }

    let trans_line = lines.next().ok_or(TableError::Truncated("TRANS line"))?;
    if trans_line.trim() != "TRANS" {
        return Err(TableError::ExpectedKeyword(
            "TRANS",
            trans_line.to_string(),
        ));
    }

    let mut transitions = Vec::with_capacity(n);
    for r in 0..n {
        let row_line = lines
            .next()
            .ok_or(TableError::Truncated("transition row"))?;
        let cells: Vec<&str> = row_line.split_whitespace().collect();
        if cells.len() != k {
            return Err(TableError::WrongRowWidth(r, cells.len(), k));
        }
        let row: Result<Vec<usize>, TableError> = cells
            .iter()
            .map(|c| {
                let v = parse_usize(c)?;
                if v >= n {
                    return Err(TableError::BadCell((*c).to_string()));
                }
                Ok(v)
            })
            .collect();
        transitions.push(row?);
    }

    let end_line = lines.next().ok_or(TableError::Truncated("END line"))?;
    if end_line.trim() != "END" {
        return Err(TableError::MissingEnd(end_line.to_string()));
    }

    Ok(Dfa::new(alphabet, transitions, start, accepting))
}

fn strip_keyword<'a>(line: &'a str, keyword: &'static str) -> Result<&'a str, TableError> {
    let trimmed = line.trim();
    match trimmed.strip_prefix(keyword) {
        Some(rest) => Ok(rest.trim_start()),
        None => Err(TableError::ExpectedKeyword(keyword, trimmed.to_string())),
    }
}

fn parse_usize(s: &str) -> Result<usize, TableError> {
    s.parse::<usize>()
        .map_err(|_| TableError::BadInteger(s.to_string()))
}
