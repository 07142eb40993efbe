//! The human-written DFA specification grammar: named states `q<n>`, one
//! `Start:` line, one `Accept:` line, and any number of transition lines
//! `(q<i>, c) -> q<j>`.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, multispace0, none_of, space0},
    combinator::{all_consuming, map_res, opt, value},
    multi::separated_list0,
    sequence::{preceded, terminated, tuple},
    Finish, IResult,
};
use thiserror::Error;

use crate::alphabet::Alphabet;
use crate::dfa::Dfa;

/// Maximum number of states a spec may materialize.
pub const MAX_STATES: usize = 4096;
const MAX_STATE_INDEX: usize = 1_000_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DfaSpecError {
    #[error("line {0}: expected a state reference like q0")]
    BadStateName(usize),
    #[error("missing required Start: line")]
    MissingStart,
    #[error("missing required Accept: line")]
    MissingAccept,
    #[error("multiple Start: lines given")]
    MultipleStart,
    #[error("multiple Accept: lines given")]
    MultipleAccept,
    #[error("line {0}: could not parse as a transition, Start:, Accept: or comment")]
    Unparseable(usize),
    #[error("line {0}: symbol {1:?} is not in the alphabet")]
    SymbolNotInAlphabet(usize, char),
    #[error("line {0}: state index {1} exceeds the maximum of {MAX_STATE_INDEX}")]
    StateIndexTooLarge(usize, usize),
    #[error("materialized {0} states, maximum is {MAX_STATES}")]
    TooManyStates(usize),
    #[error("line {0}: transition from q{1} on {2:?} conflicts with an earlier target q{3}, found q{4}")]
    Nondeterministic(usize, usize, char, usize, usize),
    #[error("start state q{0} was never materialized")]
    StartOutOfRange(usize),
    #[error("accept state q{0} was never materialized")]
    AcceptOutOfRange(usize),
}

enum Line {
    Blank,
    Start(usize),
    Accept(Vec<usize>),
    Transition(usize, u8, usize),
}

fn state_ref(input: &str) -> IResult<&str, usize> {
    map_res(preceded(char('q'), digit1), |d: &str| d.parse::<usize>())(input)
}

fn start_line(input: &str) -> IResult<&str, Line> {
    let (input, _) = preceded(space0, tag_case_insensitive("Start"))(input)?;
    let (input, _) = preceded(space0, char(':'))(input)?;
    let (input, s) = preceded(space0, state_ref)(input)?;
    Ok((input, Line::Start(s)))
}

/// Tolerates and silently drops tokens in the accept set that are not of
/// the form `q<n>` — matching the historical behavior of dropping
/// unrecognized tokens rather than erroring.
fn accept_line(input: &str) -> IResult<&str, Line> {
    let (input, _) = preceded(space0, tag_case_insensitive("Accept"))(input)?;
    let (input, _) = preceded(space0, char(':'))(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = opt(char('{'))(input)?;
    let (input, raw) = separated_list0(
        alt((char(','), char(' '))),
        preceded(space0, accept_token),
    )(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = opt(char('}'))(input)?;
    let states: Vec<usize> = raw.into_iter().flatten().collect();
    Ok((input, Line::Accept(states)))
}

/// One whitespace/comma-separated token inside an Accept set: either a
/// valid `q<n>` (kept) or any other run of non-separator characters
/// (dropped).
fn accept_token(input: &str) -> IResult<&str, Option<usize>> {
    alt((
        nom::combinator::map(state_ref, Some),
        value(
            None,
            nom::bytes::complete::is_not(", }\t\r\n"),
        ),
    ))(input)
}

fn transition_line(input: &str) -> IResult<&str, Line> {
    let (input, (_, src, _, sym, _, _, _, dst)) = tuple((
        preceded(space0, char('(')),
        preceded(space0, state_ref),
        preceded(space0, char(',')),
        preceded(space0, none_of(",)")),
        preceded(space0, char(')')),
        preceded(space0, tag("->")),
        space0,
        state_ref,
    ))(input)?;
    Ok((input, Line::Transition(src, sym as u8, dst)))
}

fn comment_or_blank(input: &str) -> IResult<&str, Line> {
    let (input, _) = space0(input)?;
    let (input, _) = opt(preceded(char('#'), nom::bytes::complete::take_while(|_| true)))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, Line::Blank))
}

fn tag_case_insensitive(word: &'static str) -> impl Fn(&str) -> IResult<&str, &str> {
    move |input: &str| nom::bytes::complete::tag_no_case(word)(input)
}

fn parse_line(input: &str) -> IResult<&str, Line> {
    all_consuming(terminated(
        alt((start_line, accept_line, transition_line, comment_or_blank)),
        multispace0,
    ))(input)
}

/// Compiles a DFA-spec source text into a [`Dfa`] over `alphabet`,
/// completing with a dead state as needed. Does not minimize.
pub fn compile(source: &str, alphabet: &Alphabet) -> Result<Dfa, DfaSpecError> {
    let mut start: Option<usize> = None;
    let mut accept: Option<Vec<usize>> = None;
    let mut transitions: Vec<(usize, u8, usize, usize)> = Vec::new();

    for (lineno, raw_line) in source.lines().enumerate() {
        let lineno = lineno + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_line(trimmed).finish() {
            Ok((_, Line::Blank)) => {}
            Ok((_, Line::Start(s))) => {
                if start.is_some() {
                    return Err(DfaSpecError::MultipleStart);
                }
                check_index(s, lineno)?;
                start = Some(s);
            }
            Ok((_, Line::Accept(states))) => {
                if accept.is_some() {
                    return Err(DfaSpecError::MultipleAccept);
                }
                for &s in &states {
                    check_index(s, lineno)?;
                }
                accept = Some(states);
            }
            Ok((_, Line::Transition(src, sym, dst))) => {
                check_index(src, lineno)?;
                check_index(dst, lineno)?;
                if !alphabet.contains(sym) {
                    return Err(DfaSpecError::SymbolNotInAlphabet(lineno, sym as char));
                }
                transitions.push((src, sym, dst, lineno));
            }
            Err(_) => return Err(DfaSpecError::Unparseable(lineno)),
        }
    }

    let start = start.ok_or(DfaSpecError::MissingStart)?;
    let accept = accept.ok_or(DfaSpecError::MissingAccept)?;

    let max_referenced = transitions
        .iter()
        .flat_map(|&(s, _, d, _)| [s, d])
        .chain([start])
        .chain(accept.iter().copied())
        .max()
        .unwrap_or(0);
    let n_states = max_referenced + 1;
    if n_states > MAX_STATES {
        return Err(DfaSpecError::TooManyStates(n_states));
    }
    if start >= n_states {
        return Err(DfaSpecError::StartOutOfRange(start));
    }
    for &a in &accept {
        if a >= n_states {
            return Err(DfaSpecError::AcceptOutOfRange(a));
        }
    }

    let k = alphabet.len();
    let mut rows: Vec<Vec<Option<usize>>> = vec![vec![None; k]; n_states];
    for &(src, sym, dst, lineno) in &transitions {
        let col = alphabet.index_of(sym).expect("validated above");
        match rows[src][col] {
            Some(existing) if existing != dst => {
                return Err(DfaSpecError::Nondeterministic(
                    lineno,
                    src,
                    sym as char,
                    existing,
                    dst,
                ));
            }
            _ => rows[src][col] = Some(dst),
        }
    }

    let mut accepting = vec![false; n_states];
    for a in accept {
        accepting[a] = true;
    }

    Ok(Dfa::from_partial(alphabet.clone(), rows, start, accepting))
}

fn check_index(s: usize, lineno: usize) -> Result<(), DfaSpecError> {
    if s > MAX_STATE_INDEX {
        return Err(DfaSpecError::StateIndexTooLarge(lineno, s));
    }
    Ok(())
}
