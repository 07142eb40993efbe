//! Regex grammar: union (`|` or `+`), concatenation, Kleene star, grouping,
//! and explicit ε (`<eps>` or the UTF-8 epsilon glyph). Compiles straight
//! to an [`Nfa`] via explicit-concatenation insertion, shunting-yard
//! postfix conversion and Thompson construction — no intermediate AST.

use thiserror::Error;

use crate::alphabet::Alphabet;
use crate::nfa::{Nfa, ThompsonBuilder};

/// Internal marker for ε, chosen from the control-byte range so it can
/// never collide with a printable alphabet symbol.
pub(crate) const EPSILON_BYTE: u8 = 0x01;
/// Internal marker inserted between adjacent atoms to make concatenation
/// explicit before shunting-yard runs.
const CONCAT_BYTE: u8 = 0x02;

const UNION_A: u8 = b'|';
const UNION_B: u8 = b'+';
const STAR: u8 = b'*';
const LPAREN: u8 = b'(';
const RPAREN: u8 = b')';

const EPS_TOKEN: &str = "<eps>";
const EPS_UTF8: [u8; 2] = [0xCE, 0xB5];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegexError {
    #[error("regex is empty")]
    Empty,
    #[error("byte {0:#04x} at position {1} is not in the alphabet and is not a regex operator")]
    UnknownByte(u8, usize),
    #[error("unbalanced parentheses")]
    UnbalancedParens,
    #[error("regex compiles to more NFA states than the {0} state limit")]
    TooManyStates(usize),
    #[error("subset construction produced more DFA states than the {0} state limit")]
    TooManyDfaStates(usize),
}

/// Tokens of the regex grammar after ε-substitution, before explicit
/// concatenation insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Symbol(u8),
    Epsilon,
    Union,
    Star,
    LParen,
    RParen,
    Concat,
}

/// Replaces both spellings of ε with the internal marker byte and removes
/// whitespace, leaving a plain byte string ready for tokenization.
fn substitute_epsilon(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if bytes[i..].starts_with(EPS_TOKEN.as_bytes()) {
            out.push(EPSILON_BYTE);
            i += EPS_TOKEN.len();
            continue;
        }
        if bytes[i..].starts_with(&EPS_UTF8) {
            out.push(EPSILON_BYTE);
            i += EPS_UTF8.len();
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

fn tokenize(bytes: &[u8], alphabet: &Alphabet) -> Result<Vec<Token>, RegexError> {
    let mut tokens = Vec::with_capacity(bytes.len());
    for (i, &b) in bytes.iter().enumerate() {
        let tok = match b {
            EPSILON_BYTE => Token::Epsilon,
            UNION_A | UNION_B => Token::Union,
            STAR => Token::Star,
            LPAREN => Token::LParen,
            RPAREN => Token::RParen,
            b if alphabet.contains(b) => Token::Symbol(b),
            other => return Err(RegexError::UnknownByte(other, i)),
        };
        tokens.push(tok);
    }
    Ok(tokens)
}

fn is_atom_end(t: Token) -> bool {
    matches!(
        t,
        Token::Symbol(_) | Token::Epsilon | Token::RParen | Token::Star
    )
}

fn is_atom_start(t: Token) -> bool {
    matches!(t, Token::Symbol(_) | Token::Epsilon | Token::LParen)
}

/// Inserts an explicit [`Token::Concat`] between adjacent tokens where the
/// first ends an atom and the second begins one.
fn insert_concat(tokens: &[Token]) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len() * 2);
    for (i, &t) in tokens.iter().enumerate() {
        if i > 0 && is_atom_end(tokens[i - 1]) && is_atom_start(t) {
            out.push(Token::Concat);
        }
        out.push(t);
    }
    out
}

fn precedence(t: Token) -> u8 {
    match t {
        Token::Star => 3,
        Token::Concat => 2,
        Token::Union => 1,
        _ => 0,
    }
}

/// Shunting-yard: infix tokens (with explicit concatenation already
/// inserted) to postfix.
fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, RegexError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut ops: Vec<Token> = Vec::new();

    for t in tokens {
        match t {
            Token::Symbol(_) | Token::Epsilon => output.push(t),
            Token::Union | Token::Concat | Token::Star => {
                while let Some(&top) = ops.last() {
                    if top != Token::LParen && precedence(top) >= precedence(t) {
                        output.push(ops.pop().unwrap());
                    } else {
                        break;
                    }
                }
                ops.push(t);
            }
            Token::LParen => ops.push(t),
            Token::RParen => {
                let mut found = false;
                while let Some(top) = ops.pop() {
                    if top == Token::LParen {
                        found = true;
                        break;
                    }
                    output.push(top);
                }
                if !found {
                    return Err(RegexError::UnbalancedParens);
                }
            }
        }
    }
    while let Some(top) = ops.pop() {
        if top == Token::LParen {
            return Err(RegexError::UnbalancedParens);
        }
        output.push(top);
    }
    Ok(output)
}

/// Maximum number of NFA states a single compile may produce.
pub const MAX_NFA_STATES: usize = 4096;
/// Maximum number of DFA states subset construction may produce, before
/// minimization.
pub const MAX_DFA_STATES: usize = 4096;

/// Enforces the subset-construction DFA state-count bound. Must be
/// called on the result of [`crate::nfa::Nfa::to_dfa`] before
/// minimizing, since minimization can only ever shrink the state count
/// back down and the bound exists to catch blow-up during determinization
/// itself.
pub fn check_dfa_state_limit(dfa: &crate::dfa::Dfa) -> Result<(), RegexError> {
    if dfa.state_count() > MAX_DFA_STATES {
        return Err(RegexError::TooManyDfaStates(MAX_DFA_STATES));
    }
    Ok(())
}

/// Parses and compiles a regex source string directly to an [`Nfa`] over
/// `alphabet`.
pub fn compile(source: &str, alphabet: &Alphabet) -> Result<Nfa, RegexError> {
    let substituted = substitute_epsilon(source);
    if substituted.is_empty() {
        return Err(RegexError::Empty);
    }
    let tokens = tokenize(&substituted, alphabet)?;
    let tokens = insert_concat(&tokens);
    let postfix = to_postfix(tokens)?;

    let mut builder = ThompsonBuilder::new();
    for t in postfix {
        match t {
            Token::Symbol(b) => builder.push_symbol(b),
            Token::Epsilon => builder.push_epsilon(),
            Token::Concat => builder.concat(),
            Token::Union => builder.union(),
            Token::Star => builder.star(),
            Token::LParen | Token::RParen => unreachable!("parens consumed by shunting-yard"),
        }
    }

    let nfa = builder
        .finish()
        .ok_or(RegexError::UnbalancedParens)?;

    if nfa.state_count() > MAX_NFA_STATES {
        return Err(RegexError::TooManyStates(MAX_NFA_STATES));
    }
    Ok(nfa)
}
