//! Core library behind the three command-line tools: compiling regexes to
//! minimized DFAs, compiling hand-written DFA specs to the same table
//! form, and checking DFA equivalence against an explicit test set.
//!
//! Every automaton is an arena of states addressed by dense `usize`
//! index; nothing here is reference-counted or cyclic. The only thing
//! that ever crosses a process boundary is the canonical table text in
//! [`table`].

pub mod alphabet;
pub mod checker;
pub mod dfa;
pub mod dfa_spec;
pub mod input_file;
pub mod nfa;
pub mod regex;
pub mod table;

#[cfg(test)]
mod tests;
