//! The complete, deterministic finite automaton: a total transition table
//! over a fixed [`Alphabet`], plus Hopcroft partition-refinement
//! minimization.

use std::collections::{HashSet, VecDeque};

use crate::alphabet::Alphabet;

/// A DFA with a total transition function: every (state, symbol) pair has
/// a defined successor. Constructors that receive a partial table adjoin
/// one dead state to make it total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    alphabet: Alphabet,
    transitions: Vec<Vec<usize>>,
    start: usize,
    accepting: Vec<bool>,
}

impl Dfa {
    /// Builds a DFA directly from an already-total table. Used by the
    /// table reader; callers that may have missing cells should use
    /// [`Dfa::from_partial`] instead.
    pub fn new(
        alphabet: Alphabet,
        transitions: Vec<Vec<usize>>,
        start: usize,
        accepting: Vec<bool>,
    ) -> Self {
        debug_assert_eq!(transitions.len(), accepting.len());
        debug_assert!(transitions.iter().all(|row| row.len() == alphabet.len()));
        Dfa {
            alphabet,
            transitions,
            start,
            accepting,
        }
    }

    /// Builds a DFA from a possibly-partial table (`None` cells meaning "no
    /// transition defined"), completing it with one adjoined dead state
    /// when needed. If every cell is already defined, no dead state is
    /// added.
    pub fn from_partial(
        alphabet: Alphabet,
        rows: Vec<Vec<Option<usize>>>,
        start: usize,
        mut accepting: Vec<bool>,
    ) -> Self {
        let needs_dead = rows.iter().any(|row| row.iter().any(|c| c.is_none()));
        let dead = rows.len();
        let k = alphabet.len();

        let mut transitions: Vec<Vec<usize>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(|c| c.unwrap_or(dead)).collect())
            .collect();

        if needs_dead {
            transitions.push(vec![dead; k]);
            accepting.push(false);
        }

        Dfa {
            alphabet,
            transitions,
            start,
            accepting,
        }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn state_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn is_accepting(&self, state: usize) -> bool {
        self.accepting[state]
    }

    pub fn accepting_states(&self) -> Vec<usize> {
        let mut v: Vec<usize> = (0..self.accepting.len())
            .filter(|&i| self.accepting[i])
            .collect();
        v.sort_unstable();
        v
    }

    pub fn transition(&self, state: usize, symbol_index: usize) -> usize {
        self.transitions[state][symbol_index]
    }

    pub fn rows(&self) -> &[Vec<usize>] {
        &self.transitions
    }

    /// Simulates the DFA on a byte string, returning whether it ends in an
    /// accepting state. Every byte must belong to the alphabet; callers are
    /// responsible for validating that beforehand (the table format and the
    /// tests-file grammar both guarantee it).
    pub fn accepts(&self, input: &[u8]) -> bool {
        let mut state = self.start;
        for &b in input {
            let col = self
                .alphabet
                .index_of(b)
                .expect("accepts() called with a byte outside the alphabet");
            state = self.transitions[state][col];
        }
        self.accepting[state]
    }

    /// Hopcroft partition refinement, producing the unique minimal DFA
    /// (up to class renaming) for this automaton's language.
    pub fn minimize(&self) -> Dfa {
        let n = self.state_count();
        let k = self.alphabet.len();

        let accepting_states: Vec<usize> = (0..n).filter(|&q| self.accepting[q]).collect();
        let non_accepting: Vec<usize> = (0..n).filter(|&q| !self.accepting[q]).collect();

        let mut partition: Vec<Vec<usize>> = Vec::new();
        if !accepting_states.is_empty() {
            partition.push(accepting_states);
        }
        if !non_accepting.is_empty() {
            partition.push(non_accepting);
        }

        if partition.len() <= 1 {
            return self.single_class_dfa();
        }

        let mut block_id = vec![0usize; n];
        for (i, block) in partition.iter().enumerate() {
            for &q in block {
                block_id[q] = i;
            }
        }

        // inv[c][q] = predecessors of q on symbol c
        let mut inv: Vec<Vec<Vec<usize>>> = vec![vec![Vec::new(); n]; k];
        for q in 0..n {
            for c in 0..k {
                let t = self.transitions[q][c];
                inv[c][t].push(q);
            }
        }

        let mut in_worklist = vec![false; partition.len()];
        let mut worklist: VecDeque<usize> = VecDeque::new();
        let smaller = if partition[0].len() <= partition[1].len() {
            0
        } else {
            1
        };
        worklist.push_back(smaller);
        in_worklist[smaller] = true;

        while let Some(a_idx) = worklist.pop_front() {
            in_worklist[a_idx] = false;
            let frozen_a = partition[a_idx].clone();

            for c in 0..k {
                let mut x_states: Vec<usize> = Vec::new();
                for &q in &frozen_a {
                    x_states.extend(inv[c][q].iter().copied());
                }
                if x_states.is_empty() {
                    continue;
                }
                x_states.sort_unstable();
                x_states.dedup();
                let x_set: HashSet<usize> = x_states.iter().copied().collect();

                let mut candidate_blocks: Vec<usize> =
                    x_states.iter().map(|&q| block_id[q]).collect();
                candidate_blocks.sort_unstable();
                candidate_blocks.dedup();

                for y in candidate_blocks {
                    let (in_x, not_in_x): (Vec<usize>, Vec<usize>) = partition[y]
                        .iter()
                        .copied()
                        .partition(|q| x_set.contains(q));
                    if not_in_x.is_empty() {
                        continue;
                    }
                    partition[y] = in_x.clone();
                    for &q in &in_x {
                        block_id[q] = y;
                    }
                    let new_idx = partition.len();
                    partition.push(not_in_x.clone());
                    for &q in &not_in_x {
                        block_id[q] = new_idx;
                    }
                    in_worklist.push(false);

                    if in_worklist[y] {
                        in_worklist[new_idx] = true;
                        worklist.push_back(new_idx);
                    } else if in_x.len() <= not_in_x.len() {
                        in_worklist[y] = true;
                        worklist.push_back(y);
                    } else {
                        in_worklist[new_idx] = true;
                        worklist.push_back(new_idx);
                    }
                }
            }
        }

        self.build_from_partition(partition, block_id)
    }

    fn single_class_dfa(&self) -> Dfa {
        let accepting = vec![self.accepting[self.start]];
        let row = vec![0usize; self.alphabet.len()];
        Dfa {
            alphabet: self.alphabet.clone(),
            transitions: vec![row],
            start: 0,
            accepting,
        }
    }

    fn build_from_partition(&self, partition: Vec<Vec<usize>>, block_id: Vec<usize>) -> Dfa {
        let mut order: Vec<usize> = (0..partition.len()).collect();
        order.sort_by_key(|&y| *partition[y].iter().min().unwrap());
        let mut new_id = vec![0usize; partition.len()];
        for (new_i, &old_y) in order.iter().enumerate() {
            new_id[old_y] = new_i;
        }

        let class_of = |original_state: usize| new_id[block_id[original_state]];

        let n_classes = partition.len();
        let k = self.alphabet.len();
        let mut transitions = vec![vec![0usize; k]; n_classes];
        let mut accepting = vec![false; n_classes];

        for &old_y in &order {
            let c = new_id[old_y];
            let rep = *partition[old_y].iter().min().unwrap();
            accepting[c] = self.accepting[rep];
            for col in 0..k {
                transitions[c][col] = class_of(self.transitions[rep][col]);
            }
        }

        Dfa {
            alphabet: self.alphabet.clone(),
            transitions,
            start: class_of(self.start),
            accepting,
        }
    }
}
