//! An ε-NFA built by Thompson construction and turned into a DFA by
//! ε-closure subset construction.
//!
//! States live in one owning arena (`Vec<NfaState>`) and are referred to
//! everywhere else by dense `usize` index, never by name or reference —
//! mirroring how the DFA arena works.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::alphabet::Alphabet;
use crate::dfa::Dfa;

#[derive(Debug, Clone, Default)]
pub struct NfaState {
    pub epsilon: Vec<usize>,
    pub transitions: Vec<(u8, usize)>,
}

/// A Thompson-constructed NFA: exactly one start state and one accepting
/// state, per fragment invariant.
#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<NfaState>,
    start: usize,
    accept: usize,
}

/// A single fragment on the Thompson-construction stack: an NFA under
/// construction together with the entry/exit state of the sub-expression
/// it currently represents.
struct Fragment {
    start: usize,
    accept: usize,
}

/// Builder used while walking a postfix token stream; owns the arena that
/// will become the finished [`Nfa`].
pub(crate) struct ThompsonBuilder {
    states: Vec<NfaState>,
    stack: Vec<Fragment>,
}

impl ThompsonBuilder {
    pub(crate) fn new() -> Self {
        ThompsonBuilder {
            states: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn new_state(&mut self) -> usize {
        self.states.push(NfaState::default());
        self.states.len() - 1
    }

    pub(crate) fn push_symbol(&mut self, b: u8) {
        let start = self.new_state();
        let accept = self.new_state();
        self.states[start].transitions.push((b, accept));
        self.stack.push(Fragment { start, accept });
    }

    pub(crate) fn push_epsilon(&mut self) {
        let start = self.new_state();
        let accept = self.new_state();
        self.states[start].epsilon.push(accept);
        self.stack.push(Fragment { start, accept });
    }

    /// Pops two fragments and pushes their concatenation: `a` then `b`.
    pub(crate) fn concat(&mut self) {
        let b = self.stack.pop().expect("concat requires two fragments");
        let a = self.stack.pop().expect("concat requires two fragments");
        self.states[a.accept].epsilon.push(b.start);
        self.stack.push(Fragment {
            start: a.start,
            accept: b.accept,
        });
    }

    /// Pops two fragments and pushes their union.
    pub(crate) fn union(&mut self) {
        let b = self.stack.pop().expect("union requires two fragments");
        let a = self.stack.pop().expect("union requires two fragments");
        let start = self.new_state();
        let accept = self.new_state();
        self.states[start].epsilon.push(a.start);
        self.states[start].epsilon.push(b.start);
        self.states[a.accept].epsilon.push(accept);
        self.states[b.accept].epsilon.push(accept);
        self.stack.push(Fragment { start, accept });
    }

    /// Pops one fragment and pushes its Kleene closure.
    pub(crate) fn star(&mut self) {
        let a = self.stack.pop().expect("star requires one fragment");
        let start = self.new_state();
        let accept = self.new_state();
        self.states[start].epsilon.push(a.start);
        self.states[start].epsilon.push(accept);
        self.states[a.accept].epsilon.push(a.start);
        self.states[a.accept].epsilon.push(accept);
        self.stack.push(Fragment { start, accept });
    }

    /// Consumes the builder, requiring exactly one fragment remains.
    pub(crate) fn finish(mut self) -> Option<Nfa> {
        if self.stack.len() != 1 {
            return None;
        }
        let frag = self.stack.pop().unwrap();
        Some(Nfa {
            states: self.states,
            start: frag.start,
            accept: frag.accept,
        })
    }
}

impl Nfa {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn accept(&self) -> usize {
        self.accept
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// The ε-closure of a set of states: the least superset closed under
    /// ε-transitions.
    fn epsilon_closure(&self, seeds: impl IntoIterator<Item = usize>) -> Vec<usize> {
        let mut closure: HashSet<usize> = HashSet::new();
        let mut queue: VecDeque<usize> = VecDeque::new();
        for s in seeds {
            if closure.insert(s) {
                queue.push_back(s);
            }
        }
        while let Some(s) = queue.pop_front() {
            for &t in &self.states[s].epsilon {
                if closure.insert(t) {
                    queue.push_back(t);
                }
            }
        }
        let mut v: Vec<usize> = closure.into_iter().collect();
        v.sort_unstable();
        v
    }

    fn mov(&self, states: &[usize], symbol: u8) -> Vec<usize> {
        let mut out = Vec::new();
        for &s in states {
            for &(b, t) in &self.states[s].transitions {
                if b == symbol {
                    out.push(t);
                }
            }
        }
        out
    }

    /// ε-closure subset construction, producing a complete DFA over
    /// `alphabet`. The result is completed with a dead state whenever any
    /// cell would otherwise be undefined, but is not minimized.
    pub fn to_dfa(&self, alphabet: &Alphabet) -> Dfa {
        let start_set = self.epsilon_closure([self.start]);
        let mut set_to_id: HashMap<Vec<usize>, usize> = HashMap::new();
        let mut queue: VecDeque<Vec<usize>> = VecDeque::new();
        set_to_id.insert(start_set.clone(), 0);
        queue.push_back(start_set);

        let k = alphabet.len();
        let mut rows: Vec<Vec<Option<usize>>> = Vec::new();
        let mut accepting: Vec<bool> = Vec::new();

        while let Some(set) = queue.pop_front() {
            let id = set_to_id[&set];
            if rows.len() <= id {
                rows.resize(id + 1, Vec::new());
                accepting.resize(id + 1, false);
            }
            rows[id] = vec![None; k];
            accepting[id] = set.contains(&self.accept);

            for (col, &symbol) in alphabet.symbols().iter().enumerate() {
                let moved = self.mov(&set, symbol);
                if moved.is_empty() {
                    continue;
                }
                let closed = self.epsilon_closure(moved);
                let next_id = match set_to_id.get(&closed) {
                    Some(&id) => id,
                    None => {
                        let new_id = set_to_id.len();
                        set_to_id.insert(closed.clone(), new_id);
                        queue.push_back(closed);
                        new_id
                    }
                };
                rows[id][col] = Some(next_id);
            }
        }

        Dfa::from_partial(alphabet.clone(), rows, 0, accepting)
    }
}
