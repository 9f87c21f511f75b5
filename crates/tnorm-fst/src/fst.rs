// Mutable vector transducer and primitive constructors.

use std::collections::BTreeSet;

use hashbrown::HashMap;
use tnorm_core::charset::CharSet;

use crate::symbols::{label_of, labels};
use crate::weight::Weight;

/// State index.
pub type StateId = u32;

/// Arc label: `0` is epsilon, every other value is a Unicode scalar value.
pub type Label = u32;

/// The epsilon label.
pub const EPSILON: Label = 0;

/// A weighted arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    pub ilabel: Label,
    pub olabel: Label,
    pub weight: Weight,
    pub target: StateId,
}

impl Transition {
    pub fn new(ilabel: Label, olabel: Label, weight: Weight, target: StateId) -> Self {
        Self {
            ilabel,
            olabel,
            weight,
            target,
        }
    }

    /// Whether both labels are epsilon.
    #[inline]
    pub fn is_epsilon(&self) -> bool {
        self.ilabel == EPSILON && self.olabel == EPSILON
    }
}

/// A state: outgoing arcs plus final weight (`Weight::zero()` when not final).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub transitions: Vec<Transition>,
    pub final_weight: Weight,
}

impl State {
    fn new() -> Self {
        Self {
            transitions: Vec::new(),
            final_weight: Weight::zero(),
        }
    }
}

/// Weighted transducer stored as a vector of states.
///
/// A transducer without a start state accepts nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VectorFst {
    states: Vec<State>,
    start: Option<StateId>,
}

impl VectorFst {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self) -> StateId {
        self.states.push(State::new());
        (self.states.len() - 1) as StateId
    }

    pub fn set_start(&mut self, state: StateId) {
        self.start = Some(state);
    }

    pub fn start(&self) -> Option<StateId> {
        self.start
    }

    pub fn set_final(&mut self, state: StateId, weight: Weight) {
        self.states[state as usize].final_weight = weight;
    }

    pub fn final_weight(&self, state: StateId) -> Weight {
        self.states[state as usize].final_weight
    }

    pub fn is_final(&self, state: StateId) -> bool {
        !self.states[state as usize].final_weight.is_zero()
    }

    pub fn add_transition(&mut self, state: StateId, transition: Transition) {
        self.states[state as usize].transitions.push(transition);
    }

    pub fn transitions(&self, state: StateId) -> &[Transition] {
        &self.states[state as usize].transitions
    }

    pub fn transitions_mut(&mut self, state: StateId) -> &mut Vec<Transition> {
        &mut self.states[state as usize].transitions
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_transitions(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }

    /// Iterate state ids in index order.
    pub fn state_ids(&self) -> std::ops::Range<StateId> {
        0..self.states.len() as StateId
    }

    /// Whether the transducer accepts nothing because it has no start state.
    pub fn is_empty(&self) -> bool {
        self.start.is_none()
    }

    /// Non-epsilon input labels used on any arc.
    pub fn input_alphabet(&self) -> BTreeSet<Label> {
        self.alphabet(|t| t.ilabel)
    }

    /// Non-epsilon output labels used on any arc.
    pub fn output_alphabet(&self) -> BTreeSet<Label> {
        self.alphabet(|t| t.olabel)
    }

    fn alphabet(&self, side: impl Fn(&Transition) -> Label) -> BTreeSet<Label> {
        self.states
            .iter()
            .flat_map(|s| s.transitions.iter())
            .map(side)
            .filter(|&l| l != EPSILON)
            .collect()
    }

    /// Append all states of `other`, returning the offset of its first state.
    /// The start state of `self` is unchanged.
    pub(crate) fn append(&mut self, other: &VectorFst) -> StateId {
        let offset = self.states.len() as StateId;
        for state in &other.states {
            let mut copy = state.clone();
            for t in &mut copy.transitions {
                t.target += offset;
            }
            self.states.push(copy);
        }
        offset
    }

    /// Replace the state vector (used by the optimizer after renumbering).
    pub(crate) fn from_parts(states: Vec<State>, start: Option<StateId>) -> Self {
        Self { states, start }
    }

    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// The empty language.
    pub fn empty() -> Self {
        Self::new()
    }

    /// Accepts only the empty string.
    pub fn epsilon() -> Self {
        let mut fst = Self::new();
        let s = fst.add_state();
        fst.set_start(s);
        fst.set_final(s, Weight::one());
        fst
    }

    /// Acceptor for exactly `s`.
    pub fn accep(s: &str) -> Self {
        Self::cross(s, s)
    }

    /// Transducer rewriting exactly `input` to `output`. Labels are aligned
    /// position by position and the shorter side is padded with epsilon.
    pub fn cross(input: &str, output: &str) -> Self {
        let ilabels = labels(input);
        let olabels = labels(output);
        let len = ilabels.len().max(olabels.len());
        let mut fst = Self::new();
        let mut cur = fst.add_state();
        fst.set_start(cur);
        for i in 0..len {
            let next = fst.add_state();
            let il = ilabels.get(i).copied().unwrap_or(EPSILON);
            let ol = olabels.get(i).copied().unwrap_or(EPSILON);
            fst.add_transition(cur, Transition::new(il, ol, Weight::one(), next));
            cur = next;
        }
        fst.set_final(cur, Weight::one());
        fst
    }

    /// Emit `s` without consuming input.
    pub fn insert(s: &str) -> Self {
        Self::cross("", s)
    }

    /// Consume `s` without emitting output.
    pub fn delete(s: &str) -> Self {
        Self::cross(s, "")
    }

    /// Acceptor for any single character of `set`.
    pub fn char_class(set: &CharSet) -> Self {
        let mut fst = Self::new();
        let start = fst.add_state();
        let end = fst.add_state();
        fst.set_start(start);
        fst.set_final(end, Weight::one());
        for c in set.iter() {
            let l = label_of(c);
            fst.add_transition(start, Transition::new(l, l, Weight::one(), end));
        }
        fst
    }

    /// Transducer for a finite relation given as (input, output) pairs.
    ///
    /// Inputs are laid out as a trie. Pairs with identical sides are shared
    /// as acceptor paths, the others consume their input on `c:ε` arcs and
    /// emit the output afterwards on `ε:c` arcs.
    pub fn string_map<I, O>(pairs: &[(I, O)]) -> Self
    where
        I: AsRef<str>,
        O: AsRef<str>,
    {
        let mut fst = Self::new();
        let root = fst.add_state();
        fst.set_start(root);
        let mut children: HashMap<(StateId, Label, Label), StateId> = HashMap::new();

        for (input, output) in pairs {
            let (input, output) = (input.as_ref(), output.as_ref());
            let identity = input == output;
            let mut cur = root;
            for l in labels(input) {
                let ol = if identity { l } else { EPSILON };
                cur = match children.get(&(cur, l, ol)) {
                    Some(&next) => next,
                    None => {
                        let next = fst.add_state();
                        fst.add_transition(cur, Transition::new(l, ol, Weight::one(), next));
                        children.insert((cur, l, ol), next);
                        next
                    }
                };
            }
            if identity {
                fst.set_final(cur, Weight::one());
                continue;
            }
            for l in labels(output) {
                let next = fst.add_state();
                fst.add_transition(cur, Transition::new(EPSILON, l, Weight::one(), next));
                cur = next;
            }
            fst.set_final(cur, Weight::one());
        }
        fst
    }

    /// Acceptor for any string of the given words.
    pub fn union_of_strings<S: AsRef<str>>(words: &[S]) -> Self {
        let pairs: Vec<(&str, &str)> = words.iter().map(|w| (w.as_ref(), w.as_ref())).collect();
        Self::string_map(&pairs)
    }
}
