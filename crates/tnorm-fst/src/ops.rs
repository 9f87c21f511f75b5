// Rational operations, composition and optimization on vector transducers.
//
// Every operation returns a new transducer and leaves its arguments intact.
// State numbering of the results depends only on the arguments, so a grammar
// built twice from the same tables is identical state for state.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::hash::Hash;

use hashbrown::{HashMap, HashSet};

use crate::FstError;
use crate::fst::{EPSILON, Label, State, StateId, Transition, VectorFst};
use crate::symbols::display_label;
use crate::weight::Weight;

/// Side kept by [`project`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    Input,
    Output,
}

// ---------------------------------------------------------------------------
// Rational operations
// ---------------------------------------------------------------------------

/// Union of two transducers.
pub fn union(a: &VectorFst, b: &VectorFst) -> VectorFst {
    union_weighted(&[(a, Weight::one()), (b, Weight::one())])
}

/// Union of any number of transducers.
pub fn union_all(parts: &[&VectorFst]) -> VectorFst {
    let weighted: Vec<(&VectorFst, Weight)> = parts.iter().map(|&f| (f, Weight::one())).collect();
    union_weighted(&weighted)
}

/// Union in which every alternative is offset by its own weight.
pub fn union_weighted(parts: &[(&VectorFst, Weight)]) -> VectorFst {
    let mut out = VectorFst::new();
    let start = out.add_state();
    out.set_start(start);
    for &(fst, weight) in parts {
        let Some(s) = fst.start() else {
            continue;
        };
        let offset = out.append(fst);
        out.add_transition(start, Transition::new(EPSILON, EPSILON, weight, s + offset));
    }
    out
}

/// Concatenation: paths of `a` followed by paths of `b`, weights added.
pub fn concat(a: &VectorFst, b: &VectorFst) -> VectorFst {
    let Some(b_start) = b.start() else {
        return VectorFst::empty();
    };
    if a.is_empty() {
        return VectorFst::empty();
    }
    let mut out = a.clone();
    let a_states = a.num_states() as StateId;
    let offset = out.append(b);
    for s in 0..a_states {
        let fw = out.final_weight(s);
        if !fw.is_zero() {
            out.set_final(s, Weight::zero());
            out.add_transition(s, Transition::new(EPSILON, EPSILON, fw, b_start + offset));
        }
    }
    out
}

/// Concatenation of a sequence of transducers.
pub fn concat_all(parts: &[&VectorFst]) -> VectorFst {
    parts
        .iter()
        .fold(VectorFst::epsilon(), |acc, part| concat(&acc, part))
}

/// Kleene star.
pub fn star(fst: &VectorFst) -> VectorFst {
    let mut out = VectorFst::new();
    let start = out.add_state();
    out.set_start(start);
    out.set_final(start, Weight::one());
    let Some(s) = fst.start() else {
        return out;
    };
    let offset = out.append(fst);
    out.add_transition(start, Transition::new(EPSILON, EPSILON, Weight::one(), s + offset));
    for q in offset..out.num_states() as StateId {
        let fw = out.final_weight(q);
        if !fw.is_zero() {
            out.set_final(q, Weight::zero());
            out.add_transition(q, Transition::new(EPSILON, EPSILON, fw, start));
        }
    }
    out
}

/// One or more repetitions.
pub fn plus(fst: &VectorFst) -> VectorFst {
    concat(fst, &star(fst))
}

/// Zero or one occurrence.
pub fn optional(fst: &VectorFst) -> VectorFst {
    union(fst, &VectorFst::epsilon())
}

/// Repetition between `min` and `max` times (`None` = unbounded).
///
/// A bounded tail is built as nested optionals `(a (a (a)?)?)?`, so every
/// repetition count has exactly one path. `closure(a, n, Some(n))` is exactly
/// `n` copies of `a`.
pub fn closure(fst: &VectorFst, min: usize, max: Option<usize>) -> VectorFst {
    if max.is_some_and(|max| max < min) {
        return VectorFst::empty();
    }
    let mut out = VectorFst::epsilon();
    for _ in 0..min {
        out = concat(&out, fst);
    }
    match max {
        None => concat(&out, &star(fst)),
        Some(max) => {
            let mut tail = VectorFst::epsilon();
            for _ in min..max {
                tail = optional(&concat(fst, &tail));
            }
            concat(&out, &tail)
        }
    }
}

/// Add `weight` to every complete path.
pub fn add_weight(fst: &VectorFst, weight: Weight) -> VectorFst {
    let mut out = fst.clone();
    for s in out.state_ids() {
        let fw = out.final_weight(s);
        if !fw.is_zero() {
            out.set_final(s, fw.times(weight));
        }
    }
    out
}

/// Keep one side of every arc as both input and output.
pub fn project(fst: &VectorFst, side: ProjectType) -> VectorFst {
    let mut out = fst.clone();
    for s in out.state_ids() {
        for t in out.transitions_mut(s) {
            match side {
                ProjectType::Input => t.olabel = t.ilabel,
                ProjectType::Output => t.ilabel = t.olabel,
            }
        }
    }
    out
}

/// Swap input and output labels.
pub fn invert(fst: &VectorFst) -> VectorFst {
    let mut out = fst.clone();
    for s in out.state_ids() {
        for t in out.transitions_mut(s) {
            std::mem::swap(&mut t.ilabel, &mut t.olabel);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Difference
// ---------------------------------------------------------------------------

/// Subset-construction view of an unweighted acceptor over its input side.
struct DeterministicAcceptor {
    start: Option<u32>,
    finals: Vec<bool>,
    delta: Vec<BTreeMap<Label, u32>>,
}

impl DeterministicAcceptor {
    fn new(fst: &VectorFst) -> Self {
        let mut det = Self {
            start: None,
            finals: Vec::new(),
            delta: Vec::new(),
        };
        let Some(start) = fst.start() else {
            return det;
        };

        let mut ids: HashMap<Vec<StateId>, u32> = HashMap::new();
        let mut queue: VecDeque<Vec<StateId>> = VecDeque::new();
        let initial = Self::epsilon_closure(fst, [start]);
        ids.insert(initial.clone(), 0);
        det.finals.push(false);
        det.delta.push(BTreeMap::new());
        queue.push_back(initial);
        det.start = Some(0);

        while let Some(subset) = queue.pop_front() {
            let id = ids[&subset];
            det.finals[id as usize] = subset.iter().any(|&q| fst.is_final(q));
            let mut moves: BTreeMap<Label, BTreeSet<StateId>> = BTreeMap::new();
            for &q in &subset {
                for t in fst.transitions(q) {
                    if t.ilabel != EPSILON {
                        moves.entry(t.ilabel).or_default().insert(t.target);
                    }
                }
            }
            for (label, targets) in moves {
                let next = Self::epsilon_closure(fst, targets);
                let next_id = match ids.get(&next) {
                    Some(&next_id) => next_id,
                    None => {
                        let next_id = det.finals.len() as u32;
                        ids.insert(next.clone(), next_id);
                        det.finals.push(false);
                        det.delta.push(BTreeMap::new());
                        queue.push_back(next);
                        next_id
                    }
                };
                det.delta[id as usize].insert(label, next_id);
            }
        }
        det
    }

    fn epsilon_closure(fst: &VectorFst, seed: impl IntoIterator<Item = StateId>) -> Vec<StateId> {
        let mut seen: BTreeSet<StateId> = BTreeSet::new();
        let mut stack: Vec<StateId> = seed.into_iter().collect();
        while let Some(q) = stack.pop() {
            if !seen.insert(q) {
                continue;
            }
            for t in fst.transitions(q) {
                if t.ilabel == EPSILON && !seen.contains(&t.target) {
                    stack.push(t.target);
                }
            }
        }
        seen.into_iter().collect()
    }

    #[inline]
    fn next(&self, state: u32, label: Label) -> Option<u32> {
        self.delta[state as usize].get(&label).copied()
    }

    #[inline]
    fn is_final(&self, state: u32) -> bool {
        self.finals[state as usize]
    }
}

/// Paths of `a` whose input string is not accepted by `b`.
///
/// `b` is read as an unweighted acceptor over its input labels.
pub fn difference(a: &VectorFst, b: &VectorFst) -> VectorFst {
    let Some(a_start) = a.start() else {
        return VectorFst::empty();
    };
    let det = DeterministicAcceptor::new(b);
    let mut out = VectorFst::new();
    let mut ids: HashMap<(StateId, Option<u32>), StateId> = HashMap::new();
    let mut queue = VecDeque::new();
    let start = intern((a_start, det.start), &mut out, &mut ids, &mut queue);
    out.set_start(start);

    while let Some((qa, qd)) = queue.pop_front() {
        let id = ids[&(qa, qd)];
        let rejected_by_b = !qd.is_some_and(|d| det.is_final(d));
        if a.is_final(qa) && rejected_by_b {
            out.set_final(id, a.final_weight(qa));
        }
        for t in a.transitions(qa) {
            let nd = if t.ilabel == EPSILON {
                qd
            } else {
                qd.and_then(|d| det.next(d, t.ilabel))
            };
            let target = intern((t.target, nd), &mut out, &mut ids, &mut queue);
            out.add_transition(id, Transition::new(t.ilabel, t.olabel, t.weight, target));
        }
    }
    connect(&out)
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Relational composition: `a` followed by `b`.
///
/// Every non-epsilon output label of `a` must be an input label of `b`;
/// otherwise the stages cannot be chained and
/// [`FstError::AlphabetMismatch`] lists the offending symbols.
///
/// Epsilon moves are sequenced with a two-state filter: moves of `a` alone
/// (output ε) come before moves of `b` alone (input ε), so every pair of
/// matching paths yields one composed path.
pub fn compose(a: &VectorFst, b: &VectorFst) -> Result<VectorFst, FstError> {
    let b_inputs = b.input_alphabet();
    let missing: Vec<String> = a
        .output_alphabet()
        .difference(&b_inputs)
        .map(|&l| display_label(l))
        .collect();
    if !missing.is_empty() {
        return Err(FstError::AlphabetMismatch { symbols: missing });
    }
    let (Some(a_start), Some(b_start)) = (a.start(), b.start()) else {
        return Ok(VectorFst::empty());
    };

    let b_sorted: Vec<Vec<Transition>> = b
        .state_ids()
        .map(|s| {
            let mut arcs = b.transitions(s).to_vec();
            arcs.sort_by_key(|t| (t.ilabel, t.olabel, t.target));
            arcs
        })
        .collect();

    let mut out = VectorFst::new();
    let mut ids: HashMap<(StateId, StateId, u8), StateId> = HashMap::new();
    let mut queue = VecDeque::new();
    let start = intern((a_start, b_start, 0u8), &mut out, &mut ids, &mut queue);
    out.set_start(start);

    while let Some((qa, qb, filter)) = queue.pop_front() {
        let id = ids[&(qa, qb, filter)];
        if a.is_final(qa) && b.is_final(qb) {
            out.set_final(id, a.final_weight(qa).times(b.final_weight(qb)));
        }
        let b_arcs = &b_sorted[qb as usize];

        for ta in a.transitions(qa) {
            if ta.olabel == EPSILON {
                if filter == 0 {
                    let target = intern((ta.target, qb, 0), &mut out, &mut ids, &mut queue);
                    out.add_transition(
                        id,
                        Transition::new(ta.ilabel, EPSILON, ta.weight, target),
                    );
                }
                continue;
            }
            let lo = b_arcs.partition_point(|t| t.ilabel < ta.olabel);
            for tb in b_arcs[lo..].iter().take_while(|t| t.ilabel == ta.olabel) {
                let target = intern((ta.target, tb.target, 0), &mut out, &mut ids, &mut queue);
                out.add_transition(
                    id,
                    Transition::new(ta.ilabel, tb.olabel, ta.weight.times(tb.weight), target),
                );
            }
        }

        let eps_end = b_arcs.partition_point(|t| t.ilabel == EPSILON);
        for tb in &b_arcs[..eps_end] {
            let target = intern((qa, tb.target, 1), &mut out, &mut ids, &mut queue);
            out.add_transition(id, Transition::new(EPSILON, tb.olabel, tb.weight, target));
        }
    }
    Ok(connect(&out))
}

/// Look up or create the output state for a product tuple.
fn intern<K: Hash + Eq + Copy>(
    key: K,
    out: &mut VectorFst,
    ids: &mut HashMap<K, StateId>,
    queue: &mut VecDeque<K>,
) -> StateId {
    if let Some(&id) = ids.get(&key) {
        return id;
    }
    let id = out.add_state();
    ids.insert(key, id);
    queue.push_back(key);
    id
}

// ---------------------------------------------------------------------------
// Optimization
// ---------------------------------------------------------------------------

/// Remove ε:ε arcs.
///
/// For every state the shortest ε-distance to each state of its ε-closure is
/// computed (queue-based Bellman-Ford); the closure's non-ε arcs and final
/// weights are then copied onto the state with that distance added.
pub fn rm_epsilon(fst: &VectorFst) -> Result<VectorFst, FstError> {
    let Some(start) = fst.start() else {
        return Ok(VectorFst::empty());
    };
    let n = fst.num_states();
    let mut dist = vec![Weight::zero(); n];
    let mut relaxations = vec![0u32; n];
    let mut states = Vec::with_capacity(n);

    for s in fst.state_ids() {
        let closure = epsilon_distances(fst, s, &mut dist, &mut relaxations)?;
        let mut state = State {
            transitions: Vec::new(),
            final_weight: Weight::zero(),
        };
        for &q in &closure {
            let d = dist[q as usize];
            state.final_weight = state.final_weight.plus(d.times(fst.final_weight(q)));
            for t in fst.transitions(q) {
                if !t.is_epsilon() {
                    state.transitions.push(Transition {
                        weight: d.times(t.weight),
                        ..*t
                    });
                }
            }
        }
        dedupe_parallel(&mut state.transitions);
        for &q in &closure {
            dist[q as usize] = Weight::zero();
            relaxations[q as usize] = 0;
        }
        states.push(state);
    }
    Ok(VectorFst::from_parts(states, Some(start)))
}

fn epsilon_distances(
    fst: &VectorFst,
    source: StateId,
    dist: &mut [Weight],
    relaxations: &mut [u32],
) -> Result<Vec<StateId>, FstError> {
    let limit = fst.num_states() as u32;
    let mut touched = vec![source];
    dist[source as usize] = Weight::one();
    let mut queue = VecDeque::from([source]);
    let mut queued: HashSet<StateId> = HashSet::from([source]);

    while let Some(q) = queue.pop_front() {
        queued.remove(&q);
        let dq = dist[q as usize];
        for t in fst.transitions(q).iter().filter(|t| t.is_epsilon()) {
            let target = t.target as usize;
            let nd = dq.times(t.weight);
            if nd < dist[target] {
                if dist[target].is_zero() {
                    touched.push(t.target);
                }
                dist[target] = nd;
                relaxations[target] += 1;
                if relaxations[target] > limit {
                    for &q in &touched {
                        dist[q as usize] = Weight::zero();
                        relaxations[q as usize] = 0;
                    }
                    return Err(FstError::NegativeCycle { state: source });
                }
                if queued.insert(t.target) {
                    queue.push_back(t.target);
                }
            }
        }
    }
    Ok(touched)
}

/// Sort arcs and keep only the cheapest of parallel arcs with equal labels
/// and target.
fn dedupe_parallel(transitions: &mut Vec<Transition>) {
    transitions.sort_by_key(|t| (t.ilabel, t.olabel, t.target, t.weight));
    transitions.dedup_by(|b, a| a.ilabel == b.ilabel && a.olabel == b.olabel && a.target == b.target);
}

/// Remove states that are not on some start-to-final path.
pub fn connect(fst: &VectorFst) -> VectorFst {
    let Some(start) = fst.start() else {
        return VectorFst::empty();
    };
    let n = fst.num_states();

    let mut accessible = vec![false; n];
    let mut stack = vec![start];
    accessible[start as usize] = true;
    while let Some(q) = stack.pop() {
        for t in fst.transitions(q) {
            if !accessible[t.target as usize] {
                accessible[t.target as usize] = true;
                stack.push(t.target);
            }
        }
    }

    let mut reverse: Vec<Vec<StateId>> = vec![Vec::new(); n];
    for s in fst.state_ids() {
        for t in fst.transitions(s) {
            reverse[t.target as usize].push(s);
        }
    }
    let mut coaccessible = vec![false; n];
    let mut stack: Vec<StateId> = fst.state_ids().filter(|&s| fst.is_final(s)).collect();
    for &s in &stack {
        coaccessible[s as usize] = true;
    }
    while let Some(q) = stack.pop() {
        for &p in &reverse[q as usize] {
            if !coaccessible[p as usize] {
                coaccessible[p as usize] = true;
                stack.push(p);
            }
        }
    }

    let keep = |s: StateId| accessible[s as usize] && coaccessible[s as usize];
    if !keep(start) {
        return VectorFst::empty();
    }

    let mut new_id = vec![StateId::MAX; n];
    let mut next = 0;
    for s in fst.state_ids() {
        if keep(s) {
            new_id[s as usize] = next;
            next += 1;
        }
    }
    let mut states = Vec::with_capacity(next as usize);
    for s in fst.state_ids().filter(|&s| keep(s)) {
        let transitions = fst
            .transitions(s)
            .iter()
            .filter(|t| keep(t.target))
            .map(|t| Transition {
                target: new_id[t.target as usize],
                ..*t
            })
            .collect();
        states.push(State {
            transitions,
            final_weight: fst.final_weight(s),
        });
    }
    VectorFst::from_parts(states, Some(new_id[start as usize]))
}

/// Merge equivalent states by partition refinement.
///
/// States start out grouped by final weight. Each round regroups them by
/// (current class, sorted set of (input, output, weight, target class)) until
/// the number of classes stops growing. Class ids are assigned in state order,
/// so the result is independent of hashing.
pub fn minimize(fst: &VectorFst) -> VectorFst {
    let Some(start) = fst.start() else {
        return VectorFst::empty();
    };
    let n = fst.num_states();

    let mut by_final: HashMap<i64, u32> = HashMap::new();
    let mut class: Vec<u32> = Vec::with_capacity(n);
    for s in fst.state_ids() {
        let len = by_final.len() as u32;
        class.push(*by_final.entry(fst.final_weight(s).ticks()).or_insert(len));
    }
    let mut num_classes = by_final.len();

    loop {
        let mut keys: HashMap<(u32, Vec<(Label, Label, i64, u32)>), u32> = HashMap::new();
        let mut next = Vec::with_capacity(n);
        for s in fst.state_ids() {
            let mut signature: Vec<(Label, Label, i64, u32)> = fst
                .transitions(s)
                .iter()
                .map(|t| (t.ilabel, t.olabel, t.weight.ticks(), class[t.target as usize]))
                .collect();
            signature.sort_unstable();
            signature.dedup();
            let len = keys.len() as u32;
            next.push(*keys.entry((class[s as usize], signature)).or_insert(len));
        }
        let count = keys.len();
        class = next;
        if count == num_classes {
            break;
        }
        num_classes = count;
    }

    let mut states: Vec<Option<State>> = vec![None; num_classes];
    for s in fst.state_ids() {
        let c = class[s as usize] as usize;
        if states[c].is_some() {
            continue;
        }
        let mut transitions: Vec<Transition> = fst
            .transitions(s)
            .iter()
            .map(|t| Transition {
                target: class[t.target as usize],
                ..*t
            })
            .collect();
        dedupe_parallel(&mut transitions);
        states[c] = Some(State {
            transitions,
            final_weight: fst.final_weight(s),
        });
    }
    VectorFst::from_parts(
        states.into_iter().flatten().collect(),
        Some(class[start as usize]),
    )
}

/// Sort every state's arcs by (input, output, target, weight).
pub fn arc_sort(fst: &mut VectorFst) {
    for s in fst.state_ids() {
        fst.transitions_mut(s)
            .sort_by_key(|t| (t.ilabel, t.olabel, t.target, t.weight));
    }
}

/// Epsilon removal, trimming, minimization and arc sorting.
pub fn optimize(fst: &VectorFst) -> Result<VectorFst, FstError> {
    let without_eps = rm_epsilon(fst)?;
    let trimmed = connect(&without_eps);
    let mut minimal = minimize(&trimmed);
    arc_sort(&mut minimal);
    Ok(minimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Lattice;
    use tnorm_core::charset::CharSet;

    fn best(fst: &VectorFst, input: &str) -> Option<(String, Weight)> {
        let fst = optimize(fst).unwrap();
        Lattice::compile(&fst, input)
            .ok()
            .map(|l| {
                let c = l.shortest_path();
                (c.output, c.weight)
            })
    }

    fn accepts(fst: &VectorFst, input: &str) -> bool {
        best(fst, input).is_some()
    }

    #[test]
    fn union_keeps_per_alternative_weights() {
        let a = add_weight(&VectorFst::cross("1", "one"), Weight::new(0.5));
        let b = add_weight(&VectorFst::cross("1", "ek"), Weight::new(0.1));
        let u = union(&a, &b);
        assert_eq!(best(&u, "1"), Some(("ek".to_string(), Weight::new(0.1))));
    }

    #[test]
    fn concat_adds_weights() {
        let a = add_weight(&VectorFst::accep("a"), Weight::new(0.25));
        let b = add_weight(&VectorFst::accep("b"), Weight::new(0.5));
        let ab = concat(&a, &b);
        assert_eq!(best(&ab, "ab"), Some(("ab".to_string(), Weight::new(0.75))));
        assert!(!accepts(&ab, "a"));
    }

    #[test]
    fn bounded_closure_exact_count() {
        let digit = VectorFst::char_class(&CharSet::from_range('0', '9'));
        let five = closure(&digit, 5, Some(5));
        assert!(accepts(&five, "12345"));
        assert!(!accepts(&five, "1234"));
        assert!(!accepts(&five, "123456"));
        assert!(!accepts(&five, ""));
    }

    #[test]
    fn bounded_closure_range() {
        let a = VectorFst::accep("a");
        let upto3 = closure(&a, 0, Some(3));
        for (input, expected) in [("", true), ("a", true), ("aaa", true), ("aaaa", false)] {
            assert_eq!(accepts(&upto3, input), expected, "{input:?}");
        }
        let at_least2 = closure(&a, 2, None);
        assert!(!accepts(&at_least2, "a"));
        assert!(accepts(&at_least2, "aaaaaaa"));
        assert!(closure(&a, 3, Some(2)).is_empty());
    }

    #[test]
    fn star_and_plus() {
        let ab = VectorFst::accep("ab");
        assert!(accepts(&star(&ab), ""));
        assert!(accepts(&star(&ab), "ababab"));
        assert!(!accepts(&plus(&ab), ""));
        assert!(accepts(&plus(&ab), "ab"));
    }

    #[test]
    fn difference_removes_strings() {
        let units = VectorFst::union_of_strings(&["kg", "yr", "km"]);
        let no_year = difference(&units, &VectorFst::accep("yr"));
        assert!(accepts(&no_year, "kg"));
        assert!(accepts(&no_year, "km"));
        assert!(!accepts(&no_year, "yr"));
    }

    #[test]
    fn difference_with_prefix_language() {
        let digits = plus(&VectorFst::char_class(&CharSet::from_range('0', '9')));
        let zero_led = concat(&VectorFst::accep("0"), &star(&VectorFst::char_class(&CharSet::from_range('0', '9'))));
        let no_leading_zero = difference(&digits, &zero_led);
        assert!(accepts(&no_leading_zero, "10"));
        assert!(!accepts(&no_leading_zero, "01"));
        assert!(!accepts(&no_leading_zero, "0"));
    }

    #[test]
    fn compose_chains_relations() {
        let a = VectorFst::cross("1", "x");
        let b = add_weight(&VectorFst::cross("x", "एक"), Weight::new(0.3));
        let ab = compose(&a, &b).unwrap();
        assert_eq!(best(&ab, "1"), Some(("एक".to_string(), Weight::new(0.3))));
    }

    #[test]
    fn compose_handles_epsilons_on_both_sides() {
        // a deletes, b inserts: one composed path only.
        let a = concat(&VectorFst::delete("-"), &VectorFst::accep("x"));
        let b = concat(&VectorFst::insert("neg "), &VectorFst::accep("x"));
        let ab = optimize(&compose(&a, &b).unwrap()).unwrap();
        let lattice = Lattice::compile(&ab, "-x").unwrap();
        let all = lattice.candidates(10);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].output, "neg x");
    }

    #[test]
    fn compose_reports_alphabet_mismatch() {
        let a = VectorFst::cross("1", "q");
        let b = VectorFst::cross("x", "y");
        match compose(&a, &b) {
            Err(FstError::AlphabetMismatch { symbols }) => assert_eq!(symbols, vec!["q"]),
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn rm_epsilon_preserves_language() {
        let u = union(&VectorFst::accep("a"), &VectorFst::epsilon());
        let opt = rm_epsilon(&u).unwrap();
        assert!(opt.state_ids().all(|s| opt.transitions(s).iter().all(|t| !t.is_epsilon())));
        assert!(accepts(&opt, ""));
        assert!(accepts(&opt, "a"));
    }

    #[test]
    fn rm_epsilon_rejects_negative_cycle() {
        let looped = star(&add_weight(&VectorFst::epsilon(), Weight::new(-1.0)));
        assert!(matches!(
            rm_epsilon(&looped),
            Err(FstError::NegativeCycle { .. })
        ));
    }

    #[test]
    fn connect_trims_dead_states() {
        let mut fst = VectorFst::accep("ab");
        let dead = fst.add_state();
        fst.add_transition(0, Transition::new('z' as Label, 'z' as Label, Weight::one(), dead));
        let trimmed = connect(&fst);
        assert_eq!(trimmed.num_states(), 3);
        assert!(connect(&VectorFst::char_class(&CharSet::new())).is_empty());
    }

    #[test]
    fn minimize_merges_equivalent_suffixes() {
        let words = VectorFst::union_of_strings(&["cat", "bat", "rat"]);
        let min = optimize(&words).unwrap();
        assert_eq!(min.num_states(), 4);
        assert!(accepts(&min, "bat"));
        assert!(!accepts(&min, "at"));
    }

    #[test]
    fn optimize_is_deterministic() {
        let build = || {
            let a = add_weight(&VectorFst::cross("1.5", "डेढ़"), Weight::new(-0.2));
            let b = VectorFst::cross("1.5", "एक दशमलव पाँच");
            optimize(&union(&a, &b)).unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn project_and_invert() {
        let m = VectorFst::cross("kg", "किलो");
        let input = project(&m, ProjectType::Input);
        assert_eq!(input.input_alphabet(), input.output_alphabet());
        assert!(accepts(&input, "kg"));
        let inv = invert(&m);
        assert_eq!(best(&inv, "किलो").map(|b| b.0), Some("kg".to_string()));
    }
}
