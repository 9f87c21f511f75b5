// Input-by-grammar lattice, shortest path and n-best enumeration.

use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};

use crate::candidate::Candidate;
use crate::config::{ApplyConfig, SearchEntry, TraversalConfig};
use crate::fst::{EPSILON, StateId, Transition, VectorFst};
use crate::ops::connect;
use crate::symbols::{char_of, labels};
use crate::weight::Weight;
use crate::{FstError, MAX_LOOP_COUNT, Transducer};

/// All paths of a transducer that read exactly one input string.
///
/// States are pairs (input position, transducer state); arcs carry the
/// output label only. The lattice is trimmed and acyclic, and the best
/// (weight, output) completion of every state is computed once at compile
/// time.
#[derive(Debug, Clone)]
pub struct Lattice {
    input: String,
    fst: VectorFst,
    best: Vec<(Weight, String)>,
}

impl Lattice {
    /// Compile `input` against `fst`.
    ///
    /// Arcs sorted by input label (as left by `optimize`) are matched by
    /// binary search, other states are scanned.
    pub fn compile(fst: &VectorFst, input: &str) -> Result<Self, FstError> {
        let unrecognized = || FstError::Unrecognized {
            input: input.to_string(),
        };
        let start = fst.start().ok_or_else(unrecognized)?;
        let chars = labels(input);

        let mut out = VectorFst::new();
        let mut ids: HashMap<(usize, StateId), StateId> = HashMap::new();
        let mut queue: VecDeque<(usize, StateId)> = VecDeque::new();
        let root = out.add_state();
        out.set_start(root);
        ids.insert((0, start), root);
        queue.push_back((0, start));

        while let Some((pos, q)) = queue.pop_front() {
            let id = ids[&(pos, q)];
            if pos == chars.len() && fst.is_final(q) {
                out.set_final(id, fst.final_weight(q));
            }
            let arcs = fst.transitions(q);
            let next_label = chars.get(pos).copied();
            let mut follow = |t: &Transition, next_pos: usize, out: &mut VectorFst| {
                let key = (next_pos, t.target);
                let target = match ids.get(&key) {
                    Some(&target) => target,
                    None => {
                        let target = out.add_state();
                        ids.insert(key, target);
                        queue.push_back(key);
                        target
                    }
                };
                out.add_transition(id, Transition::new(t.olabel, t.olabel, t.weight, target));
            };

            if arcs.is_sorted_by_key(|t| t.ilabel) {
                let eps_end = arcs.partition_point(|t| t.ilabel == EPSILON);
                for t in &arcs[..eps_end] {
                    follow(t, pos, &mut out);
                }
                if let Some(label) = next_label {
                    let lo = arcs.partition_point(|t| t.ilabel < label);
                    for t in arcs[lo..].iter().take_while(|t| t.ilabel == label) {
                        follow(t, pos + 1, &mut out);
                    }
                }
            } else {
                for t in arcs {
                    if t.ilabel == EPSILON {
                        follow(t, pos, &mut out);
                    } else if Some(t.ilabel) == next_label {
                        follow(t, pos + 1, &mut out);
                    }
                }
            }
        }

        let fst = connect(&out);
        let start = fst.start().ok_or_else(unrecognized)?;
        let order = topological_order(&fst).ok_or_else(|| FstError::CyclicLattice {
            input: input.to_string(),
        })?;
        debug_assert_eq!(order.first().copied(), Some(start));

        let mut best: Vec<(Weight, String)> = vec![(Weight::zero(), String::new()); fst.num_states()];
        for &s in order.iter().rev() {
            let mut cur = (fst.final_weight(s), String::new());
            for t in fst.transitions(s) {
                let (suffix_weight, suffix) = &best[t.target as usize];
                let weight = t.weight.times(*suffix_weight);
                if weight > cur.0 {
                    continue;
                }
                let mut output = String::with_capacity(suffix.len() + 4);
                if let Some(c) = char_of(t.olabel) {
                    output.push(c);
                }
                output.push_str(suffix);
                if (weight, &output) < (cur.0, &cur.1) {
                    cur = (weight, output);
                }
            }
            best[s as usize] = cur;
        }

        Ok(Self {
            input: input.to_string(),
            fst,
            best,
        })
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// The trimmed output acceptor.
    pub fn fst(&self) -> &VectorFst {
        &self.fst
    }

    pub fn num_states(&self) -> usize {
        self.fst.num_states()
    }

    /// The minimum (weight, output) path.
    pub fn shortest_path(&self) -> Candidate {
        let start = self.start();
        let (weight, output) = &self.best[start as usize];
        Candidate::new(output.clone(), *weight)
    }

    /// Up to `limit` distinct outputs in ascending (weight, output) order,
    /// each with the lowest weight of any path producing it.
    pub fn candidates(&self, limit: usize) -> Vec<Candidate> {
        let mut config = TraversalConfig::new();
        self.start_traversal(&mut config);
        let mut out = Vec::new();
        while out.len() < limit {
            match self.next_candidate(&mut config) {
                Some(c) => out.push(c),
                None => break,
            }
        }
        out
    }

    /// Seed a best-first traversal from the start state.
    pub fn start_traversal(&self, config: &mut TraversalConfig) {
        config.reset();
        let start = self.start();
        let (weight, output) = &self.best[start as usize];
        config.push(SearchEntry {
            key_weight: *weight,
            key_output: output.clone(),
            complete: false,
            state: start,
            weight: Weight::one(),
            prefix: String::new(),
        });
    }

    /// Yield the next distinct output of a traversal.
    ///
    /// Returns `None` when the queue is exhausted or the loop limit was
    /// reached for this call.
    pub fn next_candidate(&self, config: &mut TraversalConfig) -> Option<Candidate> {
        let mut loop_counter: u32 = 0;
        while loop_counter < MAX_LOOP_COUNT {
            loop_counter += 1;
            let entry = config.pop()?;
            if entry.complete {
                if config.emitted.insert(entry.prefix.clone()) {
                    return Some(Candidate::new(entry.prefix, entry.weight));
                }
                continue;
            }

            let s = entry.state;
            let fw = self.fst.final_weight(s);
            if !fw.is_zero() && !config.emitted.contains(&entry.prefix) {
                let weight = entry.weight.times(fw);
                config.push(SearchEntry {
                    key_weight: weight,
                    key_output: entry.prefix.clone(),
                    complete: true,
                    state: s,
                    weight,
                    prefix: entry.prefix.clone(),
                });
            }
            for t in self.fst.transitions(s) {
                let mut prefix = entry.prefix.clone();
                if let Some(c) = char_of(t.olabel) {
                    prefix.push(c);
                }
                let weight = entry.weight.times(t.weight);
                let (suffix_weight, suffix) = &self.best[t.target as usize];
                let mut key_output = prefix.clone();
                key_output.push_str(suffix);
                config.push(SearchEntry {
                    key_weight: weight.times(*suffix_weight),
                    key_output,
                    complete: false,
                    state: t.target,
                    weight,
                    prefix,
                });
            }
        }
        None
    }

    fn start(&self) -> StateId {
        // Compile only succeeds with a start state.
        self.fst.start().unwrap_or_default()
    }
}

/// Whether some path of `fst` reads `prefix`, possibly followed by more
/// input. Assumes a trimmed transducer, as left by `optimize`.
pub fn is_viable_prefix(fst: &VectorFst, prefix: &str) -> bool {
    let Some(start) = fst.start() else {
        return false;
    };
    let mut current = input_epsilon_closure(fst, vec![start]);
    for label in labels(prefix) {
        let next: Vec<StateId> = current
            .iter()
            .flat_map(|&q| fst.transitions(q))
            .filter(|t| t.ilabel == label)
            .map(|t| t.target)
            .collect();
        if next.is_empty() {
            return false;
        }
        current = input_epsilon_closure(fst, next);
    }
    true
}

/// States reachable from `states` without consuming input.
fn input_epsilon_closure(fst: &VectorFst, states: Vec<StateId>) -> Vec<StateId> {
    let mut seen: HashSet<StateId> = states.iter().copied().collect();
    let mut stack = states;
    let mut out = Vec::new();
    while let Some(q) = stack.pop() {
        out.push(q);
        for t in fst.transitions(q) {
            if t.ilabel == EPSILON && seen.insert(t.target) {
                stack.push(t.target);
            }
        }
    }
    out
}

/// Kahn's algorithm; `None` when the graph has a cycle.
fn topological_order(fst: &VectorFst) -> Option<Vec<StateId>> {
    let n = fst.num_states();
    let mut indegree = vec![0usize; n];
    for s in fst.state_ids() {
        for t in fst.transitions(s) {
            indegree[t.target as usize] += 1;
        }
    }
    let mut ready: VecDeque<StateId> = fst.state_ids().filter(|&s| indegree[s as usize] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(s) = ready.pop_front() {
        order.push(s);
        for t in fst.transitions(s) {
            let d = &mut indegree[t.target as usize];
            *d -= 1;
            if *d == 0 {
                ready.push_back(t.target);
            }
        }
    }
    (order.len() == n).then_some(order)
}

impl Transducer for VectorFst {
    type Config = ApplyConfig;

    fn prepare(&self, config: &mut Self::Config, input: &str) -> Result<(), FstError> {
        config.reset();
        let lattice = Lattice::compile(self, input)?;
        lattice.start_traversal(&mut config.traversal);
        config.lattice = Some(lattice);
        Ok(())
    }

    fn next(&self, config: &mut Self::Config, output: &mut String) -> Option<Weight> {
        let lattice = config.lattice.as_ref()?;
        let candidate = lattice.next_candidate(&mut config.traversal)?;
        output.clear();
        output.push_str(&candidate.output);
        Some(candidate.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{add_weight, closure, concat, optimize, star, union, union_weighted};
    use tnorm_core::charset::CharSet;

    fn weighted(input: &str, output: &str, w: f32) -> VectorFst {
        add_weight(&VectorFst::cross(input, output), Weight::new(w))
    }

    #[test]
    fn shortest_path_picks_lowest_weight() {
        let fst = optimize(&union_weighted(&[
            (&VectorFst::cross("1.5", "एक दशमलव पाँच"), Weight::new(0.1)),
            (&VectorFst::cross("1.5", "डेढ़"), Weight::new(-0.2)),
        ]))
        .unwrap();
        let lattice = Lattice::compile(&fst, "1.5").unwrap();
        let best = lattice.shortest_path();
        assert_eq!(best.output, "डेढ़");
        assert_eq!(best.weight, Weight::new(-0.2));
    }

    #[test]
    fn equal_weights_break_ties_on_output() {
        for order in [["b", "a"], ["a", "b"]] {
            let fst = optimize(&union(
                &weighted("x", order[0], 1.0),
                &weighted("x", order[1], 1.0),
            ))
            .unwrap();
            let lattice = Lattice::compile(&fst, "x").unwrap();
            assert_eq!(lattice.shortest_path().output, "a");
        }
    }

    #[test]
    fn unrecognized_input_is_reported() {
        let fst = optimize(&VectorFst::accep("kg")).unwrap();
        match Lattice::compile(&fst, "km") {
            Err(FstError::Unrecognized { input }) => assert_eq!(input, "km"),
            other => panic!("expected unrecognized, got {other:?}"),
        }
        assert!(Lattice::compile(&VectorFst::empty(), "").is_err());
    }

    #[test]
    fn cyclic_insertions_are_rejected() {
        let fst = star(&VectorFst::insert("a"));
        let fst = optimize(&fst).unwrap();
        assert!(matches!(
            Lattice::compile(&fst, ""),
            Err(FstError::CyclicLattice { .. })
        ));
    }

    #[test]
    fn candidates_are_sorted_and_deduplicated() {
        let fst = optimize(&union_weighted(&[
            (&VectorFst::cross("7", "सात"), Weight::new(0.5)),
            (&VectorFst::cross("7", "सात"), Weight::new(0.2)),
            (&VectorFst::cross("7", "seven"), Weight::new(0.3)),
            (&VectorFst::cross("7", "VII"), Weight::new(0.3)),
        ]))
        .unwrap();
        let lattice = Lattice::compile(&fst, "7").unwrap();
        let all = lattice.candidates(10);
        let outputs: Vec<&str> = all.iter().map(|c| c.output.as_str()).collect();
        assert_eq!(outputs, vec!["सात", "VII", "seven"]);
        assert_eq!(all[0].weight, Weight::new(0.2));
        assert_eq!(lattice.candidates(2).len(), 2);
        assert!(lattice.candidates(0).is_empty());
    }

    #[test]
    fn candidates_match_brute_force_order() {
        // Each of three positions offers two spellings with different costs.
        let digit = union(&weighted("1", "a", 0.3), &weighted("1", "b", 0.1));
        let fst = optimize(&closure(&digit, 3, Some(3))).unwrap();
        let lattice = Lattice::compile(&fst, "111").unwrap();
        let all = lattice.candidates(100);
        assert_eq!(all.len(), 8);
        assert_eq!(all[0].output, "bbb");
        assert_eq!(all[7].output, "aaa");
        assert!(all.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(all[1].output, "abb");
        assert_eq!(all[1].weight, Weight::new(0.5));
    }

    #[test]
    fn viable_prefixes() {
        let fst = optimize(&union(
            &VectorFst::cross("12kg", "x"),
            &concat(&VectorFst::insert("<"), &VectorFst::accep("12")),
        ))
        .unwrap();
        assert!(is_viable_prefix(&fst, ""));
        assert!(is_viable_prefix(&fst, "12"));
        assert!(is_viable_prefix(&fst, "12k"));
        assert!(!is_viable_prefix(&fst, "12m"));
        assert!(!is_viable_prefix(&VectorFst::empty(), ""));
    }

    #[test]
    fn transducer_seam_yields_in_order() {
        let fst = optimize(&concat(
            &union(&weighted("-", "माइनस ", 0.0), &weighted("-", "ऋण ", 0.5)),
            &VectorFst::char_class(&CharSet::from_range('0', '9')),
        ))
        .unwrap();
        let mut config = ApplyConfig::new();
        fst.prepare(&mut config, "-5").unwrap();
        let mut output = String::new();
        assert_eq!(fst.next(&mut config, &mut output), Some(Weight::one()));
        assert_eq!(output, "माइनस 5");
        assert_eq!(fst.next(&mut config, &mut output), Some(Weight::new(0.5)));
        assert_eq!(output, "ऋण 5");
        assert_eq!(fst.next(&mut config, &mut output), None);
    }
}
