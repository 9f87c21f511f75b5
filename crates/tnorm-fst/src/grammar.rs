// Named optimized grammars and the combination API.

use crate::candidate::Candidate;
use crate::config::ApplyConfig;
use crate::fst::VectorFst;
use crate::lattice::{self, Lattice};
use crate::ops;
use crate::weight::Weight;
use crate::{FstError, Transducer};

/// A named, optimized, immutable transducer.
///
/// Grammars are built once and shared (typically behind `Arc`); applying
/// one to an input never mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    name: String,
    fst: VectorFst,
}

impl Grammar {
    /// Optimize `fst` and wrap it.
    pub fn new(name: impl Into<String>, fst: &VectorFst) -> Result<Self, FstError> {
        Ok(Self {
            name: name.into(),
            fst: ops::optimize(fst)?,
        })
    }

    /// Wrap a transducer that is already optimized (e.g. read from an archive).
    pub fn from_optimized(name: impl Into<String>, fst: VectorFst) -> Self {
        Self {
            name: name.into(),
            fst,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fst(&self) -> &VectorFst {
        &self.fst
    }

    pub fn into_fst(self) -> VectorFst {
        self.fst
    }

    pub fn num_states(&self) -> usize {
        self.fst.num_states()
    }

    pub fn num_transitions(&self) -> usize {
        self.fst.num_transitions()
    }

    /// Compile `input` against the grammar.
    pub fn lattice(&self, input: &str) -> Result<Lattice, FstError> {
        Lattice::compile(&self.fst, input)
    }

    /// Minimum (weight, output) rewrite of `input`.
    pub fn best(&self, input: &str) -> Result<Candidate, FstError> {
        Ok(self.lattice(input)?.shortest_path())
    }

    /// Output of the best rewrite of `input`.
    pub fn apply(&self, input: &str) -> Result<String, FstError> {
        Ok(self.best(input)?.output)
    }

    /// Up to `limit` distinct rewrites in ascending (weight, output) order.
    pub fn candidates(&self, input: &str, limit: usize) -> Result<Vec<Candidate>, FstError> {
        Ok(self.lattice(input)?.candidates(limit))
    }

    /// Whether any path reads `input`.
    pub fn accepts(&self, input: &str) -> bool {
        self.lattice(input).is_ok()
    }

    /// Whether some input starting with `prefix` can be read.
    pub fn is_viable_prefix(&self, prefix: &str) -> bool {
        lattice::is_viable_prefix(&self.fst, prefix)
    }
}

impl Transducer for Grammar {
    type Config = ApplyConfig;

    fn prepare(&self, config: &mut Self::Config, input: &str) -> Result<(), FstError> {
        self.fst.prepare(config, input)
    }

    fn next(&self, config: &mut Self::Config, output: &mut String) -> Option<Weight> {
        self.fst.next(config, output)
    }
}

/// Union of `grammars`, each alternative offset by the matching weight.
pub fn combine(
    name: impl Into<String>,
    grammars: &[&Grammar],
    weights: &[Weight],
) -> Result<Grammar, FstError> {
    if grammars.len() != weights.len() {
        return Err(FstError::WeightCountMismatch {
            grammars: grammars.len(),
            weights: weights.len(),
        });
    }
    let parts: Vec<(&VectorFst, Weight)> = grammars
        .iter()
        .zip(weights)
        .map(|(g, &w)| (g.fst(), w))
        .collect();
    Grammar::new(name, &ops::union_weighted(&parts))
}

/// Concatenation of two grammars; weights add along the path.
pub fn sequence(name: impl Into<String>, a: &Grammar, b: &Grammar) -> Result<Grammar, FstError> {
    Grammar::new(name, &ops::concat(a.fst(), b.fst()))
}

/// Relational composition: `a`'s output is read by `b`.
pub fn compose(name: impl Into<String>, a: &Grammar, b: &Grammar) -> Result<Grammar, FstError> {
    Grammar::new(name, &ops::compose(a.fst(), b.fst())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cross(name: &str, input: &str, output: &str) -> Grammar {
        Grammar::new(name, &VectorFst::cross(input, output)).unwrap()
    }

    #[test]
    fn combine_offsets_each_alternative() {
        let generic = cross("decimal", "2.5", "दो दशमलव पाँच");
        let idiom = cross("dhai", "2.5", "ढाई");
        let g = combine("measure", &[&generic, &idiom], &[Weight::new(0.1), Weight::new(-0.2)]).unwrap();
        assert_eq!(g.name(), "measure");
        let best = g.best("2.5").unwrap();
        assert_eq!(best.output, "ढाई");
        assert_eq!(best.weight, Weight::new(-0.2));
        let all = g.candidates("2.5", 5).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].weight, Weight::new(0.1));
    }

    #[test]
    fn combine_rejects_weight_count_mismatch() {
        let a = cross("a", "a", "b");
        assert!(matches!(
            combine("bad", &[&a], &[]),
            Err(FstError::WeightCountMismatch { grammars: 1, weights: 0 })
        ));
    }

    #[test]
    fn sequence_concatenates() {
        let number = cross("number", "12", "बारह");
        let unit = cross("unit", "kg", " किलोग्राम");
        let g = sequence("measure", &number, &unit).unwrap();
        assert_eq!(g.apply("12kg").unwrap(), "बारह किलोग्राम");
        assert!(!g.accepts("12"));
    }

    #[test]
    fn compose_chains_and_checks_alphabets() {
        let tag = cross("tag", "5", "x");
        let verbalize = cross("verbalize", "x", "पाँच");
        let g = compose("pipeline", &tag, &verbalize).unwrap();
        assert_eq!(g.apply("5").unwrap(), "पाँच");
        assert!(matches!(
            compose("broken", &verbalize, &tag),
            Err(FstError::AlphabetMismatch { .. })
        ));
    }

    #[test]
    fn rebuilds_are_identical() {
        let build = || {
            let a = cross("a", "1", "एक");
            let b = cross("b", "1", "one");
            combine("c", &[&a, &b], &[Weight::new(0.5), Weight::new(0.5)]).unwrap()
        };
        let (x, y) = (build(), build());
        assert_eq!(x, y);
        assert_eq!(x.best("1").unwrap().output, "one");
    }

    #[test]
    fn unrecognized_is_an_error() {
        let g = cross("g", "a", "b");
        assert!(matches!(g.apply("z"), Err(FstError::Unrecognized { .. })));
    }
}
