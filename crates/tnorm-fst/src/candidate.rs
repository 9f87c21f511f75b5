// Weighted output candidates and their total order.

use std::cmp::Ordering;

use hashbrown::HashMap;

use crate::weight::Weight;

/// One output string with its total path weight.
///
/// Candidates are ordered by weight, then by output string, so equal-cost
/// alternatives always resolve the same way regardless of how the grammar
/// was assembled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub output: String,
    pub weight: Weight,
}

impl Candidate {
    pub fn new(output: impl Into<String>, weight: Weight) -> Self {
        Self {
            output: output.into(),
            weight,
        }
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then_with(|| self.output.cmp(&other.output))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The minimum candidate by (weight, output).
pub fn select_best<I>(candidates: I) -> Option<Candidate>
where
    I: IntoIterator<Item = Candidate>,
{
    candidates.into_iter().min()
}

/// Deduplicate by output (keeping the lowest weight) and sort ascending.
pub fn rank<I>(candidates: I) -> Vec<Candidate>
where
    I: IntoIterator<Item = Candidate>,
{
    let mut best: HashMap<String, Weight> = HashMap::new();
    for c in candidates {
        best.entry(c.output)
            .and_modify(|w| *w = w.plus(c.weight))
            .or_insert(c.weight);
    }
    let mut ranked: Vec<Candidate> = best
        .into_iter()
        .map(|(output, weight)| Candidate { output, weight })
        .collect();
    ranked.sort();
    ranked
}
