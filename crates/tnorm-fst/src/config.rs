// Traversal configuration for n-best enumeration.
//
// The search state lives outside the lattice so that one compiled lattice
// can be traversed any number of times and the `Transducer` seam can resume
// enumeration across `next` calls.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use hashbrown::HashSet;

use crate::fst::StateId;
use crate::lattice::Lattice;
use crate::weight::Weight;

/// One partial or complete path on the search queue.
///
/// Entries are ordered by the best completion they can still reach,
/// `(key_weight, key_output)`, which is exact for the (weight, output) order:
/// appending the best suffix of a state never reorders two prefixes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchEntry {
    pub key_weight: Weight,
    pub key_output: String,
    /// Whether the path has already taken its final weight.
    pub complete: bool,
    pub state: StateId,
    /// Weight accumulated so far.
    pub weight: Weight,
    /// Output emitted so far.
    pub prefix: String,
}

/// Best-first search queue plus the set of outputs already yielded.
#[derive(Debug, Default)]
pub struct TraversalConfig {
    pub queue: BinaryHeap<Reverse<SearchEntry>>,
    pub emitted: HashSet<String>,
}

impl TraversalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all pending entries and yielded outputs.
    #[inline]
    pub fn reset(&mut self) {
        self.queue.clear();
        self.emitted.clear();
    }

    #[inline]
    pub fn push(&mut self, entry: SearchEntry) {
        self.queue.push(Reverse(entry));
    }

    #[inline]
    pub fn pop(&mut self) -> Option<SearchEntry> {
        self.queue.pop().map(|Reverse(e)| e)
    }
}

/// Configuration for [`crate::Transducer`] on a vector transducer or grammar:
/// the lattice compiled by `prepare` and its traversal state.
#[derive(Debug, Default)]
pub struct ApplyConfig {
    pub lattice: Option<Lattice>,
    pub traversal: TraversalConfig,
}

impl ApplyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous input.
    #[inline]
    pub fn reset(&mut self) {
        self.lattice = None;
        self.traversal.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(weight: f32, output: &str) -> SearchEntry {
        SearchEntry {
            key_weight: Weight::new(weight),
            key_output: output.to_string(),
            complete: false,
            state: 0,
            weight: Weight::one(),
            prefix: String::new(),
        }
    }

    #[test]
    fn queue_pops_lowest_key_first() {
        let mut config = TraversalConfig::new();
        config.push(entry(1.0, "b"));
        config.push(entry(0.5, "z"));
        config.push(entry(1.0, "a"));
        assert_eq!(config.pop().unwrap().key_output, "z");
        assert_eq!(config.pop().unwrap().key_output, "a");
        assert_eq!(config.pop().unwrap().key_output, "b");
        assert!(config.pop().is_none());
    }

    #[test]
    fn reset_clears_state() {
        let mut config = TraversalConfig::new();
        config.push(entry(0.0, "x"));
        config.emitted.insert("x".to_string());
        config.reset();
        assert!(config.queue.is_empty());
        assert!(config.emitted.is_empty());

        let mut apply = ApplyConfig::new();
        apply.traversal.push(entry(0.0, "y"));
        apply.reset();
        assert!(apply.lattice.is_none());
        assert!(apply.traversal.queue.is_empty());
    }
}
