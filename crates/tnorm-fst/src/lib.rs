//! Weighted finite-state transducer engine.
//!
//! Builds, combines and applies weighted transducers over Unicode labels in
//! the tropical semiring. Grammars are assembled from small constructors,
//! optimized once and then shared read-only; applying a grammar to an input
//! compiles a per-input lattice and selects paths from it.
//!
//! # Architecture
//!
//! - [`weight`] -- Fixed-point tropical weight
//! - [`fst`] -- Mutable vector transducer and primitive constructors
//! - [`ops`] -- Union, concatenation, closure, difference, composition, optimization
//! - [`rewrite`] -- Context-dependent whitespace deletion rules
//! - [`lattice`] -- Input-by-grammar product, shortest path and n-best selection
//! - [`config`] -- Traversal configuration for n-best enumeration
//! - [`candidate`] -- Weighted output candidates and their total order
//! - [`grammar`] -- Named optimized grammars and the combination API
//! - [`symbols`] -- Label helpers and archive symbol tables
//! - [`transition`] -- Plain-old-data state and transition records
//! - [`format`] -- Binary archive of named transducers

pub mod candidate;
pub mod config;
pub mod format;
pub mod fst;
pub mod grammar;
pub mod lattice;
pub mod ops;
pub mod rewrite;
pub mod symbols;
pub mod transition;
pub mod weight;

pub use candidate::Candidate;
pub use fst::{Label, StateId, VectorFst, EPSILON};
pub use grammar::Grammar;
pub use weight::Weight;

/// Error type for transducer construction, application and persistence.
#[derive(Debug, thiserror::Error)]
pub enum FstError {
    #[error("no path accepts input {input:?}")]
    Unrecognized { input: String },
    #[error("composition alphabet mismatch: output symbols {symbols:?} are not accepted by the next stage")]
    AlphabetMismatch { symbols: Vec<String> },
    #[error("weight count mismatch: {grammars} grammars, {weights} weights")]
    WeightCountMismatch { grammars: usize, weights: usize },
    #[error("lattice for input {input:?} contains a cycle")]
    CyclicLattice { input: String },
    #[error("negative-weight epsilon cycle reachable from state {state}")]
    NegativeCycle { state: StateId },
    #[error("transducer has no start state")]
    NoStartState,
    #[error("invalid magic number in archive header")]
    InvalidMagic,
    #[error("file too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("invalid symbol table: {0}")]
    InvalidSymbolTable(String),
    #[error("state or transition table alignment error")]
    AlignmentError,
    #[error("archive I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Maximum number of queue pops per [`Transducer::next`] call.
/// Acts as a safety limit against runaway enumeration.
pub const MAX_LOOP_COUNT: u32 = 100_000;

/// Trait for transducer application.
///
/// The `prepare` + `next` pattern is a coroutine-like interface: `prepare`
/// compiles the input against the transducer into the configuration, and each
/// `next` call yields one distinct output string together with its weight, in
/// ascending (weight, output) order.
pub trait Transducer {
    type Config;

    /// Prepare the configuration for the given input.
    ///
    /// Fails with [`FstError::Unrecognized`] when no path accepts the input.
    fn prepare(&self, config: &mut Self::Config, input: &str) -> Result<(), FstError>;

    /// Yield the next output.
    ///
    /// Returns `None` when no more outputs exist or the loop limit was reached.
    fn next(&self, config: &mut Self::Config, output: &mut String) -> Option<Weight>;
}
