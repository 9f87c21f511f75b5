// Error type for grammar construction and normalization.

use tnorm_fst::FstError;

use crate::tables::TableError;

/// Error type for [`crate::normalizer::Normalizer`] construction and use.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// A rule table could not be loaded.
    #[error("rule table error: {0}")]
    Table(#[from] TableError),

    /// A transducer operation failed while building or persisting a grammar.
    #[error("transducer error: {0}")]
    Fst(#[from] FstError),

    /// The input exceeds the configured length limit.
    #[error("input of {len} characters exceeds the limit of {max}")]
    InputTooLong { len: usize, max: usize },

    /// The configuration could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}
