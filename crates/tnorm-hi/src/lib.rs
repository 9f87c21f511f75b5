//! Hindi text normalization.
//!
//! Converts written Hindi text into its spoken form: cardinal and decimal
//! numbers, measures with units, idiomatic fractions, multiplication signs
//! and addresses are rewritten into Devanagari words, and spacing around
//! punctuation is tidied afterwards.
//!
//! # Architecture
//!
//! - [`tokenizer`] -- Splits input into word, punctuation and whitespace tokens
//! - [`tables`] -- Rule tables (embedded TSV files or a data directory)
//! - [`alphabet`] -- Character classes and small building blocks
//! - [`taggers`] -- Cardinal, decimal, fraction, ordinal, measure and address grammars
//! - [`verbalizers`] -- Tag-to-speech grammar and punctuation post-processing
//! - [`cache`] -- Process-wide grammar cache with on-disk archives
//! - [`config`] -- Normalizer options, loadable from TOML
//! - [`normalizer`] -- Segmentation, selection and rendering

pub mod alphabet;
pub mod cache;
pub mod config;
pub mod error;
pub mod normalizer;
pub mod tables;
pub mod taggers;
pub mod tokenizer;
pub mod verbalizers;

pub use config::NormalizerConfig;
pub use error::NormalizeError;
pub use normalizer::{Normalizer, Segment, Tagged};
pub use tnorm_core::enums::InputCase;
pub use tnorm_fst::Candidate;
