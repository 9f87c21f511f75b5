//! Shared types and utilities for the text normalization crates.
//!
//! - [`character`] -- Character classification, digit scripts
//! - [`charset`] -- Finite character sets used to build acceptors
//! - [`case`] -- Case variants of lexicon entries
//! - [`enums`] -- Token types and input case mode
//! - [`token`] -- Tokens and token windows
//! - [`tag`] -- Parsing of tagger output strings

pub mod case;
pub mod character;
pub mod charset;
pub mod enums;
pub mod tag;
pub mod token;
