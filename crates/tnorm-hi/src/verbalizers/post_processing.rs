// Whitespace clean-up around punctuation in the final text.
//
// Two context-dependent deletions, composed: spaces before a closing mark
// (`, . ; : ! ? ) ] ।` and the like) and spaces after an opening bracket.
// Quotes and dashes keep their spacing. Characters outside the grammar's
// alphabet are masked for the duration of the rewrite.

use once_cell::sync::Lazy;
use tnorm_core::charset::CharSet;
use tnorm_fst::ops::compose;
use tnorm_fst::rewrite::{delete_after, delete_before};
use tnorm_fst::{FstError, Grammar, VectorFst};
use tracing::debug;

use crate::alphabet::{no_space_before, opening_brackets, sigma, SPACE};
use crate::error::NormalizeError;

pub fn post_processing_fst() -> Result<VectorFst, NormalizeError> {
    let sigma = sigma();
    let before = delete_before(SPACE, &no_space_before(), &sigma);
    let after = delete_after(SPACE, &opening_brackets(), &sigma);
    Ok(compose(&before, &after)?)
}

pub fn build_post_processor() -> Result<Grammar, NormalizeError> {
    let grammar = Grammar::new("post_process", &post_processing_fst()?)?;
    debug!(
        states = grammar.num_states(),
        transitions = grammar.num_transitions(),
        "built post-processing grammar"
    );
    Ok(grammar)
}

static SIGMA: Lazy<CharSet> = Lazy::new(sigma);

/// Stand-in for characters the grammar cannot read. It is in the alphabet
/// and neither rule looks at it.
const MASK: char = '\u{2022}';

/// Applies the post-processing grammar to `text`. Characters outside the
/// alphabet, and the mask character itself, are replaced by [`MASK`] before
/// the rewrite and restored after it; only spaces are ever deleted, so the
/// masks come back in order.
pub fn post_process(grammar: &Grammar, text: &str) -> Result<String, FstError> {
    let mut masked = String::with_capacity(text.len());
    let mut hidden = Vec::new();
    for c in text.chars() {
        if c == MASK || !SIGMA.contains(c) {
            hidden.push(c);
            masked.push(MASK);
        } else {
            masked.push(c);
        }
    }
    let out = grammar.apply(&masked)?;
    if hidden.is_empty() {
        return Ok(out);
    }
    let mut hidden = hidden.into_iter();
    Ok(out
        .chars()
        .map(|c| if c == MASK { hidden.next().unwrap_or(c) } else { c })
        .collect())
}
