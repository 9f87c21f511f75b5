// Token classification: the union of every tagger, each result wrapped in
// `tokens { … }`.

use tnorm_core::enums::InputCase;
use tnorm_fst::ops::union_weighted;
use tnorm_fst::{Grammar, VectorFst, Weight};
use tracing::debug;

use crate::alphabet::wrap;
use crate::error::NormalizeError;
use crate::tables::RuleTables;
use crate::taggers::{
    CardinalTagger, DecimalTagger, FractionTagger, MeasureTagger, OrdinalTagger,
    StructuredAddress, address,
};

/// Weight of every classified token.
pub const CLASS_WEIGHT: f32 = 1.1;

/// `tokens { <tagged> }`.
pub fn token(tagged: &str) -> String {
    format!("tokens {{ {tagged} }}")
}

/// `tokens { measure { <tagged> } }`.
pub fn measure_token(tagged: &str) -> String {
    token(&format!("measure {{ {tagged} }}"))
}

/// Unrecognized text passed through as `tokens { name: "…" }`.
pub fn name_token(text: &str) -> String {
    token(&format!("name: \"{text}\""))
}

/// The classifying transducer: measures, cardinals and decimals.
pub fn classify_fst(tables: &RuleTables) -> Result<VectorFst, NormalizeError> {
    let cardinal = CardinalTagger::new(tables)?;
    let decimal = DecimalTagger::new(&cardinal);
    let fraction = FractionTagger::new(tables, &cardinal);
    let structured = StructuredAddress::new(tables, &cardinal);
    let measure = MeasureTagger::new(tables, &cardinal, &decimal, &fraction, &structured)?;

    let weight = Weight::new(CLASS_WEIGHT);
    let classes = union_weighted(&[
        (&measure.fst(), weight),
        (&cardinal.fst(), weight),
        (&decimal.fst(), weight),
    ]);
    Ok(wrap("tokens { ", &classes, " }"))
}

pub fn build_classify(tables: &RuleTables) -> Result<Grammar, NormalizeError> {
    let grammar = Grammar::new("classify", &classify_fst(tables)?)?;
    debug!(
        states = grammar.num_states(),
        transitions = grammar.num_transitions(),
        "built classify grammar"
    );
    Ok(grammar)
}

/// Word transducer of the contextual address scanner.
pub fn build_address_words(
    tables: &RuleTables,
    input_case: InputCase,
) -> Result<Grammar, NormalizeError> {
    let cardinal = CardinalTagger::new(tables)?;
    let ordinal = OrdinalTagger::new(tables, &cardinal, input_case);
    let fst = address::word_processor(tables, &cardinal, &ordinal, input_case);
    let grammar = Grammar::new("address_words", &fst)?;
    debug!(
        states = grammar.num_states(),
        transitions = grammar.num_transitions(),
        input_case = input_case.as_str(),
        "built address word grammar"
    );
    Ok(grammar)
}
