// Ordinal numbers: `5th`, `५वाँ`, `1st` -> पाँचवाँ, पाँचवाँ, पहला.

use tnorm_core::case::case_variants;
use tnorm_core::enums::InputCase;
use tnorm_fst::ops::{concat, difference, project, union, ProjectType};
use tnorm_fst::VectorFst;

use crate::tables::RuleTables;
use crate::taggers::cardinal::CardinalTagger;

/// Regular ordinal suffix appended to the cardinal words.
const SUFFIX: &str = "वाँ";

/// Largest number read as an ordinal.
const MAX_DIGITS: usize = 7;

#[derive(Debug, Clone)]
pub struct OrdinalTagger {
    graph: VectorFst,
}

impl OrdinalTagger {
    pub fn new(tables: &RuleTables, cardinal: &CardinalTagger, input_case: InputCase) -> Self {
        let exceptions = tables.ordinal_exceptions.to_digit_fst();
        let regular = concat(
            &difference(
                &cardinal.positive_up_to_digits(MAX_DIGITS),
                &project(&exceptions, ProjectType::Input),
            ),
            &VectorFst::insert(SUFFIX),
        );

        let mut suffixes: Vec<String> = Vec::new();
        for suffix in tables.ordinal_suffixes.keys() {
            match input_case {
                InputCase::Cased => suffixes.extend(case_variants(suffix)),
                InputCase::LowerCased => suffixes.push(suffix.to_string()),
            }
        }
        let deletions: Vec<(String, &str)> = suffixes.into_iter().map(|s| (s, "")).collect();

        Self {
            graph: concat(&union(&exceptions, &regular), &VectorFst::string_map(&deletions)),
        }
    }

    /// Digits followed by an ordinal suffix, to the ordinal words.
    pub fn graph(&self) -> &VectorFst {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::EmbeddedTables;
    use tnorm_fst::Grammar;

    fn ordinal(input_case: InputCase) -> Grammar {
        let tables = RuleTables::load(&EmbeddedTables).unwrap();
        let cardinal = CardinalTagger::new(&tables).unwrap();
        let tagger = OrdinalTagger::new(&tables, &cardinal, input_case);
        Grammar::new("ordinal", tagger.graph()).unwrap()
    }

    #[test]
    fn exceptions_and_regular_forms() {
        let g = ordinal(InputCase::LowerCased);
        assert_eq!(g.apply("1st").unwrap(), "पहला");
        assert_eq!(g.apply("२nd").unwrap(), "दूसरा");
        assert_eq!(g.apply("6th").unwrap(), "छठा");
        assert_eq!(g.apply("5th").unwrap(), "पाँचवाँ");
        assert_eq!(g.apply("२१वाँ").unwrap(), "इक्कीसवाँ");
        assert!(!g.accepts("5"));
        assert!(!g.accepts("0th"));
    }

    #[test]
    fn only_the_exception_reading_for_exception_numbers() {
        let g = ordinal(InputCase::LowerCased);
        let all = g.candidates("1st", 5).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn cased_input_accepts_capitalized_suffixes() {
        assert!(ordinal(InputCase::Cased).accepts("3RD"));
        assert!(!ordinal(InputCase::LowerCased).accepts("3RD"));
    }
}
