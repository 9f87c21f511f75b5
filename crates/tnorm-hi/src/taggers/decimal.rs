// Decimal numbers: `<integer>.<digits>` with the fraction read digit by digit.

use tnorm_fst::ops::concat_all;
use tnorm_fst::VectorFst;

use crate::alphabet::wrap;
use crate::taggers::cardinal::CardinalTagger;

/// Decimal tagger built on the cardinal graphs.
#[derive(Debug, Clone)]
pub struct DecimalTagger {
    integer: VectorFst,
    fractional: VectorFst,
}

impl DecimalTagger {
    pub fn new(cardinal: &CardinalTagger) -> Self {
        Self {
            integer: cardinal.without_leading_zeros(),
            fractional: cardinal.digit_by_digit(),
        }
    }

    /// Fraction digits one by one: `"07"` -> शून्य सात.
    pub fn fractional(&self) -> &VectorFst {
        &self.fractional
    }

    /// `integer_part: "…" fractional_part: "…"` with the integer read by
    /// `integer`.
    pub fn body(&self, integer: &VectorFst) -> VectorFst {
        concat_all(&[
            &wrap("integer_part: \"", integer, "\""),
            &VectorFst::delete("."),
            &wrap(" fractional_part: \"", &self.fractional, "\""),
        ])
    }

    /// `decimal { negative: "true" integer_part: "…" fractional_part: "…" }`.
    pub fn fst(&self) -> VectorFst {
        wrap(
            "decimal { ",
            &concat_all(&[&CardinalTagger::negative(), &self.body(&self.integer)]),
            " }",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{EmbeddedTables, RuleTables};
    use tnorm_fst::Grammar;

    fn decimal() -> Grammar {
        let tables = RuleTables::load(&EmbeddedTables).unwrap();
        let cardinal = CardinalTagger::new(&tables).unwrap();
        Grammar::new("decimal", &DecimalTagger::new(&cardinal).fst()).unwrap()
    }

    #[test]
    fn fraction_is_read_digit_by_digit() {
        let g = decimal();
        assert_eq!(
            g.apply("16.07").unwrap(),
            "decimal { integer_part: \"सोलह\" fractional_part: \"शून्य सात\" }"
        );
        assert_eq!(
            g.apply("-१२.२").unwrap(),
            "decimal { negative: \"true\" integer_part: \"बारह\" fractional_part: \"दो\" }"
        );
    }

    #[test]
    fn both_parts_are_required() {
        let g = decimal();
        assert!(!g.accepts("12"));
        assert!(!g.accepts("12."));
        assert!(!g.accepts(".5"));
        assert!(g.accepts("0.5"));
    }
}
