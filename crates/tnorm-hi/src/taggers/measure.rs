// Measures: a number followed by a unit, the multiplication symbol between
// two numbers, and structured addresses.
//
//   -12kg    -> cardinal { negative: "true" integer: "बारह" } units: "किलोग्राम"
//   16.07yr  -> decimal { integer_part: "सोलह" fractional_part: "शून्य सात" } units: "वर्ष"
//   2x3      -> cardinal { integer: "दो" } units: "बाई" } } tokens { cardinal { integer: "तीन"
//
// The multiplier form closes its own token and opens a second one, so a
// single input token yields two output tokens once the classifier wraps it.

use tnorm_fst::ops::{compose, concat, concat_all, difference, project, union, union_weighted, ProjectType};
use tnorm_fst::{VectorFst, Weight};

use crate::alphabet::{delete_space, wrap};
use crate::error::NormalizeError;
use crate::tables::RuleTables;
use crate::taggers::address::StructuredAddress;
use crate::taggers::cardinal::CardinalTagger;
use crate::taggers::decimal::DecimalTagger;
use crate::taggers::fraction::FractionTagger;

/// Largest integer read in a measure.
const MAX_DIGITS: usize = 7;

const GENERIC_WEIGHT: f32 = 0.1;
const YEAR_INFORMAL_WEIGHT: f32 = -0.1;

/// Reserved year unit, routed by magnitude.
const YEAR: &str = "yr";
const YEAR_INFORMAL: &str = "साल";

/// Spoken multiplication sign.
const BY: &str = "बाई";
const MULTIPLIERS: [&str; 3] = ["x", "X", "*"];

#[derive(Debug, Clone)]
pub struct MeasureTagger {
    graph: VectorFst,
}

impl MeasureTagger {
    pub fn new(
        tables: &RuleTables,
        cardinal: &CardinalTagger,
        decimal: &DecimalTagger,
        fraction: &FractionTagger,
        address: &StructuredAddress,
    ) -> Result<Self, NormalizeError> {
        let negative = CardinalTagger::negative();
        let number = cardinal.up_to_digits(MAX_DIGITS);
        let integer = |graph: &VectorFst| wrap("integer: \"", graph, "\"");
        let cardinal_tag =
            |graph: &VectorFst| wrap("cardinal { ", &concat(&negative, &integer(graph)), " }");
        let decimal_tag = wrap("decimal { ", &concat(&negative, &decimal.body(&number)), " }");
        let units = |graph: &VectorFst| concat(&delete_space(), &wrap(" units: \"", graph, "\""));

        let unit = tables.unit.to_fst();
        let general_units = compose(
            &difference(&project(&unit, ProjectType::Input), &VectorFst::accep(YEAR)),
            &unit,
        )?;
        let year_formal = tables.unit_year_formal.to_fst();
        let year_informal = VectorFst::cross(YEAR, YEAR_INFORMAL);
        let quarterly = union(
            &tables.quarterly_units_map.to_fst(),
            &tables.quarterly_units_list.to_fst(),
        );

        let graph_decimal = concat(&decimal_tag, &units(&general_units));
        let graph_decimal_year = concat(&decimal_tag, &units(&year_formal));
        let graph_cardinal = concat(&cardinal_tag(&number), &units(&general_units));
        let graph_year_formal = concat(
            &cardinal_tag(&cardinal.at_least_thousand()),
            &units(&year_formal),
        );
        let graph_year_informal = concat(
            &cardinal_tag(&cardinal.below_thousand()),
            &units(&year_informal),
        );

        let symbols: Vec<(&str, &str)> = MULTIPLIERS.iter().map(|&m| (m, BY)).collect();
        let graph_multiplier = concat_all(&[
            &cardinal_tag(&number),
            &wrap(" units: \"", &VectorFst::string_map(&symbols), "\" } } tokens { cardinal { "),
            &negative,
            &integer(&number),
        ]);

        let graph_idiom = concat(
            &wrap("cardinal { ", &concat(&negative, &fraction.fst()), " }"),
            &units(&quarterly),
        );

        let generic = Weight::new(GENERIC_WEIGHT);
        let graph = union_weighted(&[
            (&graph_decimal, generic),
            (&graph_decimal_year, generic),
            (&graph_cardinal, generic),
            (&graph_year_formal, generic),
            (&graph_year_informal, Weight::new(YEAR_INFORMAL_WEIGHT)),
            (&graph_multiplier, generic),
            (&graph_idiom, Weight::one()),
            (address.graph(), Weight::one()),
        ]);
        Ok(Self { graph })
    }

    /// Measure body without the `measure { … }` wrapper.
    pub fn graph(&self) -> &VectorFst {
        &self.graph
    }

    /// `measure { … }`.
    pub fn fst(&self) -> VectorFst {
        wrap("measure { ", &self.graph, " }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::EmbeddedTables;
    use tnorm_fst::Grammar;

    fn measure() -> Grammar {
        let tables = RuleTables::load(&EmbeddedTables).unwrap();
        let cardinal = CardinalTagger::new(&tables).unwrap();
        let decimal = DecimalTagger::new(&cardinal);
        let fraction = FractionTagger::new(&tables, &cardinal);
        let address = StructuredAddress::new(&tables, &cardinal);
        let tagger = MeasureTagger::new(&tables, &cardinal, &decimal, &fraction, &address).unwrap();
        Grammar::new("measure", tagger.graph()).unwrap()
    }

    #[test]
    fn negative_cardinal_with_unit() {
        let g = measure();
        assert_eq!(
            g.apply("-12kg").unwrap(),
            "cardinal { negative: \"true\" integer: \"बारह\" } units: \"किलोग्राम\""
        );
        assert_eq!(
            g.apply("१२ kg").unwrap(),
            "cardinal { integer: \"बारह\" } units: \"किलोग्राम\""
        );
    }

    #[test]
    fn decimal_with_unit() {
        let g = measure();
        assert_eq!(
            g.apply("-१२.२kg").unwrap(),
            "decimal { negative: \"true\" integer_part: \"बारह\" fractional_part: \"दो\" } units: \"किलोग्राम\""
        );
    }

    #[test]
    fn year_is_routed_by_magnitude() {
        let g = measure();
        let year = |input: &str| {
            let out = g.apply(input).unwrap();
            out.rsplit("units: \"").next().unwrap().trim_end_matches('"').to_string()
        };
        assert_eq!(year("70yr"), "साल");
        assert_eq!(year("999yr"), "साल");
        assert_eq!(year("1000yr"), "वर्ष");
        assert_eq!(year("7000yr"), "वर्ष");
        assert_eq!(year("16.07yr"), "वर्ष");
        assert_eq!(
            g.apply("16.07yr").unwrap(),
            "decimal { integer_part: \"सोलह\" fractional_part: \"शून्य सात\" } units: \"वर्ष\""
        );
    }

    #[test]
    fn idioms_beat_generic_decimals() {
        let g = measure();
        for (input, idiom) in [
            ("0.5kg", "आधा"),
            ("1.5kg", "डेढ़"),
            ("2.5kg", "ढाई"),
            ("3.75kg", "पौने चार"),
        ] {
            let all = g.candidates(input, 10).unwrap();
            let best = &all[0];
            assert_eq!(
                best.output,
                format!("cardinal {{ integer: \"{idiom}\" }} units: \"किलो\""),
                "{input}"
            );
            let generic = all
                .iter()
                .find(|c| c.output.starts_with("decimal"))
                .unwrap();
            assert!(best.weight < generic.weight, "{input}");
        }
    }

    #[test]
    fn idioms_only_take_quarterly_units() {
        let g = measure();
        assert!(g.apply("1.5%").unwrap().starts_with("decimal"));
        assert_eq!(
            g.apply("2.5 घंटे").unwrap(),
            "cardinal { integer: \"ढाई\" } units: \"घंटे\""
        );
    }

    #[test]
    fn multiplier_splits_into_two_tokens() {
        let g = measure();
        assert_eq!(
            g.apply("2x3").unwrap(),
            "cardinal { integer: \"दो\" } units: \"बाई\" } } tokens { cardinal { integer: \"तीन\""
        );
        assert!(g.accepts("१०*२०"));
        assert!(g.accepts("4X5"));
    }

    #[test]
    fn bare_numbers_are_not_measures() {
        let g = measure();
        assert!(!g.accepts("12"));
        assert!(!g.accepts("12.5"));
        assert!(!g.accepts("12 किलोमीटर"));
    }
}
