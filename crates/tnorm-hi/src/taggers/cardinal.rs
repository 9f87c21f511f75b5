// Cardinal numbers: digit strings in either glyph set to Hindi number words.
//
// Numbers are read in the Indian system: the last three digits as hundreds,
// then pairs of digits for thousand, lakh, crore, arab and kharab, up to
// thirteen digits.

use tnorm_fst::ops::{
    add_weight, closure, concat, concat_all, optimize, optional, star, union, union_all,
};
use tnorm_fst::{VectorFst, Weight};

use crate::alphabet::{delete_digits, insert_space, wrap};
use crate::error::NormalizeError;
use crate::tables::RuleTables;

/// Longest digit string read as one number.
pub const MAX_DIGITS: usize = 13;

/// Cost of reading a number with leading zeros digit by digit.
const LEADING_ZEROS_WEIGHT: f32 = 0.1;

/// Tier names above hundred, in increasing order.
const TIERS: [&str; 5] = ["thousand", "lakh", "crore", "arab", "kharab"];

/// Cardinal number graphs and the standalone cardinal tagger.
#[derive(Debug, Clone)]
pub struct CardinalTagger {
    zero: VectorFst,
    digit: VectorFst,
    teens_and_ties: VectorFst,
    /// `by_length[n]`: numbers with exactly `n` digits and no leading zero.
    by_length: Vec<VectorFst>,
    /// Any single digit, zero included.
    single_digit: VectorFst,
}

impl CardinalTagger {
    pub fn new(tables: &RuleTables) -> Result<Self, NormalizeError> {
        let zero = tables.zero.to_digit_fst();
        let digit = tables.digit.to_digit_fst();
        let teens_and_ties = tables.teens_and_ties.to_digit_fst();
        let single_digit = union(&zero, &digit);

        // Two digits that are not both zero: "05" -> पाँच, "42" -> बयालीस.
        let two_digits = union(&concat(&delete_digits("0"), &digit), &teens_and_ties);
        let units_tail = union(&delete_digits("00"), &concat(&insert_space(), &two_digits));
        let hundred = tables.magnitude("hundred")?;
        let hundreds_tail = union(
            &delete_digits("0"),
            &concat_all(&[
                &insert_space(),
                &digit,
                &VectorFst::insert(&format!(" {hundred}")),
            ]),
        );
        // Last three digits of a number of four digits or more.
        let last_three = optimize(&concat(&hundreds_tail, &units_tail))?;

        let mut by_length = vec![VectorFst::empty(), digit.clone(), teens_and_ties.clone()];
        by_length.push(optimize(&concat_all(&[
            &digit,
            &VectorFst::insert(&format!(" {hundred}")),
            &units_tail,
        ]))?);

        let tier_words: Vec<&str> = TIERS
            .iter()
            .map(|t| tables.magnitude(t))
            .collect::<Result<_, _>>()?;
        for len in 4..=MAX_DIGITS {
            let tier = (len - 4) / 2;
            let head = if (len - 4) % 2 == 0 { &digit } else { &teens_and_ties };
            let mut fst = concat(head, &VectorFst::insert(&format!(" {}", tier_words[tier])));
            for lower in (0..tier).rev() {
                let tail = union(
                    &delete_digits("00"),
                    &concat_all(&[
                        &insert_space(),
                        &two_digits,
                        &VectorFst::insert(&format!(" {}", tier_words[lower])),
                    ]),
                );
                fst = concat(&fst, &tail);
            }
            by_length.push(optimize(&concat(&fst, &last_three))?);
        }

        Ok(Self {
            zero,
            digit,
            teens_and_ties,
            by_length,
            single_digit,
        })
    }

    pub fn zero(&self) -> &VectorFst {
        &self.zero
    }

    pub fn digit(&self) -> &VectorFst {
        &self.digit
    }

    pub fn teens_and_ties(&self) -> &VectorFst {
        &self.teens_and_ties
    }

    /// Any single digit spoken on its own, zero included.
    pub fn single_digit(&self) -> &VectorFst {
        &self.single_digit
    }

    fn lengths(&self, lengths: std::ops::RangeInclusive<usize>) -> VectorFst {
        let parts: Vec<&VectorFst> = lengths.map(|n| &self.by_length[n]).collect();
        union_all(&parts)
    }

    /// Numbers of at most `max_digits` digits without leading zeros, zero
    /// itself included.
    pub fn up_to_digits(&self, max_digits: usize) -> VectorFst {
        union(&self.zero, &self.positive_up_to_digits(max_digits))
    }

    /// 1 up to `max_digits` digits, no leading zeros.
    pub fn positive_up_to_digits(&self, max_digits: usize) -> VectorFst {
        self.lengths(1..=max_digits.min(MAX_DIGITS))
    }

    /// Numbers without leading zeros, zero itself included.
    pub fn without_leading_zeros(&self) -> VectorFst {
        self.up_to_digits(MAX_DIGITS)
    }

    /// 0 to 999.
    pub fn below_thousand(&self) -> VectorFst {
        self.up_to_digits(3)
    }

    /// 1000 and above, no leading zeros.
    pub fn at_least_thousand(&self) -> VectorFst {
        self.lengths(4..=MAX_DIGITS)
    }

    /// Digit by digit: `"007"` -> शून्य शून्य सात.
    pub fn digit_by_digit(&self) -> VectorFst {
        concat(
            &self.single_digit,
            &star(&concat(&insert_space(), &self.single_digit)),
        )
    }

    /// All readings: numbers without leading zeros, and strings with a
    /// leading zero spoken digit by digit at a small extra cost.
    pub fn graph(&self) -> VectorFst {
        let leading_zeros = concat(
            &self.zero,
            &closure(
                &concat(&insert_space(), &self.single_digit),
                1,
                Some(MAX_DIGITS - 1),
            ),
        );
        union(
            &self.without_leading_zeros(),
            &add_weight(&leading_zeros, Weight::new(LEADING_ZEROS_WEIGHT)),
        )
    }

    /// Optional minus sign as a `negative` field.
    pub fn negative() -> VectorFst {
        optional(&VectorFst::cross("-", "negative: \"true\" "))
    }

    /// `cardinal { negative: "true" integer: "…" }`.
    pub fn fst(&self) -> VectorFst {
        wrap(
            "cardinal { ",
            &concat(
                &Self::negative(),
                &wrap("integer: \"", &self.graph(), "\""),
            ),
            " }",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::EmbeddedTables;
    use tnorm_core::character::to_devanagari_digits;
    use tnorm_fst::Grammar;

    fn cardinal() -> CardinalTagger {
        CardinalTagger::new(&RuleTables::load(&EmbeddedTables).unwrap()).unwrap()
    }

    fn words(fst: &VectorFst, input: &str) -> String {
        Grammar::new("test", fst).unwrap().apply(input).unwrap()
    }

    #[test]
    fn small_numbers() {
        let c = cardinal();
        let g = Grammar::new("numbers", &c.without_leading_zeros()).unwrap();
        assert_eq!(g.apply("0").unwrap(), "शून्य");
        assert_eq!(g.apply("7").unwrap(), "सात");
        assert_eq!(g.apply("42").unwrap(), "बयालीस");
        assert_eq!(g.apply("100").unwrap(), "एक सौ");
        assert_eq!(g.apply("105").unwrap(), "एक सौ पाँच");
        assert_eq!(g.apply("999").unwrap(), "नौ सौ निन्यानबे");
    }

    #[test]
    fn indian_magnitude_tiers() {
        let c = cardinal();
        let g = Grammar::new("numbers", &c.without_leading_zeros()).unwrap();
        assert_eq!(g.apply("1000").unwrap(), "एक हज़ार");
        assert_eq!(g.apply("7000").unwrap(), "सात हज़ार");
        assert_eq!(g.apply("2024").unwrap(), "दो हज़ार चौबीस");
        assert_eq!(g.apply("12345").unwrap(), "बारह हज़ार तीन सौ पैंतालीस");
        assert_eq!(g.apply("100000").unwrap(), "एक लाख");
        assert_eq!(g.apply("105020").unwrap(), "एक लाख पाँच हज़ार बीस");
        assert_eq!(g.apply("884404").unwrap(), "आठ लाख चौरासी हज़ार चार सौ चार");
        assert_eq!(g.apply("10000000").unwrap(), "एक करोड़");
        assert_eq!(g.apply("1000000001").unwrap(), "एक अरब एक");
        assert_eq!(g.apply("9900000000000").unwrap(), "निन्यानबे खरब");
        assert!(!g.accepts("12345678901234"));
    }

    #[test]
    fn no_leading_zeros_in_plain_numbers() {
        let c = cardinal();
        let g = Grammar::new("numbers", &c.without_leading_zeros()).unwrap();
        assert!(!g.accepts("007"));
        assert!(!g.accepts("0100"));
        assert_eq!(words(&c.graph(), "007"), "शून्य शून्य सात");
    }

    #[test]
    fn glyph_set_invariance() {
        let c = cardinal();
        let g = Grammar::new("numbers", &c.graph()).unwrap();
        for n in [0u64, 5, 19, 70, 101, 999, 1000, 7000, 45678, 884404, 12345678, 9876543210] {
            let ascii = n.to_string();
            let devanagari = to_devanagari_digits(&ascii);
            assert_eq!(g.apply(&ascii).unwrap(), g.apply(&devanagari).unwrap(), "{n}");
        }
    }

    #[test]
    fn thousand_boundary_is_exact() {
        let c = cardinal();
        let small = Grammar::new("small", &c.below_thousand()).unwrap();
        let large = Grammar::new("large", &c.at_least_thousand()).unwrap();
        assert!(small.accepts("999"));
        assert!(!small.accepts("1000"));
        assert!(large.accepts("1000"));
        assert!(!large.accepts("999"));
        assert!(!large.accepts("0999"));
    }

    #[test]
    fn tagged_cardinal() {
        let c = cardinal();
        assert_eq!(words(&c.fst(), "12"), "cardinal { integer: \"बारह\" }");
        assert_eq!(
            words(&c.fst(), "-१२"),
            "cardinal { negative: \"true\" integer: \"बारह\" }"
        );
    }
}
