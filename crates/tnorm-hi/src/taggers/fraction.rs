// Fractional idioms: quarter and half amounts spoken as Hindi words.
//
//   0.5 -> आधा, 1.5 -> डेढ़, 2.5 -> ढाई
//   n.25 -> सवा n, n.5 -> साढ़े n, n.75 -> पौने (n + 1)
//
// Each idiom carries its own weight. All of them are lower than the weight
// of the generic decimal reading of the same input.

use tnorm_fst::ops::{concat, concat_all, union_all, union_weighted};
use tnorm_fst::{VectorFst, Weight};

use crate::alphabet::{delete_digits, wrap};
use crate::tables::RuleTables;
use crate::taggers::cardinal::CardinalTagger;

pub const DEDH_DHAI_WEIGHT: f32 = -0.2;
pub const SAVVA_WEIGHT: f32 = -0.1;
pub const SADHE_WEIGHT: f32 = -0.1;
pub const PAUNE_WEIGHT: f32 = -0.5;

const HALF: &str = "आधा";
const DEDH: &str = "डेढ़";
const DHAI: &str = "ढाई";
const SAVVA: &str = "सवा";
const SADHE: &str = "साढ़े";
const PAUNE: &str = "पौने";

/// Largest integer part read by the idioms.
const MAX_DIGITS: usize = 7;

#[derive(Debug, Clone)]
pub struct FractionTagger {
    fixed: VectorFst,
    savva: VectorFst,
    sadhe: VectorFst,
    paune: VectorFst,
}

impl FractionTagger {
    pub fn new(tables: &RuleTables, cardinal: &CardinalTagger) -> Self {
        let spoken = |input: &str, word: &str| concat(&delete_digits(input), &VectorFst::insert(word));
        let fixed = union_all(&[
            &spoken("0.5", HALF),
            &spoken("1.5", DEDH),
            &spoken("2.5", DHAI),
        ]);

        let prefixed = |word: &str, number: &VectorFst, fraction: &str| {
            concat_all(&[
                &VectorFst::insert(&format!("{word} ")),
                number,
                &delete_digits(fraction),
            ])
        };
        let savva = prefixed(SAVVA, &cardinal.up_to_digits(MAX_DIGITS), ".25");
        let sadhe = prefixed(SADHE, &cardinal.positive_up_to_digits(MAX_DIGITS), ".5");
        let paune = prefixed(PAUNE, &tables.paune.to_digit_fst(), ".75");

        Self {
            fixed,
            savva,
            sadhe,
            paune,
        }
    }

    /// All idioms as the value of an `integer` field, each at its own weight.
    pub fn fst(&self) -> VectorFst {
        let idioms = union_weighted(&[
            (&self.fixed, Weight::new(DEDH_DHAI_WEIGHT)),
            (&self.savva, Weight::new(SAVVA_WEIGHT)),
            (&self.sadhe, Weight::new(SADHE_WEIGHT)),
            (&self.paune, Weight::new(PAUNE_WEIGHT)),
        ]);
        wrap("integer: \"", &idioms, "\"")
    }
}
