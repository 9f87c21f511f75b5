// Tag strings to spoken text.
//
//   tokens { cardinal { negative: "true" integer: "बारह" } }   -> माइनस बारह
//   tokens { decimal { integer_part: "बारह" fractional_part: "दो" } } -> बारह दशमलव दो
//   tokens { measure { cardinal { integer: "बारह" } units: "किलोग्राम" } } -> बारह किलोग्राम
//   tokens { measure { units: "address" cardinal { integer: "…" } preserve_order: true } } -> …
//
// Groups are separated by one space and verbalized in order.

use tnorm_fst::ops::{concat, concat_all, optional, star, union, union_all};
use tnorm_fst::{Grammar, VectorFst};
use tracing::debug;

use crate::alphabet::{accep_set, not_quote};
use crate::error::NormalizeError;

const MINUS: &str = "माइनस";
const POINT: &str = "दशमलव";

/// The verbalizing transducer.
pub fn verbalizer_fst() -> VectorFst {
    let value = star(&accep_set(&not_quote()));
    let negative = optional(&VectorFst::cross("negative: \"true\" ", &format!("{MINUS} ")));
    let del = VectorFst::delete;

    let cardinal = concat_all(&[
        &del("cardinal { "),
        &negative,
        &del("integer: \""),
        &value,
        &del("\" }"),
    ]);
    let decimal = concat_all(&[
        &del("decimal { "),
        &negative,
        &del("integer_part: \""),
        &value,
        &VectorFst::cross("\" fractional_part: \"", &format!(" {POINT} ")),
        &value,
        &del("\" }"),
    ]);
    let measure = concat_all(&[
        &del("measure { "),
        &union(&cardinal, &decimal),
        &VectorFst::cross(" units: \"", " "),
        &value,
        &del("\" }"),
    ]);
    let address = concat_all(&[
        &del("measure { units: \"address\" cardinal { integer: \""),
        &value,
        &del("\" } preserve_order: true }"),
    ]);

    let group = concat_all(&[
        &del("tokens { "),
        &union_all(&[&cardinal, &decimal, &measure, &address]),
        &del(" }"),
    ]);
    concat(&group, &star(&concat(&VectorFst::accep(" "), &group)))
}

pub fn build_verbalizer() -> Result<Grammar, NormalizeError> {
    let grammar = Grammar::new("verbalize", &verbalizer_fst())?;
    debug!(
        states = grammar.num_states(),
        transitions = grammar.num_transitions(),
        "built verbalizer grammar"
    );
    Ok(grammar)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verbalize(tagged: &str) -> String {
        build_verbalizer().unwrap().apply(tagged).unwrap()
    }

    #[test]
    fn numbers() {
        assert_eq!(verbalize("tokens { cardinal { integer: \"बारह\" } }"), "बारह");
        assert_eq!(
            verbalize("tokens { cardinal { negative: \"true\" integer: \"बारह\" } }"),
            "माइनस बारह"
        );
        assert_eq!(
            verbalize(
                "tokens { decimal { integer_part: \"सोलह\" fractional_part: \"शून्य सात\" } }"
            ),
            "सोलह दशमलव शून्य सात"
        );
    }

    #[test]
    fn measures() {
        assert_eq!(
            verbalize(
                "tokens { measure { cardinal { negative: \"true\" integer: \"बारह\" } units: \"किलोग्राम\" } }"
            ),
            "माइनस बारह किलोग्राम"
        );
        assert_eq!(
            verbalize(
                "tokens { measure { decimal { integer_part: \"सोलह\" fractional_part: \"शून्य सात\" } units: \"वर्ष\" } }"
            ),
            "सोलह दशमलव शून्य सात वर्ष"
        );
        assert_eq!(
            verbalize("tokens { measure { cardinal { integer: \"डेढ़\" } units: \"किलो\" } }"),
            "डेढ़ किलो"
        );
    }

    #[test]
    fn multiplier_groups_are_joined() {
        assert_eq!(
            verbalize(
                "tokens { measure { cardinal { integer: \"दो\" } units: \"बाई\" } } tokens { cardinal { integer: \"तीन\" } }"
            ),
            "दो बाई तीन"
        );
    }

    #[test]
    fn address_keeps_its_text() {
        assert_eq!(
            verbalize(
                "tokens { measure { units: \"address\" cardinal { integer: \"मुंबई, आठ आठ चार\" } preserve_order: true } }"
            ),
            "मुंबई, आठ आठ चार"
        );
    }

    #[test]
    fn malformed_tags_are_rejected() {
        let g = build_verbalizer().unwrap();
        assert!(!g.accepts("tokens { name: \"x\" }"));
        assert!(!g.accepts("cardinal { integer: \"बारह\" }"));
    }
}
