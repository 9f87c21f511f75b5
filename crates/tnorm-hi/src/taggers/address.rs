// Address tagging.
//
// Two forms produce the same tag,
//   units: "address" cardinal { integer: "…" } preserve_order: true
//
// Structured addresses are a transducer: optional street number, up to five
// words, a state or city name and an optional pincode, with every digit
// spoken on its own.
//
// Contextual addresses are found by scanning words around an address
// keyword (रोड, street, सेक्टर, ...). Each word of the region is converted on
// its own by the word transducer: ordinals, English address words, spelled
// letters, and digits or `-` `/` read one character at a time.

use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use tnorm_core::case::case_variants;
use tnorm_core::character::{is_digit, DANDA};
use tnorm_core::charset::CharSet;
use tnorm_core::enums::InputCase;
use tnorm_core::token::Token;
use tnorm_fst::ops::{add_weight, closure, concat, concat_all, optional, plus, star, union, union_all};
use tnorm_fst::{Candidate, Grammar, VectorFst, Weight};

use crate::alphabet::{
    accep_set, digits, insert_space, not_space, repeat, sigma, wrap, COMMA, HYPHEN, PERIOD,
    QUOTE, SLASH, SPACE,
};
use crate::tables::RuleTables;
use crate::taggers::cardinal::CardinalTagger;
use crate::taggers::ordinal::OrdinalTagger;
use crate::tokenizer::content_tokens;

pub const STRUCTURED_WEIGHT: f32 = 1.0;
pub const CONTEXTUAL_WEIGHT: f32 = 1.05;

const ORDINAL_WEIGHT: f32 = -5.0;
const ENGLISH_WORD_WEIGHT: f32 = -3.0;
const LETTER_WEIGHT: f32 = 0.5;
const OTHER_WORD_WEIGHT: f32 = 0.1;

/// Words read before and after an address keyword.
pub const CONTEXT_WORDS: usize = 5;

const PINCODE_DIGITS: usize = 6;
const MAX_STREET_DIGITS: usize = 4;

/// Wrap a spoken address in the address tag.
pub fn address_tag(spoken: &str) -> String {
    format!("units: \"address\" cardinal {{ integer: \"{spoken}\" }} preserve_order: true")
}

// ---------------------------------------------------------------------------
// Structured addresses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StructuredAddress {
    graph: VectorFst,
}

impl StructuredAddress {
    pub fn new(tables: &RuleTables, cardinal: &CardinalTagger) -> Self {
        let digit = cardinal.single_digit();
        let spoken_digit = concat(&insert_space(), digit);
        let pincode = concat(digit, &repeat(&spoken_digit, PINCODE_DIGITS - 1));
        let street = concat(digit, &closure(&spoken_digit, 0, Some(MAX_STREET_DIGITS - 1)));

        let mut excluded = digits();
        excluded.extend([COMMA, PERIOD, DANDA, QUOTE]);
        let word = plus(&accep_set(&not_space().difference(&excluded)));
        let sep = concat(&optional(&VectorFst::accep(",")), &VectorFst::accep(" "));
        let text = closure(&concat(&word, &sep), 0, Some(CONTEXT_WORDS));
        let place = union(&tables.states.keys_acceptor(), &tables.cities.keys_acceptor());

        let pattern = concat_all(&[
            &optional(&concat(&street, &sep)),
            &text,
            &place,
            &optional(&concat(&VectorFst::accep(" "), &pincode)),
        ]);
        let graph = wrap(
            "units: \"address\" cardinal { integer: \"",
            &pattern,
            "\" } preserve_order: true",
        );
        Self {
            graph: add_weight(&graph, Weight::new(STRUCTURED_WEIGHT)),
        }
    }

    pub fn graph(&self) -> &VectorFst {
        &self.graph
    }

    /// Most content tokens one structured address can cover: street number
    /// and comma, the free words each with a comma, the longest place name
    /// and the pincode. Free words count as one token each.
    pub fn max_tokens(tables: &RuleTables) -> usize {
        let place = tables
            .states
            .keys()
            .chain(tables.cities.keys())
            .map(|name| content_tokens(name).len())
            .max()
            .unwrap_or(1);
        2 + 2 * CONTEXT_WORDS + place + 1
    }
}

// ---------------------------------------------------------------------------
// Word conversion
// ---------------------------------------------------------------------------

/// Transducer reading one address word and writing its spoken form, pieces
/// separated by single spaces.
pub fn word_processor(
    tables: &RuleTables,
    cardinal: &CardinalTagger,
    ordinal: &OrdinalTagger,
    input_case: InputCase,
) -> VectorFst {
    let english: Vec<(String, String)> = match input_case {
        InputCase::LowerCased => tables.en_to_hi.entries().to_vec(),
        InputCase::Cased => tables
            .en_to_hi
            .entries()
            .iter()
            .flat_map(|(en, hi)| case_variants(en).into_iter().map(move |v| (v, hi.clone())))
            .collect(),
    };
    let letters = tables.letters.to_fst();
    let characters = union(cardinal.single_digit(), &tables.special_characters.to_fst());

    let mut convertible: CharSet = digits();
    convertible.extend([HYPHEN, SLASH, COMMA, QUOTE, SPACE]);
    convertible.extend(tables.letters.keys().flat_map(str::chars));
    let other = plus(&accep_set(&sigma().difference(&convertible)));

    let piece = union_all(&[
        &add_weight(ordinal.graph(), Weight::new(ORDINAL_WEIGHT)),
        &add_weight(&VectorFst::string_map(&english), Weight::new(ENGLISH_WORD_WEIGHT)),
        &add_weight(&letters, Weight::new(LETTER_WEIGHT)),
        &characters,
        &add_weight(&other, Weight::new(OTHER_WORD_WEIGHT)),
    ]);
    concat(&piece, &star(&concat(&insert_space(), &piece)))
}

// ---------------------------------------------------------------------------
// Contextual scanner
// ---------------------------------------------------------------------------

/// An address region found around a keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressMatch {
    /// First token of the region.
    pub first: usize,
    /// Last token of the region, inclusive.
    pub last: usize,
    /// Address tag, without the `measure` wrapper.
    pub tagged: String,
    pub weight: Weight,
}

/// Maximal run of touching tokens without a boundary mark.
#[derive(Debug)]
struct Word {
    first: usize,
    last: usize,
    text: String,
    /// Separator written before the next word.
    separator: &'static str,
}

fn separator_of(mark: &str) -> Option<&'static str> {
    match mark {
        "," => Some(", "),
        "." => Some(". "),
        "।" => Some("। "),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct ContextualAddress {
    words: Arc<Grammar>,
    keywords: HashSet<String>,
}

impl ContextualAddress {
    /// `words` is the compiled [`word_processor`].
    pub fn new(words: Arc<Grammar>, tables: &RuleTables, input_case: InputCase) -> Self {
        let mut keywords: HashSet<String> =
            tables.address_context.keys().map(str::to_string).collect();
        for english in tables.en_to_hi.keys() {
            match input_case {
                InputCase::Cased => keywords.extend(case_variants(english)),
                InputCase::LowerCased => {
                    keywords.insert(english.to_string());
                }
            }
        }
        Self { words, keywords }
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(word)
    }

    /// Spoken form of one word, or `None` if the word cannot be read.
    pub fn convert_word(&self, word: &str) -> Option<Candidate> {
        self.words.best(word).ok()
    }

    fn split_words(tokens: &[Token]) -> Vec<Word> {
        let mut words: Vec<Word> = Vec::new();
        let mut open = false;
        for (i, token) in tokens.iter().enumerate() {
            if let Some(sep) = separator_of(&token.text) {
                if let Some(last) = words.last_mut() {
                    if last.separator == " " {
                        last.separator = sep;
                    }
                }
                open = false;
                continue;
            }
            let touching = i > 0 && tokens[i - 1].end() == token.pos;
            match words.last_mut() {
                Some(last) if open && touching => {
                    last.last = i;
                    last.text.push_str(&token.text);
                }
                _ => words.push(Word {
                    first: i,
                    last: i,
                    text: token.text.clone(),
                    separator: " ",
                }),
            }
            open = true;
        }
        words
    }

    /// Every address region around a keyword in `tokens` (whitespace tokens
    /// already removed). Regions that cover the same tokens keep the lowest
    /// weight.
    pub fn scan(&self, tokens: &[Token]) -> Vec<AddressMatch> {
        let words = Self::split_words(tokens);
        let mut converted: HashMap<usize, Option<Candidate>> = HashMap::new();
        let mut convert = |i: usize| -> Option<Candidate> {
            converted
                .entry(i)
                .or_insert_with(|| self.convert_word(&words[i].text))
                .clone()
        };

        let mut best: HashMap<(usize, usize), AddressMatch> = HashMap::new();
        for k in 0..words.len() {
            if !self.is_keyword(&words[k].text) || convert(k).is_none() {
                continue;
            }
            let mut lo_limit = k;
            while lo_limit > 0 && k - lo_limit < CONTEXT_WORDS && convert(lo_limit - 1).is_some() {
                lo_limit -= 1;
            }
            let mut hi_limit = k;
            while hi_limit + 1 < words.len()
                && hi_limit - k < CONTEXT_WORDS
                && convert(hi_limit + 1).is_some()
            {
                hi_limit += 1;
            }

            for lo in lo_limit..=k {
                for hi in k..=hi_limit {
                    let region = &words[lo..=hi];
                    if !region.iter().any(|w| w.text.chars().any(is_digit)) {
                        continue;
                    }
                    let mut spoken = String::new();
                    let mut weight = Weight::new(CONTEXTUAL_WEIGHT);
                    for i in lo..=hi {
                        let Some(word) = convert(i) else {
                            continue;
                        };
                        if i > lo {
                            spoken.push_str(words[i - 1].separator);
                        }
                        spoken.push_str(&word.output);
                        weight = weight.times(word.weight);
                    }
                    let candidate = AddressMatch {
                        first: words[lo].first,
                        last: words[hi].last,
                        tagged: address_tag(&spoken),
                        weight,
                    };
                    best.entry((candidate.first, candidate.last))
                        .and_modify(|m| {
                            if (candidate.weight, &candidate.tagged) < (m.weight, &m.tagged) {
                                *m = candidate.clone();
                            }
                        })
                        .or_insert(candidate);
                }
            }
        }

        let mut matches: Vec<AddressMatch> = best.into_values().collect();
        matches.sort_by(|a, b| (a.first, a.last, a.weight).cmp(&(b.first, b.last, b.weight)));
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::EmbeddedTables;
    use crate::tokenizer::tokenize;

    fn tables() -> RuleTables {
        RuleTables::load(&EmbeddedTables).unwrap()
    }

    fn structured() -> Grammar {
        let tables = tables();
        let cardinal = CardinalTagger::new(&tables).unwrap();
        Grammar::new("address", StructuredAddress::new(&tables, &cardinal).graph()).unwrap()
    }

    fn contextual(input_case: InputCase) -> ContextualAddress {
        let tables = tables();
        let cardinal = CardinalTagger::new(&tables).unwrap();
        let ordinal = OrdinalTagger::new(&tables, &cardinal, input_case);
        let words = word_processor(&tables, &cardinal, &ordinal, input_case);
        let grammar = Arc::new(Grammar::new("address_words", &words).unwrap());
        ContextualAddress::new(grammar, &tables, input_case)
    }

    fn words_only(text: &str) -> Vec<Token> {
        tokenize(text)
            .into_iter()
            .filter(|t| !t.text.trim().is_empty())
            .collect()
    }

    #[test]
    fn city_with_pincode() {
        let g = structured();
        let best = g.best("मुंबई ८८४४०४").unwrap();
        assert_eq!(
            best.output,
            address_tag("मुंबई आठ आठ चार चार शून्य चार")
        );
        assert_eq!(best.weight, Weight::new(STRUCTURED_WEIGHT));
    }

    #[test]
    fn street_words_and_state() {
        let g = structured();
        assert_eq!(
            g.apply("12, पार्क स्ट्रीट, महाराष्ट्र 400001").unwrap(),
            address_tag("एक दो, पार्क स्ट्रीट, महाराष्ट्र चार शून्य शून्य शून्य शून्य एक")
        );
        assert!(!g.accepts("पार्क स्ट्रीट 400001"));
        assert!(!g.accepts("मुंबई 4000"));
    }

    #[test]
    fn longest_structured_address_fits_in_one_span() {
        let tables = tables();
        let text = "12, क, ख, ग, घ, ङ, नई दिल्ली 110001";
        assert!(structured().accepts(text));
        assert_eq!(content_tokens(text).len(), 15);
        assert_eq!(StructuredAddress::max_tokens(&tables), 15);
    }

    #[test]
    fn words_are_converted_piece_by_piece() {
        let scanner = contextual(InputCase::Cased);
        let word = |w: &str| scanner.convert_word(w).unwrap().output;
        assert_eq!(word("66-4"), "छह छह हाइफ़न चार");
        assert_eq!(word("12/3"), "एक दो स्लैश तीन");
        assert_eq!(word("Road"), "रोड");
        assert_eq!(word("5th"), "पाँचवाँ");
        assert_eq!(word("B"), "बी");
        assert_eq!(word("ओक"), "ओक");
        assert!(scanner.convert_word("\"x\"").is_none());
    }

    #[test]
    fn region_around_keyword() {
        let scanner = contextual(InputCase::Cased);
        let tokens = words_only("वह ६६-४ पार्क रोड पर है");
        let matches = scanner.scan(&tokens);
        let widest = matches
            .iter()
            .max_by_key(|m| m.last - m.first)
            .unwrap();
        assert_eq!(widest.first, 0);
        assert_eq!(widest.last, 5);
        assert!(matches.iter().any(|m| {
            m.first == 1 && m.last == 3 && m.tagged == address_tag("छह छह हाइफ़न चार पार्क रोड")
        }));
    }

    #[test]
    fn commas_are_kept_between_words() {
        let scanner = contextual(InputCase::Cased);
        let tokens = words_only("Flat 12, MG Road");
        let matches = scanner.scan(&tokens);
        let all = matches.iter().find(|m| m.first == 0 && m.last == tokens.len() - 1).unwrap();
        assert_eq!(all.tagged, address_tag("फ्लैट एक दो, एम जी रोड"));
    }

    #[test]
    fn keyword_without_digits_is_not_an_address() {
        let scanner = contextual(InputCase::Cased);
        assert!(scanner.scan(&words_only("पार्क रोड पर चलो")).is_empty());
    }

    #[test]
    fn lower_cased_mode_ignores_capitalized_keywords() {
        let scanner = contextual(InputCase::LowerCased);
        assert!(scanner.scan(&words_only("Road 12")).is_empty());
        assert!(!scanner.scan(&words_only("road 12")).is_empty());
    }
}
