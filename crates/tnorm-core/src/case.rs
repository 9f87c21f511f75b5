// Case variants of lexicon entries for mixed-case input.

/// `word` with its first character upper-cased and the rest lower-cased.
fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Spellings of a lexicon entry accepted in cased input: lower-case,
/// capitalized and upper-case, in that order and without duplicates.
///
/// Entries without cased letters (Devanagari, digits) yield one variant.
pub fn case_variants(word: &str) -> Vec<String> {
    let mut variants: Vec<String> = Vec::with_capacity(3);
    for variant in [word.to_lowercase(), capitalized(word), word.to_uppercase()] {
        if !variants.contains(&variant) {
            variants.push(variant);
        }
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_keyword() {
        assert_eq!(case_variants("road"), vec!["road", "Road", "ROAD"]);
        assert_eq!(case_variants("sTREET"), vec!["street", "Street", "STREET"]);
    }

    #[test]
    fn ordinal_suffix_and_letter() {
        assert_eq!(case_variants("th"), vec!["th", "Th", "TH"]);
        assert_eq!(case_variants("a"), vec!["a", "A"]);
    }

    #[test]
    fn devanagari_has_one_spelling() {
        assert_eq!(case_variants("रोड"), vec!["रोड"]);
        assert_eq!(case_variants("12"), vec!["12"]);
    }
}
