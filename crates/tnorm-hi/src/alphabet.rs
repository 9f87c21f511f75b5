// Working alphabet and primitive acceptors shared by every Hindi grammar.

use tnorm_core::character::{
    ASCII_DIGITS, DANDA, DEVANAGARI_DIGITS, DOUBLE_DANDA, is_opening_bracket, is_whitespace,
    to_ascii_digits, to_devanagari_digits,
};
use tnorm_core::charset::CharSet;
use tnorm_fst::ops::{closure, concat_all, optional, union};
use tnorm_fst::VectorFst;

pub const SPACE: char = ' ';
pub const COMMA: char = ',';
pub const PERIOD: char = '.';
pub const HYPHEN: char = '-';
pub const SLASH: char = '/';
pub const QUOTE: char = '"';

/// Every character a grammar can read or write.
///
/// Span texts only contain single spaces as whitespace, so space is the one
/// whitespace character in the alphabet.
pub fn sigma() -> CharSet {
    let mut set = CharSet::from_range('!', '~');
    set.insert(SPACE);
    set.extend(CharSet::from_range('\u{00A1}', '\u{00FF}').iter());
    set.extend(CharSet::from_range('\u{0900}', '\u{097F}').iter());
    set.extend(['\u{200C}', '\u{200D}']);
    set.extend(CharSet::from_range('\u{2010}', '\u{2027}').iter());
    set.extend(CharSet::from_range('\u{2030}', '\u{205E}').iter());
    set.insert('\u{20B9}');
    set.filter(|c| c == SPACE || !is_whitespace(c))
}

pub fn ascii_digits() -> CharSet {
    ASCII_DIGITS.into_iter().collect()
}

pub fn devanagari_digits() -> CharSet {
    DEVANAGARI_DIGITS.into_iter().collect()
}

/// Digits of both glyph sets.
pub fn digits() -> CharSet {
    ascii_digits().union(&devanagari_digits())
}

/// Characters that may not be preceded by a space in the final text.
///
/// All marks except quotes, dashes and opening brackets.
pub fn no_space_before() -> CharSet {
    let mut set = CharSet::from_chars("!#$%&)*+,./:;=>?@\\]^_`|}~");
    set.extend([DANDA, DOUBLE_DANDA, '\u{2026}', '\u{00BB}', '\u{201D}', '\u{2019}']);
    set
}

/// Characters after which spaces are removed.
pub fn opening_brackets() -> CharSet {
    sigma().filter(is_opening_bracket)
}

/// Any character except space.
pub fn not_space() -> CharSet {
    sigma().difference(&CharSet::from_chars(" "))
}

/// Any character allowed inside a quoted tag value.
pub fn not_quote() -> CharSet {
    sigma().difference(&CharSet::from_chars("\""))
}

// ---------------------------------------------------------------------------
// Transducer shorthands
// ---------------------------------------------------------------------------

pub fn accep_set(set: &CharSet) -> VectorFst {
    VectorFst::char_class(set)
}

pub fn insert_space() -> VectorFst {
    VectorFst::insert(" ")
}

/// Optionally delete one space.
pub fn delete_space() -> VectorFst {
    optional(&VectorFst::delete(" "))
}

/// `x{n}` as an exact count.
pub fn repeat(fst: &VectorFst, n: usize) -> VectorFst {
    closure(fst, n, Some(n))
}

/// `insert(open) fst insert(close)`.
pub fn wrap(open: &str, fst: &VectorFst, close: &str) -> VectorFst {
    concat_all(&[&VectorFst::insert(open), fst, &VectorFst::insert(close)])
}

/// Delete `ascii`, or the same text written with Devanagari digits.
pub fn delete_digits(ascii: &str) -> VectorFst {
    let devanagari = to_devanagari_digits(ascii);
    if devanagari == ascii {
        return VectorFst::delete(ascii);
    }
    union(&VectorFst::delete(ascii), &VectorFst::delete(&devanagari))
}

/// A digit-keyed table offered in both glyph sets: every key written with
/// Devanagari digits is also accepted with the ASCII digits of equal value.
pub fn both_glyph_sets(pairs: &[(String, String)]) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::with_capacity(pairs.len() * 2);
    for (key, value) in pairs {
        out.push((key.clone(), value.clone()));
        let ascii = to_ascii_digits(key);
        if ascii != *key {
            out.push((ascii, value.clone()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tnorm_fst::Grammar;

    #[test]
    fn sigma_has_one_whitespace_character() {
        let s = sigma();
        assert!(s.contains(' '));
        assert!(!s.contains('\u{00A0}'));
        assert!(!s.contains('\t'));
        assert!(s.contains('क'));
        assert!(s.contains('₹'));
        assert!(s.contains('\u{2026}'));
    }

    #[test]
    fn no_space_before_excludes_quotes_dashes_and_openers() {
        let p = no_space_before();
        for c in ['\'', '"', '\u{00AB}', '-', '\u{2014}', '<', '{', '(', '['] {
            assert!(!p.contains(c), "{c:?}");
        }
        for c in [',', '.', ';', ':', '!', '?', ')', ']', '।'] {
            assert!(p.contains(c), "{c:?}");
        }
        assert!(p.difference(&sigma()).is_empty());
    }

    #[test]
    fn glyph_sets_are_alternatives() {
        let pairs = both_glyph_sets(&[("१२".to_string(), "बारह".to_string())]);
        assert_eq!(pairs.len(), 2);
        let g = Grammar::new("twelve", &VectorFst::string_map(&pairs)).unwrap();
        assert_eq!(g.apply("१२").unwrap(), "बारह");
        assert_eq!(g.apply("12").unwrap(), "बारह");
    }

    #[test]
    fn exact_repeat_is_not_open_ended() {
        let g = Grammar::new("five", &repeat(&accep_set(&digits()), 5)).unwrap();
        assert!(g.accepts("12345"));
        assert!(g.accepts("१२३४५"));
        assert!(!g.accepts("1234"));
        assert!(!g.accepts("123456"));
    }
}
