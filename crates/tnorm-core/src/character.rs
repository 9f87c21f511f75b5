// Character classification for Hindi/English mixed text.
//
// Two digit glyph sets are recognized throughout: ASCII (0-9) and Devanagari
// (U+0966..U+096F). Every helper treats them as interchangeable.

use std::borrow::Cow;

/// ASCII digits in value order.
pub const ASCII_DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// Devanagari digits in value order.
pub const DEVANAGARI_DIGITS: [char; 10] = [
    '\u{0966}', '\u{0967}', '\u{0968}', '\u{0969}', '\u{096A}', '\u{096B}', '\u{096C}', '\u{096D}',
    '\u{096E}', '\u{096F}',
];

/// Devanagari full stop (danda).
pub const DANDA: char = '\u{0964}';

/// Devanagari double danda.
pub const DOUBLE_DANDA: char = '\u{0965}';

/// Character type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharType {
    Unknown,
    Letter,
    Digit,
    Whitespace,
    Punctuation,
}

/// Returns the character type for a given character.
///
/// Devanagari vowel signs and the virama count as letters so that a Hindi
/// word is never split in the middle of an akshara.
pub fn get_char_type(c: char) -> CharType {
    if is_digit(c) {
        return CharType::Digit;
    }
    if is_whitespace(c) {
        return CharType::Whitespace;
    }
    if is_punctuation_char(c) {
        return CharType::Punctuation;
    }
    if c.is_alphabetic() || is_devanagari(c) || c == '\u{200C}' || c == '\u{200D}' {
        return CharType::Letter;
    }
    CharType::Unknown
}

/// Marks split off as punctuation tokens: ASCII sentence and bracket
/// marks, guillemets, typographic quotes and dashes, the ellipsis and both
/// dandas.
const PUNCTUATION: [char; 27] = [
    '.', ',', ';', ':', '!', '?', '\'', '"', '(', ')', '[', ']', '{', '}', '<', '>', '\u{00AB}',
    '\u{00BB}', '\u{2013}', '\u{2014}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2026}',
    DANDA, DOUBLE_DANDA,
];

/// Check whether a character is a punctuation mark handled by the tokenizer.
pub fn is_punctuation_char(c: char) -> bool {
    PUNCTUATION.contains(&c)
}

/// Check whether a character is an opening bracket.
pub fn is_opening_bracket(c: char) -> bool {
    matches!(c, '(' | '[' | '{' | '<')
}

/// Check whether a character belongs to the Devanagari block.
pub fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

/// Check whether a character is an ASCII digit.
pub fn is_ascii_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Check whether a character is a Devanagari digit.
pub fn is_devanagari_digit(c: char) -> bool {
    ('\u{0966}'..='\u{096F}').contains(&c)
}

/// Check whether a character is a digit in either supported glyph set.
pub fn is_digit(c: char) -> bool {
    is_ascii_digit(c) || is_devanagari_digit(c)
}

/// Numeric value of a digit in either glyph set.
pub fn digit_value(c: char) -> Option<u32> {
    if is_ascii_digit(c) {
        Some(c as u32 - '0' as u32)
    } else if is_devanagari_digit(c) {
        Some(c as u32 - 0x0966)
    } else {
        None
    }
}

/// Rewrite every Devanagari digit in `s` as the ASCII digit of equal value.
pub fn to_ascii_digits(s: &str) -> String {
    s.chars()
        .map(|c| match digit_value(c) {
            Some(v) if is_devanagari_digit(c) => ASCII_DIGITS[v as usize],
            _ => c,
        })
        .collect()
}

/// Rewrite every ASCII digit in `s` as the Devanagari digit of equal value.
pub fn to_devanagari_digits(s: &str) -> String {
    s.chars()
        .map(|c| match digit_value(c) {
            Some(v) if is_ascii_digit(c) => DEVANAGARI_DIGITS[v as usize],
            _ => c,
        })
        .collect()
}

/// Nukta sign.
pub const NUKTA: char = '\u{093C}';

/// Base letter of a precomposed nukta letter (U+0958..U+095F).
fn nukta_base(c: char) -> Option<char> {
    Some(match c {
        '\u{0958}' => '\u{0915}',
        '\u{0959}' => '\u{0916}',
        '\u{095A}' => '\u{0917}',
        '\u{095B}' => '\u{091C}',
        '\u{095C}' => '\u{0921}',
        '\u{095D}' => '\u{0922}',
        '\u{095E}' => '\u{092B}',
        '\u{095F}' => '\u{092F}',
        _ => return None,
    })
}

/// Rewrite precomposed nukta letters as base letter + nukta sign, the
/// spelling used by every rule table.
pub fn decompose_nukta(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| nukta_base(c).is_some()) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        match nukta_base(c) {
            Some(base) => {
                out.push(base);
                out.push(NUKTA);
            }
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Unicode white space: the characters separating tokens.
pub fn is_whitespace(c: char) -> bool {
    c.is_whitespace()
}
