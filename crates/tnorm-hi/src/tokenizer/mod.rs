// Tokenizer: splits text into words, punctuation marks and whitespace runs.
//
// Word tokens are maximal runs of characters that are neither whitespace nor
// punctuation, so `-12kg`, `66-4` and `2x3` stay whole. A period between two
// digits belongs to the word (`16.07`); anywhere else it is punctuation.

use tnorm_core::character::{get_char_type, is_digit, CharType};
use tnorm_core::enums::TokenType;
use tnorm_core::token::Token;

/// Whether the character at `i` continues a word.
fn is_word_char(chars: &[(usize, char)], i: usize) -> bool {
    let c = chars[i].1;
    match get_char_type(c) {
        CharType::Whitespace => false,
        CharType::Punctuation => {
            c == '.'
                && i > 0
                && i + 1 < chars.len()
                && is_digit(chars[i - 1].1)
                && is_digit(chars[i + 1].1)
        }
        _ => true,
    }
}

/// Length in characters and type of the token starting at `start`.
fn next_token(chars: &[(usize, char)], start: usize) -> (usize, TokenType) {
    let first = chars[start].1;
    match get_char_type(first) {
        CharType::Whitespace => {
            let len = chars[start..]
                .iter()
                .take_while(|&&(_, c)| get_char_type(c) == CharType::Whitespace)
                .count();
            (len, TokenType::Whitespace)
        }
        CharType::Punctuation if !is_word_char(chars, start) => (1, TokenType::Punctuation),
        _ => {
            let mut end = start + 1;
            while end < chars.len() && is_word_char(chars, end) {
                end += 1;
            }
            let is_word = chars[start..end]
                .iter()
                .any(|&(_, c)| matches!(get_char_type(c), CharType::Letter | CharType::Digit));
            let token_type = if is_word {
                TokenType::Word
            } else {
                TokenType::Unknown
            };
            (end - start, token_type)
        }
    }
}

/// Split `text` into tokens covering it completely, in order.
pub fn tokenize(text: &str) -> Vec<Token> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let (len, token_type) = next_token(&chars, i);
        let pos = chars[i].0;
        let end = chars.get(i + len).map_or(text.len(), |&(p, _)| p);
        tokens.push(Token::new(token_type, &text[pos..end], pos));
        i += len;
    }
    tokens
}

/// Tokens that are not whitespace.
pub fn content_tokens(text: &str) -> Vec<Token> {
    tokenize(text)
        .into_iter()
        .filter(|t| t.token_type != TokenType::Whitespace)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn words_punctuation_and_whitespace() {
        let tokens = tokenize("मैं 12kg लाया।");
        assert_eq!(texts(&tokens), vec!["मैं", " ", "12kg", " ", "लाया", "।"]);
        assert_eq!(tokens[1].token_type, TokenType::Whitespace);
        assert_eq!(tokens[5].token_type, TokenType::Punctuation);
        assert_eq!(tokens[2].pos, "मैं ".len());
    }

    #[test]
    fn period_between_digits_stays_in_word() {
        assert_eq!(texts(&tokenize("16.07yr.")), vec!["16.07yr", "."]);
        assert_eq!(texts(&tokenize("१२.५")), vec!["१२.५"]);
        assert_eq!(texts(&tokenize("a.b")), vec!["a", ".", "b"]);
        assert_eq!(texts(&tokenize(".5")), vec![".", "5"]);
    }

    #[test]
    fn symbols_stay_inside_words() {
        assert_eq!(texts(&tokenize("-12kg 66-4 2x3 10*20")), vec![
            "-12kg", " ", "66-4", " ", "2x3", " ", "10*20"
        ]);
    }

    #[test]
    fn whitespace_runs_are_one_token() {
        let tokens = tokenize("a \t\n b");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].text, " \t\n ");
    }

    #[test]
    fn content_tokens_drop_whitespace() {
        assert_eq!(texts(&content_tokens("मुंबई, महाराष्ट्र  ४००००१")), vec![
            "मुंबई", ",", "महाराष्ट्र", "४००००१"
        ]);
        assert!(content_tokens("   ").is_empty());
    }

    #[test]
    fn symbol_only_runs_are_unknown() {
        let tokens = tokenize("% 12%");
        assert_eq!(tokens[0].token_type, TokenType::Unknown);
        assert_eq!(tokens[2].token_type, TokenType::Word);
    }
}
