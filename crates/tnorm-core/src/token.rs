// Token and token-window types

use serde::Serialize;

use crate::enums::TokenType;

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A text token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The type of this token.
    pub token_type: TokenType,

    /// The text content of this token.
    pub text: String,

    /// Byte offset of the token within the source text.
    pub pos: usize,
}

impl Token {
    /// Create a new token starting at byte offset `pos`.
    pub fn new(token_type: TokenType, text: impl Into<String>, pos: usize) -> Self {
        Self {
            token_type,
            text: text.into(),
            pos,
        }
    }

    /// Byte offset one past the end of the token.
    pub fn end(&self) -> usize {
        self.pos + self.text.len()
    }
}

// ---------------------------------------------------------------------------
// TokenWindow
// ---------------------------------------------------------------------------

/// A run of consecutive non-whitespace tokens `[first, last]` (inclusive
/// token indices) considered as one candidate span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenWindow {
    pub first: usize,
    pub last: usize,
}

impl TokenWindow {
    pub fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    /// Number of tokens covered.
    pub fn len(&self) -> usize {
        self.last + 1 - self.first
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Source text covered by the window, with every whitespace run between
    /// tokens collapsed to a single space. Tokens that touch in the source
    /// (`12kg` `,`) stay joined.
    pub fn text(&self, tokens: &[Token]) -> String {
        let mut out = String::new();
        for i in self.first..=self.last {
            if i > self.first && tokens[i].pos > tokens[i - 1].end() {
                out.push(' ');
            }
            out.push_str(&tokens[i].text);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_new() {
        let tok = Token::new(TokenType::Word, "सड़क", 0);
        assert_eq!(tok.token_type, TokenType::Word);
        assert_eq!(tok.text, "सड़क");
        assert_eq!(tok.pos, 0);
        assert_eq!(tok.end(), "सड़क".len());
    }

    #[test]
    fn window_text_collapses_whitespace() {
        let comma = "मुंबई".len();
        let tokens = vec![
            Token::new(TokenType::Word, "मुंबई", 0),
            Token::new(TokenType::Punctuation, ",", comma),
            Token::new(TokenType::Word, "महाराष्ट्र", comma + 4),
        ];
        let window = TokenWindow::new(0, 2);
        assert_eq!(window.len(), 3);
        assert_eq!(window.text(&tokens), "मुंबई, महाराष्ट्र");
        assert_eq!(TokenWindow::new(1, 1).text(&tokens), ",");
    }
}
