// Shared enums: TokenType, InputCase.

use serde::{Deserialize, Serialize};

/// Token types produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Word token: letters, digits and word-internal symbols (`-12kg`, `66-4`).
    Word,
    /// Standalone punctuation mark.
    Punctuation,
    /// Whitespace run.
    Whitespace,
    /// Character not used in any supported script.
    Unknown,
}

/// Case-sensitivity mode of the input text.
///
/// In `Cased` mode the foreign-language keyword lexicons also accept the
/// capitalized and all-uppercase spellings of every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputCase {
    /// Input has already been lowercased.
    LowerCased,
    /// Input keeps its original capitalization.
    #[default]
    Cased,
}

impl InputCase {
    /// Short identifier used in cache keys and archive file names.
    pub fn as_str(self) -> &'static str {
        match self {
            InputCase::LowerCased => "lower_cased",
            InputCase::Cased => "cased",
        }
    }
}

impl std::str::FromStr for InputCase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lower_cased" | "lower" => Ok(InputCase::LowerCased),
            "cased" => Ok(InputCase::Cased),
            other => Err(format!("unknown input case: {other}")),
        }
    }
}
