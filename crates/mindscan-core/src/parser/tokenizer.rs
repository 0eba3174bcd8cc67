//! # Word Tokenizer
//!
//! Splits free text into word and punctuation tokens for sequence labeling.
//! Offsets are byte positions in the original string, so any run of tokens
//! maps back to an exact slice of the input.

use regex::Regex;

use crate::error::Result;

/// A token extracted from input text with positional information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token text exactly as it appears in the input
    pub text: String,
    /// Start byte offset in the original string
    pub start: usize,
    /// End byte offset (exclusive) in the original string
    pub end: usize,
}

impl Token {
    /// Lowercased form used for feature extraction.
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }
}

/// Words keep internal apostrophes and hyphens ("can't", "sleep-deprived");
/// any other non-space character stands alone.
const TOKEN_PATTERN: &str = r"[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*|\S";

/// Tokenizer for user sentences.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
}

impl Tokenizer {
    /// Create a new tokenizer instance.
    ///
    /// # Errors
    ///
    /// Returns `MindscanError::RegexError` if the token pattern fails to
    /// compile (should never happen with the static pattern).
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(TOKEN_PATTERN)?,
        })
    }

    /// Tokenize a sentence into a sequence of tokens.
    ///
    /// # Examples
    /// ```
    /// use mindscan_core::parser::tokenizer::Tokenizer;
    ///
    /// let tokenizer = Tokenizer::new().unwrap();
    /// let tokens = tokenizer.tokenize("I can't sleep.");
    /// assert_eq!(tokens.len(), 4);
    /// assert_eq!(tokens[1].text, "can't");
    /// ```
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        self.pattern
            .find_iter(input)
            .map(|m| Token {
                text: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
            })
            .collect()
    }
}
