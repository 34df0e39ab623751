//! Query tokenizer: turns free text into search keywords.
//!
//! The query is lowercased and split on whitespace, commas, semicolons,
//! periods, parentheses and the word "and". Short tokens are noise
//! ("is", "to", "my") and are dropped. The result is deduplicated in
//! first-seen order so a repeated word never counts twice.

/// The conjunction users put between symptoms ("fever and cough").
const SEPARATOR_WORD: &str = "and";

/// Default minimum keyword length, in characters.
pub const DEFAULT_MIN_KEYWORD_LEN: usize = 3;

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | ';' | '.' | '(' | ')')
}

/// Splits queries into normalized keywords.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    min_len: usize,
}

impl Tokenizer {
    pub fn new(min_len: usize) -> Self {
        Self { min_len }
    }

    /// Tokenize `text` into distinct lowercase keywords.
    ///
    /// Blank input yields an empty vector.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut keywords: Vec<String> = Vec::new();

        for token in lowered.split(is_separator) {
            if token.is_empty() || token == SEPARATOR_WORD {
                continue;
            }
            if token.chars().count() < self.min_len {
                continue;
            }
            if !keywords.iter().any(|k| k == token) {
                keywords.push(token.to_string());
            }
        }

        keywords
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_KEYWORD_LEN)
    }
}
