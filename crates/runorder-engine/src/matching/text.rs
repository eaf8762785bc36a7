//! Text normalisation shared by team matchers and keyword search.

use std::sync::OnceLock;

use regex::Regex;

static NON_WORD: OnceLock<Regex> = OnceLock::new();

fn non_word() -> &'static Regex {
    NON_WORD.get_or_init(|| Regex::new(r"[^\p{L}\p{N}]+").expect("static pattern compiles"))
}

/// Normalise free text: lowercase, punctuation to single spaces, trimmed.
pub fn normalize(text: &str) -> String {
    non_word()
        .replace_all(&text.to_lowercase(), " ")
        .trim()
        .to_string()
}

/// Normalised text ready for whole-word phrase lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// Normalised text with a leading and trailing space
    padded: String,
}

impl NormalizedText {
    pub fn new(text: &str) -> Self {
        Self {
            padded: format!(" {} ", normalize(text)),
        }
    }

    /// Byte offset of the first whole-word occurrence of an already
    /// normalised phrase. Offsets are comparable with [`Self::tokens`].
    pub fn find_phrase(&self, phrase: &str) -> Option<usize> {
        if phrase.is_empty() {
            return None;
        }
        self.padded.find(&format!(" {} ", phrase)).map(|i| i + 1)
    }

    pub fn contains_phrase(&self, phrase: &str) -> bool {
        self.find_phrase(phrase).is_some()
    }

    /// True if any phrase of `lexicon` (already normalised) occurs.
    pub fn contains_any(&self, lexicon: &[String]) -> bool {
        lexicon.iter().any(|phrase| self.contains_phrase(phrase))
    }

    /// Tokens with their byte offsets.
    pub fn tokens(&self) -> impl Iterator<Item = (usize, &str)> {
        self.padded
            .split(' ')
            .scan(0usize, |offset, token| {
                let start = *offset;
                *offset += token.len() + 1;
                Some((start, token))
            })
            .filter(|(_, token)| !token.is_empty())
    }
}

/// Normalise every entry of a keyword list, dropping blanks.
pub fn normalize_lexicon(words: &[String]) -> Vec<String> {
    words
        .iter()
        .map(|w| normalize(w))
        .filter(|w| !w.is_empty())
        .collect()
}
