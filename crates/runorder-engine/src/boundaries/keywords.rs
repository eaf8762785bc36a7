//! Keyword co-occurrence search over transcript sentences.

use crate::matching::text::normalize_lexicon;
use crate::normalizer::Sentence;

/// A pair of keyword lists that must co-occur in the same or adjacent
/// sentences, e.g. a day of the week and a programme name.
#[derive(Debug, Clone)]
pub struct CoOccurrence {
    primary: Vec<String>,
    qualifiers: Vec<String>,
}

impl CoOccurrence {
    pub fn new(primary: &[String], qualifiers: &[String]) -> Self {
        Self {
            primary: normalize_lexicon(primary),
            qualifiers: normalize_lexicon(qualifiers),
        }
    }

    /// Timestamp of the first co-occurrence in time-ordered `sentences`.
    /// When the two keywords fall in adjacent sentences the earlier
    /// sentence's start is returned.
    pub fn find(&self, sentences: &[&Sentence]) -> Option<f64> {
        for (i, &sentence) in sentences.iter().enumerate() {
            if !sentence.text.contains_any(&self.primary) {
                continue;
            }
            let qualified = |s: &Sentence| s.text.contains_any(&self.qualifiers);

            if let Some(previous) = i.checked_sub(1).map(|p| sentences[p]) {
                if qualified(previous) {
                    return Some(previous.start);
                }
            }
            if qualified(sentence) {
                return Some(sentence.start);
            }
            if sentences.get(i + 1).is_some_and(|next| qualified(*next)) {
                return Some(sentence.start);
            }
        }
        None
    }
}
