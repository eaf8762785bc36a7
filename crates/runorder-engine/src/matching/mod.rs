//! Team-name matching.
//!
//! Two disciplines resolve free text to canonical roster names:
//!
//! | Matcher | Accepts | Used for |
//! |---------|---------|----------|
//! | [`StrictMatcher`] | canonical name or listed alternate, whole words | scoreboard and full-time graphic text |
//! | [`FuzzyMatcher`] | strict hits, distinctive name tokens, near-miss tokens | transcript scanning, interlude and table validation |
//!
//! Every call site picks its matcher at construction; there is no default.

pub mod fuzzy;
pub mod strict;
pub mod text;

pub use fuzzy::FuzzyMatcher;
pub use strict::StrictMatcher;
pub use text::NormalizedText;

/// Matching discipline of a [`TeamMatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDiscipline {
    Strict,
    Fuzzy,
}

/// Resolves normalised text to canonical team names.
pub trait TeamMatcher: Send + Sync {
    /// Canonical names mentioned in `text`, ordered by first appearance.
    fn find_teams(&self, text: &NormalizedText) -> Vec<String>;

    fn discipline(&self) -> MatchDiscipline;

    /// True if `team` (canonical name) is mentioned in `text`.
    fn mentions(&self, text: &NormalizedText, team: &str) -> bool {
        self.find_teams(text).iter().any(|t| t == team)
    }
}

/// Order `(offset, name)` hits by offset, then name, and keep the names.
fn ordered_names(mut hits: Vec<(usize, String)>) -> Vec<String> {
    hits.sort();
    hits.into_iter().map(|(_, name)| name).collect()
}
