//! Fuzzy matcher for transcript speech.
//!
//! Commentators rarely say the full canonical name. A team is mentioned when
//! any of these hold:
//! 1. a strict hit (canonical name or alternate),
//! 2. a distinctive token of one of its names appears ("Palace", "Forest"),
//! 3. a token is a near-miss of a distinctive token (Jaro-Winkler), which
//!    absorbs speech-to-text misspellings such as "Arsenel".
//!
//! A token is distinctive when it is long enough, is not a generic club word
//! and belongs to exactly one roster team.
//!
//! Short single-word alternates ("NEW", "CRY", "EVE") are scoreboard codes.
//! Lowercased they read as ordinary words, so speech never matches them.

use std::collections::BTreeMap;

use runorder_models::FixtureRoster;
use strsim::jaro_winkler;

use super::strict::StrictMatcher;
use super::text::normalize;
use super::{ordered_names, MatchDiscipline, NormalizedText, TeamMatcher};

/// Words shared by many club names.
const GENERIC_TOKENS: &[&str] = &[
    "fc", "afc", "city", "united", "utd", "town", "county", "athletic", "rovers", "albion",
    "wanderers", "club", "football", "the", "and", "of", "hotspur", "real", "sporting",
];

const MIN_DISTINCTIVE_LEN: usize = 4;
const MIN_SIMILAR_LEN: usize = 5;

/// Multi-word alternates ("man city") and single words of distinctive length
/// can be spoken; shorter codes only appear on graphics.
fn is_spoken_name(name: &str) -> bool {
    name.contains(' ') || name.chars().count() >= MIN_DISTINCTIVE_LEN
}

#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    strict: StrictMatcher,
    /// Distinctive token -> canonical team name
    distinctive: BTreeMap<String, String>,
    threshold: f64,
}

impl FuzzyMatcher {
    pub fn new(roster: &FixtureRoster, threshold: f64) -> Self {
        let mut owners: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for team in &roster.teams {
            for name in team.all_names() {
                for token in normalize(name).split(' ') {
                    if token.chars().count() < MIN_DISTINCTIVE_LEN || GENERIC_TOKENS.contains(&token) {
                        continue;
                    }
                    let entry = owners.entry(token.to_string()).or_default();
                    if !entry.contains(&team.name) {
                        entry.push(team.name.clone());
                    }
                }
            }
        }

        let distinctive = owners
            .into_iter()
            .filter_map(|(token, teams)| match teams.as_slice() {
                [only] => Some((token, only.clone())),
                _ => None,
            })
            .collect();

        Self {
            strict: StrictMatcher::with_names(roster, is_spoken_name),
            distinctive,
            threshold,
        }
    }

    fn token_owner(&self, token: &str) -> Option<&str> {
        if let Some(team) = self.distinctive.get(token) {
            return Some(team);
        }
        if token.chars().count() < MIN_SIMILAR_LEN {
            return None;
        }
        let first = token.chars().next()?;

        // Best similarity wins; BTreeMap order settles exact ties.
        let mut best: Option<(f64, &str)> = None;
        for (candidate, team) in &self.distinctive {
            if candidate.chars().count() < MIN_SIMILAR_LEN || !candidate.starts_with(first) {
                continue;
            }
            let score = jaro_winkler(token, candidate);
            if score >= self.threshold && best.map_or(true, |(b, _)| score > b) {
                best = Some((score, team.as_str()));
            }
        }
        best.map(|(_, team)| team)
    }
}

impl TeamMatcher for FuzzyMatcher {
    fn find_teams(&self, text: &NormalizedText) -> Vec<String> {
        let mut earliest: BTreeMap<String, usize> = BTreeMap::new();

        for (offset, team) in self.strict.hits(text) {
            earliest.insert(team, offset);
        }
        for (offset, token) in text.tokens() {
            if let Some(team) = self.token_owner(token) {
                let slot = earliest.entry(team.to_string()).or_insert(offset);
                *slot = (*slot).min(offset);
            }
        }

        ordered_names(earliest.into_iter().map(|(team, offset)| (offset, team)).collect())
    }

    fn discipline(&self) -> MatchDiscipline {
        MatchDiscipline::Fuzzy
    }
}
