//! Strict matcher: canonical names and listed alternates only.

use runorder_models::FixtureRoster;

use super::text::normalize;
use super::{ordered_names, MatchDiscipline, NormalizedText, TeamMatcher};

/// Whole-word match against canonical names and roster alternates.
#[derive(Debug, Clone)]
pub struct StrictMatcher {
    /// (canonical name, normalised names)
    teams: Vec<(String, Vec<String>)>,
}

impl StrictMatcher {
    pub fn new(roster: &FixtureRoster) -> Self {
        Self::with_names(roster, |_| true)
    }

    /// Matcher over the normalised names of each team accepted by `keep`.
    /// The canonical name is always kept.
    pub(crate) fn with_names(roster: &FixtureRoster, keep: impl Fn(&str) -> bool) -> Self {
        let teams = roster
            .teams
            .iter()
            .map(|team| {
                let canonical = normalize(&team.name);
                let mut names: Vec<String> = team
                    .all_names()
                    .map(normalize)
                    .filter(|n| !n.is_empty() && (*n == canonical || keep(n.as_str())))
                    .collect();
                names.sort();
                names.dedup();
                (team.name.clone(), names)
            })
            .collect();
        Self { teams }
    }

    /// Offset of the earliest strict hit for each matched team.
    pub(crate) fn hits(&self, text: &NormalizedText) -> Vec<(usize, String)> {
        self.teams
            .iter()
            .filter_map(|(canonical, names)| {
                names
                    .iter()
                    .filter_map(|name| text.find_phrase(name))
                    .min()
                    .map(|offset| (offset, canonical.clone()))
            })
            .collect()
    }
}

impl TeamMatcher for StrictMatcher {
    fn find_teams(&self, text: &NormalizedText) -> Vec<String> {
        ordered_names(self.hits(text))
    }

    fn discipline(&self) -> MatchDiscipline {
        MatchDiscipline::Strict
    }
}
