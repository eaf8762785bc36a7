//! Team identities, fixtures and the episode roster.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canonical team name plus accepted alternate spellings and abbreviations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TeamIdentity {
    /// Canonical name (e.g. "Manchester United")
    pub name: String,

    /// Alternate spellings, short names and scoreboard abbreviations
    #[serde(default)]
    pub alternates: Vec<String>,
}

impl TeamIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alternates: Vec::new(),
        }
    }

    /// Add an alternate spelling.
    pub fn with_alternate(mut self, alternate: impl Into<String>) -> Self {
        self.alternates.push(alternate.into());
        self
    }

    /// Canonical name followed by every alternate.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.alternates.iter().map(String::as_str))
    }
}

/// Ordered pair of canonical team names (home first, as shown on screen or
/// listed in the fixture roster).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct TeamPair {
    pub home: String,
    pub away: String,
}

impl TeamPair {
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
        }
    }

    /// Orientation-independent identity of this fixture.
    pub fn key(&self) -> FixtureKey {
        FixtureKey::new(&self.home, &self.away)
    }

    /// True if `team` is one of the two canonical names.
    pub fn contains(&self, team: &str) -> bool {
        self.home == team || self.away == team
    }

    /// The opponent of `team`, if `team` plays in this fixture.
    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        if self.home == team {
            Some(&self.away)
        } else if self.away == team {
            Some(&self.home)
        } else {
            None
        }
    }

    /// Concatenated names used as the deterministic tie-break key.
    pub fn sort_label(&self) -> String {
        format!("{}{}", self.home, self.away)
    }
}

impl fmt::Display for TeamPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v {}", self.home, self.away)
    }
}

/// Orientation-independent fixture identity: the two canonical names in
/// lexical order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct FixtureKey(String, String);

impl FixtureKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self(a.to_string(), b.to_string())
        } else {
            Self(b.to_string(), a.to_string())
        }
    }

    pub fn teams(&self) -> (&str, &str) {
        (&self.0, &self.1)
    }
}

impl fmt::Display for FixtureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, self.1)
    }
}

/// Team-name alternates table and the expected fixture list for one episode.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FixtureRoster {
    /// Every team that may be referenced in the episode
    pub teams: Vec<TeamIdentity>,

    /// Expected fixtures, if the fixture list is known
    #[serde(default)]
    pub fixtures: Vec<TeamPair>,
}

impl FixtureRoster {
    pub fn new(teams: Vec<TeamIdentity>) -> Self {
        Self {
            teams,
            fixtures: Vec::new(),
        }
    }

    pub fn with_fixtures(mut self, fixtures: Vec<TeamPair>) -> Self {
        self.fixtures = fixtures;
        self
    }

    /// Number of expected matches, when the fixture list is known.
    pub fn expected_match_count(&self) -> Option<usize> {
        if self.fixtures.is_empty() {
            None
        } else {
            Some(self.fixtures.len())
        }
    }

    /// Expected fixtures that include `team`.
    pub fn fixtures_for<'a>(&'a self, team: &'a str) -> impl Iterator<Item = &'a TeamPair> + 'a {
        self.fixtures.iter().filter(move |f| f.contains(team))
    }

    /// Roster orientation of a detected pair, when the fixture is listed.
    pub fn fixture_for_key(&self, key: &FixtureKey) -> Option<&TeamPair> {
        self.fixtures.iter().find(|f| &f.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_key_ignores_orientation() {
        let a = TeamPair::new("Arsenal", "Chelsea");
        let b = TeamPair::new("Chelsea", "Arsenal");
        assert_ne!(a, b);
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key().teams(), ("Arsenal", "Chelsea"));
    }

    #[test]
    fn test_opponent_of() {
        let pair = TeamPair::new("Everton", "Fulham");
        assert_eq!(pair.opponent_of("Everton"), Some("Fulham"));
        assert_eq!(pair.opponent_of("Fulham"), Some("Everton"));
        assert_eq!(pair.opponent_of("Spurs"), None);
        assert_eq!(pair.sort_label(), "EvertonFulham");
        assert_eq!(pair.to_string(), "Everton v Fulham");
    }

    #[test]
    fn test_roster_lookup() {
        let roster = FixtureRoster::new(vec![
            TeamIdentity::new("Arsenal").with_alternate("ARS"),
            TeamIdentity::new("Chelsea").with_alternate("CHE"),
        ])
        .with_fixtures(vec![TeamPair::new("Arsenal", "Chelsea")]);

        assert_eq!(roster.expected_match_count(), Some(1));
        assert_eq!(roster.fixtures_for("Chelsea").count(), 1);
        assert!(roster.teams[0].all_names().any(|n| n == "ARS"));
        let key = TeamPair::new("Chelsea", "Arsenal").key();
        assert_eq!(roster.fixture_for_key(&key).unwrap().home, "Arsenal");
        assert_eq!(FixtureRoster::default().expected_match_count(), None);
    }
}
