//! Shared fixtures for integration tests.

#![allow(dead_code)]

use runorder_models::{EpisodeEvidence, FixtureRoster, RegionKind, TeamIdentity, TeamPair};

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("runorder_engine=debug")
        .with_test_writer()
        .try_init();
}

/// (canonical name, scoreboard abbreviation)
pub const TEAMS: &[(&str, &str)] = &[
    ("Arsenal", "ARS"),
    ("Chelsea", "CHE"),
    ("Everton", "EVE"),
    ("Fulham", "FUL"),
    ("Liverpool", "LIV"),
    ("Brentford", "BRE"),
    ("Wolverhampton Wanderers", "WOL"),
    ("Burnley", "BUR"),
    ("Brighton", "BHA"),
    ("Luton Town", "LUT"),
    ("Newcastle", "NEW"),
    ("Sheffield United", "SHU"),
    ("Bournemouth", "BOU"),
    ("Nottingham Forest", "NFO"),
    ("Tottenham Hotspur", "Spurs"),
];

pub fn abbreviation(team: &str) -> &'static str {
    TEAMS
        .iter()
        .find(|(name, _)| *name == team)
        .map(|(_, abbr)| *abbr)
        .unwrap_or("???")
}

pub fn roster(fixtures: &[(&str, &str)]) -> FixtureRoster {
    FixtureRoster::new(
        TEAMS
            .iter()
            .map(|(name, abbr)| TeamIdentity::new(*name).with_alternate(*abbr))
            .collect(),
    )
    .with_fixtures(
        fixtures
            .iter()
            .map(|(home, away)| TeamPair::new(*home, *away))
            .collect(),
    )
}

/// Add a scoreboard at `start` and a full-time graphic at `end`.
pub fn with_graphics(evidence: EpisodeEvidence, home: &str, away: &str, start: f64, end: f64) -> EpisodeEvidence {
    let (h, a) = (abbreviation(home), abbreviation(away));
    evidence
        .with_ocr(start, RegionKind::Scoreboard, format!("{} 0-0 {}", h, a))
        .with_ocr(start + 240.0_f64.min((end - start) / 2.0), RegionKind::Scoreboard, format!("{} 1-0 {} 62'", h, a))
        .with_ocr(end, RegionKind::FullTimeGraphic, format!("FT {} 1-0 {}", home, away))
        .with_ocr(end + 4.0, RegionKind::FullTimeGraphic, format!("FULL TIME {} 1 {} 0", h, a))
}
