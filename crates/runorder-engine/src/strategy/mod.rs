//! Ordering strategies.
//!
//! Each strategy reads one signal from the normalised evidence and produces
//! a candidate running order on its own. The consensus resolver runs them in
//! parallel and cross-validates the results.

mod full_time;
mod scoreboard;

use std::collections::BTreeMap;

use runorder_models::{FixtureKey, MatchCandidate, StrategyKind, StrategyResult};

use crate::config::AnalysisConfig;
use crate::normalizer::{GraphicObservation, NormalizedEvidence};

pub use full_time::FullTimeGraphicStrategy;
pub use scoreboard::ScoreboardStrategy;

/// Core trait for ordering strategies.
pub trait OrderingStrategy: Send + Sync {
    /// Produce a candidate ordering from read-only evidence.
    fn detect(&self, evidence: &NormalizedEvidence, config: &AnalysisConfig) -> StrategyResult;

    fn kind(&self) -> StrategyKind;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// Every strategy the resolver cross-validates, in precision order.
pub fn default_strategies() -> Vec<Box<dyn OrderingStrategy>> {
    vec![
        Box::new(ScoreboardStrategy),
        Box::new(FullTimeGraphicStrategy),
    ]
}

/// Group time-ordered observations by fixture, keeping time order inside
/// each group.
fn group_by_fixture(observations: &[GraphicObservation]) -> BTreeMap<FixtureKey, Vec<&GraphicObservation>> {
    let mut groups: BTreeMap<FixtureKey, Vec<&GraphicObservation>> = BTreeMap::new();
    for observation in observations {
        groups.entry(observation.teams.key()).or_default().push(observation);
    }
    groups
}

/// Sort candidates by anchor time, ties by concatenated team names.
fn sort_candidates(candidates: &mut [MatchCandidate]) {
    candidates.sort_by(|a, b| {
        let a_anchor = a.anchor().unwrap_or(f64::INFINITY);
        let b_anchor = b.anchor().unwrap_or(f64::INFINITY);
        a_anchor
            .total_cmp(&b_anchor)
            .then_with(|| a.teams.sort_label().cmp(&b.teams.sort_label()))
    });
}
