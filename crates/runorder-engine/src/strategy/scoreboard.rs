//! Scoreboard-order strategy.
//!
//! The live score bug appears once highlights footage begins, so the first
//! scoreboard of a fixture marks its `highlights_start`.

use runorder_models::{DetectionSource, MatchCandidate, StrategyKind, StrategyResult};
use tracing::debug;

use super::{group_by_fixture, sort_candidates, OrderingStrategy};
use crate::config::AnalysisConfig;
use crate::normalizer::NormalizedEvidence;

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreboardStrategy;

impl OrderingStrategy for ScoreboardStrategy {
    fn detect(&self, evidence: &NormalizedEvidence, _config: &AnalysisConfig) -> StrategyResult {
        let mut candidates: Vec<MatchCandidate> = group_by_fixture(&evidence.scoreboards)
            .into_values()
            .filter_map(|observations| {
                let first = observations.first()?;
                let mut candidate = MatchCandidate::new(first.teams.clone(), DetectionSource::Scoreboard);
                candidate.highlights_start = Some(first.timestamp);
                candidate.evidence_count = observations.len() as u32;
                Some(candidate)
            })
            .collect();

        sort_candidates(&mut candidates);
        debug!(strategy = self.name(), candidates = candidates.len(), "Strategy finished");
        StrategyResult::new(self.kind(), candidates)
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::ScoreboardOrder
    }
}
