//! Full-time-graphic-order strategy.
//!
//! The full-time result graphic closes a fixture's highlights. Graphics of
//! the same fixture shown within the de-duplication window are one
//! occurrence; when a fixture's result is shown again later (a results
//! round-up) the earliest occurrence wins.

use runorder_models::{DetectionSource, MatchCandidate, StrategyKind, StrategyResult};
use tracing::debug;

use super::{group_by_fixture, sort_candidates, OrderingStrategy};
use crate::config::AnalysisConfig;
use crate::normalizer::{GraphicObservation, NormalizedEvidence};

#[derive(Debug, Clone, Copy, Default)]
pub struct FullTimeGraphicStrategy;

/// Split time-ordered observations into occurrences. A new occurrence starts
/// when the gap to the previous graphic exceeds `window`.
fn occurrences<'a>(observations: &[&'a GraphicObservation], window: f64) -> Vec<Vec<&'a GraphicObservation>> {
    let mut clusters: Vec<Vec<&GraphicObservation>> = Vec::new();
    for &observation in observations {
        let joins_previous = clusters
            .last()
            .and_then(|cluster| cluster.last())
            .is_some_and(|prev| observation.timestamp - prev.timestamp <= window);
        if joins_previous {
            if let Some(cluster) = clusters.last_mut() {
                cluster.push(observation);
                continue;
            }
        }
        clusters.push(vec![observation]);
    }
    clusters
}

impl OrderingStrategy for FullTimeGraphicStrategy {
    fn detect(&self, evidence: &NormalizedEvidence, config: &AnalysisConfig) -> StrategyResult {
        let mut candidates: Vec<MatchCandidate> = group_by_fixture(&evidence.full_time)
            .into_values()
            .filter_map(|observations| {
                let clusters = occurrences(&observations, config.ft_dedup_window_secs);
                let earliest = clusters.first()?;
                let first = earliest.first()?;
                if clusters.len() > 1 {
                    debug!(
                        teams = %first.teams,
                        occurrences = clusters.len(),
                        kept = first.timestamp,
                        "Repeated full-time graphic, keeping earliest"
                    );
                }

                let mut candidate =
                    MatchCandidate::new(first.teams.clone(), DetectionSource::FullTimeGraphic);
                candidate.highlights_end = Some(first.timestamp);
                candidate.evidence_count = earliest.len() as u32;
                Some(candidate)
            })
            .collect();

        sort_candidates(&mut candidates);
        debug!(strategy = self.name(), candidates = candidates.len(), "Strategy finished");
        StrategyResult::new(self.kind(), candidates)
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::FullTimeGraphicOrder
    }
}
