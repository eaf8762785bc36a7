//! Consensus resolver.
//!
//! Runs every ordering strategy over the same read-only evidence (rayon
//! fork/join), merges their candidates by fixture identity and produces the
//! canonical running order with completed highlights boundaries.
//!
//! Agreement is scored as `1 - d / (N * S)`: `N` expected matches, `S`
//! strategies, `d` the number of fixtures each strategy missed plus the
//! number it placed out of canonical order. A single unaccounted roster
//! fixture is inferred from the transcript; several are reported.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use runorder_models::{
    BoundaryField, DetectionSource, Disagreement, FixtureKey, MatchCandidate, StrategyKind,
    StrategyResult, TeamPair,
};
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::normalizer::NormalizedEvidence;
use crate::strategy::{default_strategies, OrderingStrategy};

/// A fixture with resolved highlights boundaries, ready for start and end
/// detection.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMatch {
    pub teams: TeamPair,
    pub highlights_start: f64,
    pub highlights_end: f64,
    pub detection_sources: BTreeSet<DetectionSource>,
    pub confidence: f64,
}

impl ResolvedMatch {
    pub fn is_inferred(&self) -> bool {
        self.detection_sources.contains(&DetectionSource::Inferred)
    }
}

/// Output of the resolver.
#[derive(Debug, Clone)]
pub struct Consensus {
    pub matches: Vec<ResolvedMatch>,
    pub strategy_results: Vec<StrategyResult>,
    pub consensus_confidence: f64,
    pub disagreements: Vec<Disagreement>,
}

/// Candidate merged across strategies, before boundary completion.
#[derive(Debug, Clone)]
struct MergedCandidate {
    teams: TeamPair,
    highlights_start: Option<f64>,
    highlights_end: Option<f64>,
    detection_sources: BTreeSet<DetectionSource>,
    conflicted: bool,
}

impl MergedCandidate {
    /// True if `self` belongs before `other` on the timeline.
    fn precedes(&self, other: &MergedCandidate) -> bool {
        match (
            self.highlights_start,
            self.highlights_end,
            other.highlights_start,
            other.highlights_end,
        ) {
            (Some(a), _, Some(b), _) => a < b,
            (_, Some(a), _, Some(b)) => a < b,
            (Some(a), None, None, Some(b)) => a < b,
            (None, Some(a), Some(b), None) => a <= b,
            _ => false,
        }
    }

    fn anchor(&self) -> f64 {
        self.highlights_start
            .or(self.highlights_end)
            .unwrap_or(f64::INFINITY)
    }
}

/// Cross-validates ordering strategies.
pub struct ConsensusResolver {
    strategies: Vec<Box<dyn OrderingStrategy>>,
}

impl Default for ConsensusResolver {
    fn default() -> Self {
        Self::new(default_strategies())
    }
}

impl ConsensusResolver {
    pub fn new(strategies: Vec<Box<dyn OrderingStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }

    /// Run every strategy and reconcile their orderings.
    pub fn resolve(&self, evidence: &NormalizedEvidence, config: &AnalysisConfig) -> Consensus {
        let strategy_results: Vec<StrategyResult> = self
            .strategies
            .par_iter()
            .map(|strategy| strategy.detect(evidence, config))
            .collect();

        for result in &strategy_results {
            debug!(
                strategy = result.strategy.as_str(),
                candidates = result.candidates.len(),
                "Strategy result"
            );
        }

        let mut disagreements = Vec::new();
        let merged = merge_candidates(&strategy_results, config, &mut disagreements);

        if merged.is_empty() {
            info!("No fixture detected by any strategy");
            return Consensus {
                matches: Vec::new(),
                strategy_results,
                consensus_confidence: 0.0,
                disagreements,
            };
        }

        let order = canonical_order(&strategy_results, &merged);
        let expected = evidence
            .roster
            .expected_match_count()
            .unwrap_or(0)
            .max(order.len());
        let consensus_confidence =
            score_agreement(&strategy_results, &order, expected, &mut disagreements);

        let candidates: Vec<MergedCandidate> = order
            .iter()
            .filter_map(|key| merged.get(key).cloned())
            .collect();
        let mut matches = complete_boundaries(
            candidates,
            evidence.episode_duration,
            config,
            &mut disagreements,
        );
        for m in &mut matches {
            m.confidence = base_confidence(m, config);
        }

        let missing: Vec<&TeamPair> = evidence
            .roster
            .fixtures
            .iter()
            .filter(|fixture| !merged.contains_key(&fixture.key()))
            .collect();
        match missing.as_slice() {
            [] => {}
            [fixture] => {
                infer_missing(fixture, evidence, config, &mut matches, &mut disagreements);
            }
            several => {
                for fixture in several {
                    disagreements.push(Disagreement::MissingMatch {
                        teams: (*fixture).clone(),
                    });
                }
            }
        }

        info!(
            matches = matches.len(),
            consensus_confidence,
            disagreements = disagreements.len(),
            "Consensus resolved"
        );

        Consensus {
            matches,
            strategy_results,
            consensus_confidence,
            disagreements,
        }
    }
}

/// Merge candidates by fixture identity. A boundary reported by several
/// strategies must agree within tolerance; otherwise the most precise
/// strategy wins and a conflict is recorded.
fn merge_candidates(
    results: &[StrategyResult],
    config: &AnalysisConfig,
    disagreements: &mut Vec<Disagreement>,
) -> BTreeMap<FixtureKey, MergedCandidate> {
    let mut starts: BTreeMap<FixtureKey, Vec<(StrategyKind, f64)>> = BTreeMap::new();
    let mut ends: BTreeMap<FixtureKey, Vec<(StrategyKind, f64)>> = BTreeMap::new();
    let mut merged: BTreeMap<FixtureKey, MergedCandidate> = BTreeMap::new();

    for result in results {
        for candidate in &result.candidates {
            let key = candidate.teams.key();
            let entry = merged.entry(key.clone()).or_insert_with(|| MergedCandidate {
                teams: candidate.teams.clone(),
                highlights_start: None,
                highlights_end: None,
                detection_sources: BTreeSet::new(),
                conflicted: false,
            });
            entry
                .detection_sources
                .extend(candidate.detection_sources.iter().copied());
            if let Some(start) = candidate.highlights_start {
                starts.entry(key.clone()).or_default().push((result.strategy, start));
            }
            if let Some(end) = candidate.highlights_end {
                ends.entry(key).or_default().push((result.strategy, end));
            }
        }
    }

    for (key, entry) in merged.iter_mut() {
        let fields = [
            (BoundaryField::HighlightsStart, starts.remove(key)),
            (BoundaryField::HighlightsEnd, ends.remove(key)),
        ];
        for (field, values) in fields {
            let Some(values) = values else { continue };
            let (value, conflict) = resolve_field(&values, config.boundary_tolerance_secs);
            if conflict {
                entry.conflicted = true;
                disagreements.push(Disagreement::BoundaryConflict {
                    teams: entry.teams.clone(),
                    field,
                    values,
                    resolved: value,
                });
            }
            match field {
                BoundaryField::HighlightsStart => entry.highlights_start = Some(value),
                BoundaryField::HighlightsEnd => entry.highlights_end = Some(value),
            }
        }
    }

    merged
}

/// Resolve one boundary from several strategy values. Returns the value and
/// whether the values disagreed beyond `tolerance`.
fn resolve_field(values: &[(StrategyKind, f64)], tolerance: f64) -> (f64, bool) {
    let min = values.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max = values.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    let best = values
        .iter()
        .max_by(|a, b| {
            a.0.precision_rank()
                .cmp(&b.0.precision_rank())
                .then_with(|| b.1.total_cmp(&a.1))
        })
        .map(|(_, v)| *v)
        .unwrap_or(min);
    (best, max - min > tolerance)
}

/// Canonical ordering: the most complete strategy (ties: more precise), with
/// fixtures only other strategies saw inserted by time.
fn canonical_order(
    results: &[StrategyResult],
    merged: &BTreeMap<FixtureKey, MergedCandidate>,
) -> Vec<FixtureKey> {
    let canonical = results
        .iter()
        .max_by_key(|r| (r.candidates.len(), r.strategy.precision_rank()))
        .map(StrategyResult::ordering)
        .unwrap_or_default();

    let mut order: Vec<FixtureKey> = Vec::with_capacity(merged.len());
    for key in canonical {
        if !order.contains(&key) {
            order.push(key);
        }
    }

    let mut extras: Vec<&MergedCandidate> = merged
        .iter()
        .filter(|(key, _)| !order.contains(key))
        .map(|(_, candidate)| candidate)
        .collect();
    extras.sort_by(|a, b| {
        a.anchor()
            .total_cmp(&b.anchor())
            .then_with(|| a.teams.sort_label().cmp(&b.teams.sort_label()))
    });

    for extra in extras {
        let at = order
            .iter()
            .position(|key| merged.get(key).is_some_and(|placed| extra.precedes(placed)))
            .unwrap_or(order.len());
        debug!(teams = %extra.teams, position = at + 1, "Inserted fixture missing from canonical strategy");
        order.insert(at, extra.teams.key());
    }

    order
}

/// Score agreement and record missing and out-of-order fixtures per strategy.
fn score_agreement(
    results: &[StrategyResult],
    order: &[FixtureKey],
    expected: usize,
    disagreements: &mut Vec<Disagreement>,
) -> f64 {
    let canonical_index: BTreeMap<&FixtureKey, usize> =
        order.iter().enumerate().map(|(i, key)| (key, i)).collect();

    let mut d = 0usize;
    for result in results {
        let ordering = result.ordering();
        let present: BTreeSet<&FixtureKey> = ordering.iter().collect();
        d += expected.saturating_sub(present.len());

        for key in order.iter().filter(|key| !present.contains(key)) {
            if let Some(teams) = teams_for(results, key) {
                disagreements.push(Disagreement::MissingFromStrategy {
                    strategy: result.strategy,
                    teams,
                });
            }
        }

        // Fixtures outside the longest order-preserving subsequence are
        // the ones placed out of order.
        let indices: Vec<usize> = ordering
            .iter()
            .filter_map(|key| canonical_index.get(key).copied())
            .collect();
        let in_order = longest_increasing(&indices);
        for (strategy_pos, canonical_pos) in indices.iter().enumerate() {
            if in_order.contains(&strategy_pos) {
                continue;
            }
            d += 1;
            if let Some(teams) = teams_for(results, &order[*canonical_pos]) {
                disagreements.push(Disagreement::OrderMismatch {
                    strategy: result.strategy,
                    teams,
                    canonical_position: *canonical_pos as u32 + 1,
                    strategy_position: strategy_pos as u32 + 1,
                });
            }
        }
    }

    let total = expected * results.len();
    if total == 0 {
        return 0.0;
    }
    (1.0 - d as f64 / total as f64).clamp(0.0, 1.0)
}

/// Orientation of `key` as first reported by any strategy.
fn teams_for(results: &[StrategyResult], key: &FixtureKey) -> Option<TeamPair> {
    results
        .iter()
        .flat_map(|r| r.candidates.iter())
        .map(|c: &MatchCandidate| &c.teams)
        .find(|teams| &teams.key() == key)
        .cloned()
}

/// Positions (into `values`) of one longest strictly increasing subsequence.
/// Earliest predecessors win so the choice is deterministic.
fn longest_increasing(values: &[usize]) -> BTreeSet<usize> {
    let n = values.len();
    let mut length = vec![1usize; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    for i in 0..n {
        for j in 0..i {
            if values[j] < values[i] && length[j] + 1 > length[i] {
                length[i] = length[j] + 1;
                prev[i] = Some(j);
            }
        }
    }

    let mut best: Option<usize> = None;
    for i in 0..n {
        if best.map_or(true, |b| length[i] > length[b]) {
            best = Some(i);
        }
    }

    let mut kept = BTreeSet::new();
    let mut cursor = best;
    while let Some(i) = cursor {
        kept.insert(i);
        cursor = prev[i];
    }
    kept
}

/// Give every candidate both highlights boundaries, strictly increasing along
/// the running order with room for the studio intro and analysis segments
/// between neighbours.
fn complete_boundaries(
    candidates: Vec<MergedCandidate>,
    duration: f64,
    config: &AnalysisConfig,
    disagreements: &mut Vec<Disagreement>,
) -> Vec<ResolvedMatch> {
    let gap = config.min_boundary_gap_secs;
    let default_len = config.default_highlights_secs;

    // Earliest known time of each candidate bounds the one before it.
    let next_known: Vec<f64> = candidates
        .iter()
        .map(|c| c.highlights_start.or(c.highlights_end).unwrap_or(duration))
        .collect();

    let mut resolved: Vec<ResolvedMatch> = Vec::with_capacity(candidates.len());
    for (i, candidate) in candidates.into_iter().enumerate() {
        let lower = resolved
            .last()
            .map(|prev| prev.highlights_end + 2.0 * gap)
            .unwrap_or(gap);
        let upper = next_known
            .get(i + 1)
            .map(|next| next - 2.0 * gap)
            .unwrap_or(duration - gap);

        // Only estimates are fitted between neighbours; detected overlaps
        // are clamped afterwards and recorded.
        let (start, end) = match (candidate.highlights_start, candidate.highlights_end) {
            (Some(start), Some(end)) => (start, end),
            (Some(start), None) => (start, (start + default_len).min(upper)),
            (None, Some(end)) => ((end - default_len).max(lower), end),
            (None, None) => continue,
        };
        let start = start.max(gap);
        let end = end.min(duration - gap);

        if end - start < gap {
            debug!(teams = %candidate.teams, start, end, "Candidate has no room for highlights");
            disagreements.push(Disagreement::Unplaceable {
                teams: candidate.teams,
                reason: format!(
                    "highlights would span {:.1}s to {:.1}s between neighbours",
                    start, end
                ),
            });
            continue;
        }

        resolved.push(ResolvedMatch {
            teams: candidate.teams,
            highlights_start: start,
            highlights_end: end,
            detection_sources: candidate.detection_sources,
            confidence: if candidate.conflicted {
                config.boundary_conflict_penalty
            } else {
                1.0
            },
        });
    }

    resolve_overlaps(resolved, config, disagreements)
}

/// Clamp highlights that run into the next match's highlights.
fn resolve_overlaps(
    matches: Vec<ResolvedMatch>,
    config: &AnalysisConfig,
    disagreements: &mut Vec<Disagreement>,
) -> Vec<ResolvedMatch> {
    let gap = config.min_boundary_gap_secs;
    let mut out: Vec<ResolvedMatch> = Vec::with_capacity(matches.len());
    let mut iter = matches.into_iter().peekable();

    while let Some(mut current) = iter.next() {
        if let Some(next) = iter.peek() {
            let limit = next.highlights_start - 2.0 * gap;
            if current.highlights_end > limit {
                if current.highlights_end >= next.highlights_start {
                    disagreements.push(Disagreement::BoundaryOverlap {
                        teams: current.teams.clone(),
                        next: next.teams.clone(),
                        highlights_end: current.highlights_end,
                        next_highlights_start: next.highlights_start,
                    });
                }
                current.highlights_end = limit;
            }
        }
        if current.highlights_end - current.highlights_start < gap {
            disagreements.push(Disagreement::Unplaceable {
                teams: current.teams,
                reason: "highlights overlap the next match".to_string(),
            });
            continue;
        }
        out.push(current);
    }

    out
}

fn base_confidence(m: &ResolvedMatch, config: &AnalysisConfig) -> f64 {
    let graphic_sources = m
        .detection_sources
        .iter()
        .filter(|s| s.is_graphic())
        .count();
    let base = if graphic_sources >= 2 {
        1.0
    } else {
        config.single_source_confidence
    };
    // The merge step seeds `confidence` with the conflict factor.
    base * m.confidence
}

/// Highlights for an inferred match opened at `anchor`, inside the gap
/// between highlights ending at `lower` and the next starting at `upper`.
fn fit_inferred(anchor: f64, lower: f64, upper: f64, config: &AnalysisConfig) -> Option<(f64, f64)> {
    let gap = config.min_boundary_gap_secs;
    let start = (anchor + config.default_studio_intro_secs).max(lower + 2.0 * gap);
    let end = (start + config.default_highlights_secs)
        .min(upper - config.default_post_match_secs.max(2.0 * gap));
    (end - start >= gap).then_some((start, end))
}

/// Place a single unaccounted fixture.
///
/// A transcript mention places it only inside a gap between two detected
/// matches that can hold it. Mentions before the first match are opening
/// headlines and are ignored. Otherwise the fixture is appended after the
/// last match.
fn infer_missing(
    fixture: &TeamPair,
    evidence: &NormalizedEvidence,
    config: &AnalysisConfig,
    matches: &mut Vec<ResolvedMatch>,
    disagreements: &mut Vec<Disagreement>,
) {
    let duration = evidence.episode_duration;
    let mentions: Vec<f64> = evidence
        .transcript
        .iter()
        .filter(|segment| segment.mentions_any(fixture))
        .map(|segment| segment.start)
        .collect();

    let between = matches.windows(2).enumerate().find_map(|(i, pair)| {
        let (lower, upper) = (pair[0].highlights_end, pair[1].highlights_start);
        mentions
            .iter()
            .filter(|&&t| t > lower && t < upper)
            .find_map(|&t| fit_inferred(t, lower, upper, config))
            .map(|bounds| (i + 1, bounds, true))
    });

    let appended = || {
        let lower = matches.last().map_or(0.0, |m| m.highlights_end);
        let trailing_mention = mentions.iter().copied().find(|&t| t > lower);
        trailing_mention
            .and_then(|t| fit_inferred(t, lower, duration, config))
            .map(|bounds| (matches.len(), bounds, true))
            .or_else(|| {
                fit_inferred(lower + config.default_post_match_secs, lower, duration, config)
                    .map(|bounds| (matches.len(), bounds, false))
            })
    };

    let Some((index, (start, end), placed_by_transcript)) = between.or_else(appended) else {
        let lower = matches.last().map_or(0.0, |m| m.highlights_end);
        info!(teams = %fixture, "Missing fixture has no room to be inferred");
        disagreements.push(Disagreement::Unplaceable {
            teams: fixture.clone(),
            reason: format!(
                "no room for an inferred match between {:.1}s and {:.1}s",
                lower, duration
            ),
        });
        return;
    };

    info!(
        teams = %fixture,
        position = index + 1,
        placed_by_transcript,
        "Inferred missing fixture"
    );
    matches.insert(
        index,
        ResolvedMatch {
            teams: fixture.clone(),
            highlights_start: start,
            highlights_end: end,
            detection_sources: BTreeSet::from([DetectionSource::Inferred]),
            confidence: config.inferred_confidence,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::{GraphicObservation, TranscriptObservation};
    use runorder_models::{FixtureRoster, TeamIdentity};

    fn graphic(timestamp: f64, home: &str, away: &str) -> GraphicObservation {
        GraphicObservation {
            timestamp,
            teams: TeamPair::new(home, away),
            confidence: 1.0,
        }
    }

    fn evidence(scoreboards: Vec<GraphicObservation>, full_time: Vec<GraphicObservation>) -> NormalizedEvidence {
        NormalizedEvidence {
            episode_duration: 3000.0,
            scoreboards,
            full_time,
            ..Default::default()
        }
    }

    fn resolve(evidence: &NormalizedEvidence) -> Consensus {
        ConsensusResolver::default().resolve(evidence, &AnalysisConfig::default())
    }

    #[test]
    fn test_full_agreement_scores_one() {
        let evidence = evidence(
            vec![graphic(50.0, "A", "B"), graphic(600.0, "C", "D")],
            vec![graphic(560.0, "A", "B"), graphic(900.0, "C", "D")],
        );
        let consensus = resolve(&evidence);

        assert_eq!(consensus.consensus_confidence, 1.0);
        assert!(consensus.disagreements.is_empty());
        assert_eq!(consensus.strategy_results.len(), 2);
        assert_eq!(consensus.matches.len(), 2);
        assert_eq!(consensus.matches[0].highlights_start, 50.0);
        assert_eq!(consensus.matches[0].highlights_end, 560.0);
        assert_eq!(consensus.matches[1].highlights_end, 900.0);
        assert_eq!(consensus.matches[0].confidence, 1.0);
    }

    #[test]
    fn test_no_detections_gives_zero_confidence() {
        let consensus = resolve(&evidence(vec![], vec![]));
        assert!(consensus.matches.is_empty());
        assert_eq!(consensus.consensus_confidence, 0.0);
    }

    #[test]
    fn test_missing_from_one_strategy() {
        let evidence = evidence(
            vec![graphic(50.0, "A", "B"), graphic(600.0, "C", "D")],
            vec![graphic(560.0, "A", "B")],
        );
        let consensus = resolve(&evidence);

        // d = 1 (C v D missing from full-time), N = 2, S = 2
        assert!((consensus.consensus_confidence - 0.75).abs() < 1e-9);
        assert!(consensus.disagreements.iter().any(|d| matches!(
            d,
            Disagreement::MissingFromStrategy { strategy: StrategyKind::FullTimeGraphicOrder, .. }
        )));
        // C v D completed with default highlights
        assert_eq!(consensus.matches[1].highlights_start, 600.0);
        assert_eq!(consensus.matches[1].highlights_end, 1080.0);
        assert_eq!(consensus.matches[1].confidence, 0.75);
    }

    #[test]
    fn test_extra_fixture_inserted_by_time() {
        // Equally complete: full-time order is canonical, C v D comes from
        // the scoreboard only
        let evidence = evidence(
            vec![graphic(50.0, "A", "B"), graphic(600.0, "C", "D")],
            vec![graphic(560.0, "A", "B"), graphic(1700.0, "E", "F")],
        );
        let consensus = resolve(&evidence);
        let order: Vec<&str> = consensus.matches.iter().map(|m| m.teams.home.as_str()).collect();
        assert_eq!(order, vec!["A", "C", "E"]);
        assert_eq!(consensus.matches[1].highlights_start, 600.0);
        assert_eq!(consensus.matches[1].highlights_end, 1080.0);
        assert_eq!(consensus.matches[2].highlights_start, 1220.0);
    }

    #[test]
    fn test_estimated_start_stays_after_previous_highlights() {
        let evidence = evidence(
            vec![graphic(50.0, "A", "B")],
            vec![graphic(560.0, "A", "B"), graphic(900.0, "C", "D")],
        );
        let consensus = resolve(&evidence);
        assert_eq!(consensus.matches[1].highlights_start, 562.0);
        assert_eq!(consensus.matches[1].highlights_end, 900.0);
    }

    #[test]
    fn test_out_of_order_strategy_is_recorded() {
        let mut strategy_a = StrategyResult::new(StrategyKind::ScoreboardOrder, vec![]);
        let mut strategy_b = StrategyResult::new(StrategyKind::FullTimeGraphicOrder, vec![]);
        for (home, t) in [("A", 10.0), ("C", 20.0), ("E", 30.0)] {
            let mut c = MatchCandidate::new(TeamPair::new(home, "X"), DetectionSource::Scoreboard);
            c.highlights_start = Some(t);
            strategy_a.candidates.push(c);
        }
        for home in ["C", "A", "E"] {
            let c = MatchCandidate::new(TeamPair::new(home, "X"), DetectionSource::FullTimeGraphic);
            strategy_b.candidates.push(c);
        }
        let order = canonical_order(
            &[strategy_a.clone(), strategy_b.clone()],
            &merge_candidates(&[strategy_a.clone(), strategy_b.clone()], &AnalysisConfig::default(), &mut Vec::new()),
        );
        assert_eq!(order, strategy_b.ordering());

        let mut disagreements = Vec::new();
        let score = score_agreement(&[strategy_a, strategy_b], &order, 3, &mut disagreements);
        assert!((score - (1.0 - 1.0 / 6.0)).abs() < 1e-9);
        assert_eq!(disagreements.len(), 1);
        assert!(matches!(
            disagreements[0],
            Disagreement::OrderMismatch { strategy: StrategyKind::ScoreboardOrder, .. }
        ));
    }

    #[test]
    fn test_conflicting_boundary_prefers_full_time() {
        let values = vec![
            (StrategyKind::ScoreboardOrder, 500.0),
            (StrategyKind::FullTimeGraphicOrder, 520.0),
        ];
        assert_eq!(resolve_field(&values, 5.0), (520.0, true));
        assert_eq!(resolve_field(&values, 30.0), (520.0, false));
    }

    #[test]
    fn test_overlap_is_clamped_and_recorded() {
        let evidence = evidence(
            vec![graphic(50.0, "A", "B"), graphic(500.0, "C", "D")],
            vec![graphic(560.0, "A", "B"), graphic(900.0, "C", "D")],
        );
        let consensus = resolve(&evidence);
        assert!(consensus
            .disagreements
            .iter()
            .any(|d| matches!(d, Disagreement::BoundaryOverlap { .. })));
        assert_eq!(consensus.matches[0].highlights_end, 498.0);
    }

    #[test]
    fn test_several_missing_fixtures_reported() {
        let mut evidence = evidence(vec![graphic(50.0, "A", "B")], vec![graphic(560.0, "A", "B")]);
        evidence.roster = FixtureRoster::new(vec![TeamIdentity::new("A")]).with_fixtures(vec![
            TeamPair::new("A", "B"),
            TeamPair::new("C", "D"),
            TeamPair::new("E", "F"),
        ]);
        let consensus = resolve(&evidence);
        let missing = consensus
            .disagreements
            .iter()
            .filter(|d| matches!(d, Disagreement::MissingMatch { .. }))
            .count();
        assert_eq!(missing, 2);
        assert_eq!(consensus.matches.len(), 1);
    }

    #[test]
    fn test_single_missing_fixture_appended() {
        let mut evidence = evidence(vec![graphic(50.0, "A", "B")], vec![graphic(560.0, "A", "B")]);
        evidence.roster = FixtureRoster::new(vec![TeamIdentity::new("A")])
            .with_fixtures(vec![TeamPair::new("A", "B"), TeamPair::new("C", "D")]);
        let consensus = resolve(&evidence);

        assert_eq!(consensus.matches.len(), 2);
        let inferred = &consensus.matches[1];
        assert!(inferred.is_inferred());
        assert_eq!(inferred.confidence, 0.3);
        assert_eq!(inferred.highlights_start, 560.0 + 120.0 + 30.0);
    }

    fn mention(start: f64, team: &str) -> TranscriptObservation {
        TranscriptObservation {
            start,
            end: start + 5.0,
            text: team.to_string(),
            sentences: Vec::new(),
            mentions: BTreeSet::from([team.to_string()]),
        }
    }

    fn with_missing_e_v_f(mut evidence: NormalizedEvidence, transcript: Vec<TranscriptObservation>) -> NormalizedEvidence {
        evidence.roster = FixtureRoster::new(vec![TeamIdentity::new("A")]).with_fixtures(vec![
            TeamPair::new("A", "B"),
            TeamPair::new("C", "D"),
            TeamPair::new("E", "F"),
        ]);
        evidence.transcript = transcript;
        evidence
    }

    fn position_of(consensus: &Consensus, home: &str) -> Option<usize> {
        consensus.matches.iter().position(|m| m.teams.home == home)
    }

    #[test]
    fn test_opening_headline_does_not_place_missing_fixture() {
        // First highlights start right after the headlines: no room before
        let evidence = with_missing_e_v_f(
            evidence(
                vec![graphic(50.0, "A", "B"), graphic(600.0, "C", "D")],
                vec![graphic(560.0, "A", "B"), graphic(1000.0, "C", "D")],
            ),
            vec![mention(5.0, "E")],
        );
        let consensus = resolve(&evidence);

        assert_eq!(position_of(&consensus, "E"), Some(2));
        assert_eq!(consensus.matches[2].highlights_start, 1000.0 + 120.0 + 30.0);
        assert!(!consensus
            .disagreements
            .iter()
            .any(|d| matches!(d, Disagreement::Unplaceable { .. })));
    }

    #[test]
    fn test_opening_headline_never_puts_missing_fixture_first() {
        let evidence = with_missing_e_v_f(
            evidence(
                vec![graphic(800.0, "A", "B"), graphic(1300.0, "C", "D")],
                vec![graphic(1200.0, "A", "B"), graphic(1700.0, "C", "D")],
            ),
            vec![mention(10.0, "E")],
        );
        let consensus = resolve(&evidence);

        let order: Vec<&str> = consensus.matches.iter().map(|m| m.teams.home.as_str()).collect();
        assert_eq!(order, vec!["A", "C", "E"]);
        assert_eq!(consensus.matches[2].highlights_start, 1850.0);
    }

    #[test]
    fn test_mention_between_matches_places_missing_fixture() {
        let evidence = with_missing_e_v_f(
            evidence(
                vec![graphic(50.0, "A", "B"), graphic(1500.0, "C", "D")],
                vec![graphic(560.0, "A", "B"), graphic(2000.0, "C", "D")],
            ),
            vec![mention(10.0, "E"), mention(700.0, "F")],
        );
        let consensus = resolve(&evidence);

        assert_eq!(position_of(&consensus, "E"), Some(1));
        let inferred = &consensus.matches[1];
        assert!(inferred.is_inferred());
        assert_eq!(inferred.highlights_start, 730.0);
        assert_eq!(inferred.highlights_end, 1210.0);
    }

    #[test]
    fn test_mention_in_tight_gap_falls_back_to_append() {
        let evidence = with_missing_e_v_f(
            evidence(
                vec![graphic(50.0, "A", "B"), graphic(600.0, "C", "D")],
                vec![graphic(560.0, "A", "B"), graphic(1000.0, "C", "D")],
            ),
            vec![mention(580.0, "E")],
        );
        let consensus = resolve(&evidence);

        assert_eq!(position_of(&consensus, "E"), Some(2));
        assert_eq!(consensus.matches[2].highlights_start, 1150.0);
    }

    #[test]
    fn test_longest_increasing_subsequence() {
        assert_eq!(longest_increasing(&[1, 0, 2]), BTreeSet::from([0, 2]));
        assert_eq!(longest_increasing(&[0, 1, 2]).len(), 3);
        assert!(longest_increasing(&[]).is_empty());
    }
}
