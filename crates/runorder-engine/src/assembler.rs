//! Result assembly.
//!
//! Turns resolved highlights plus start and end decisions into the final
//! [`RunningOrderResult`]: 1-based positions, confidence, provenance and the
//! non-match spans that complete the timeline.

use runorder_models::{
    DetectionSource, EvidenceNote, Match, NonMatchSpan, RunningOrderResult, SpanKind,
};

use crate::boundaries::{EndDecision, StartDecision};
use crate::config::AnalysisConfig;
use crate::consensus::{Consensus, ResolvedMatch};
use crate::logging::EpisodeLogger;

/// Builds the result document for one episode.
pub struct ResultAssembler<'a> {
    config: &'a AnalysisConfig,
    logger: EpisodeLogger,
}

impl<'a> ResultAssembler<'a> {
    pub fn new(config: &'a AnalysisConfig, logger: EpisodeLogger) -> Self {
        Self { config, logger }
    }

    fn build_match(
        &self,
        position: usize,
        resolved: &ResolvedMatch,
        start: &StartDecision,
        end: &EndDecision,
    ) -> Match {
        let mut detection_sources = resolved.detection_sources.clone();
        let mut confidence = resolved.confidence;
        if start.from_transcript {
            detection_sources.insert(DetectionSource::Transcript);
        } else {
            confidence *= self.config.ambiguous_start_penalty;
        }

        Match {
            teams: resolved.teams.clone(),
            position: position as u32 + 1,
            match_start: start.match_start,
            highlights_start: resolved.highlights_start,
            highlights_end: resolved.highlights_end,
            match_end: end.match_end,
            confidence: confidence.clamp(0.0, 1.0),
            detection_sources,
        }
    }

    /// Assemble and check the result.
    pub fn assemble(
        &self,
        episode_duration: f64,
        consensus: Consensus,
        starts: &[StartDecision],
        ends: &[EndDecision],
        notes: Vec<EvidenceNote>,
    ) -> RunningOrderResult {
        let Consensus {
            matches: resolved,
            strategy_results,
            consensus_confidence,
            disagreements,
        } = consensus;

        let matches: Vec<Match> = resolved
            .iter()
            .zip(starts.iter().zip(ends.iter()))
            .enumerate()
            .map(|(i, (m, (start, end)))| self.build_match(i, m, start, end))
            .collect();

        let mut non_match_spans: Vec<NonMatchSpan> = Vec::new();
        if let Some(first) = matches.first() {
            if first.match_start > 0.0 {
                non_match_spans.push(NonMatchSpan {
                    kind: SpanKind::Opening,
                    start: 0.0,
                    end: first.match_start,
                });
            }
        }
        non_match_spans.extend(ends.iter().filter_map(|end| end.span));

        let result = RunningOrderResult {
            episode_id: self.logger.episode_id().to_string(),
            episode_duration,
            matches,
            non_match_spans,
            strategy_results,
            consensus_confidence,
            disagreements,
            notes,
        };
        self.report(&result);
        result
    }

    fn report(&self, result: &RunningOrderResult) {
        for violation in result.check_invariants() {
            self.logger.log_warning(&format!("Invariant violated: {}", violation));
        }
        self.logger.log_completion(&format!(
            "{} matches, {} non-match spans, consensus {:.2}",
            result.matches.len(),
            result.non_match_spans.len(),
            result.consensus_confidence
        ));
    }
}
