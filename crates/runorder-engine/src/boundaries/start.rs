//! Match-start detection.
//!
//! The studio intro is found by scanning the transcript backward from
//! `highlights_start`: the most recent segment that mentions either team
//! opens the match. The scan never reaches further back than the look-back
//! window or into the previous match's highlights.

use tracing::debug;

use crate::config::AnalysisConfig;
use crate::consensus::ResolvedMatch;
use crate::metrics;
use crate::normalizer::NormalizedEvidence;

/// Where a match starts and how that was decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartDecision {
    pub match_start: f64,
    /// True if a transcript segment placed the start; false for the default
    /// intro length.
    pub from_transcript: bool,
}

pub struct MatchStartDetector<'a> {
    evidence: &'a NormalizedEvidence,
    config: &'a AnalysisConfig,
}

impl<'a> MatchStartDetector<'a> {
    pub fn new(evidence: &'a NormalizedEvidence, config: &'a AnalysisConfig) -> Self {
        Self { evidence, config }
    }

    /// Earliest admissible start for `m`.
    fn lower_bound(&self, m: &ResolvedMatch, previous_highlights_end: Option<f64>) -> f64 {
        let lookback = m.highlights_start - self.config.max_intro_lookback_secs;
        match previous_highlights_end {
            Some(end) => lookback.max(end + self.config.min_boundary_gap_secs),
            None => lookback.max(0.0),
        }
    }

    /// Detect the start of `m`. `previous_highlights_end` is the highlights
    /// end of the match before it in the running order.
    pub fn detect(&self, m: &ResolvedMatch, previous_highlights_end: Option<f64>) -> StartDecision {
        let lower = self.lower_bound(m, previous_highlights_end);
        let fallback = (m.highlights_start - self.config.default_studio_intro_secs).max(lower);

        let found = self
            .evidence
            .transcript
            .iter()
            .rev()
            .filter(|segment| segment.start >= lower && segment.start < m.highlights_start)
            .find(|segment| segment.mentions_any(&m.teams))
            .map(|segment| segment.start);

        match found {
            Some(start) if start < m.highlights_start => {
                debug!(teams = %m.teams, match_start = start, "Studio intro found in transcript");
                StartDecision {
                    match_start: start,
                    from_transcript: true,
                }
            }
            _ => {
                metrics::record_start_fallback();
                debug!(
                    teams = %m.teams,
                    match_start = fallback,
                    "No intro mention, using default intro length"
                );
                StartDecision {
                    match_start: fallback,
                    from_transcript: false,
                }
            }
        }
    }

    /// Detect starts for a whole running order.
    pub fn detect_all(&self, matches: &[ResolvedMatch]) -> Vec<StartDecision> {
        matches
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let previous = i.checked_sub(1).map(|p| matches[p].highlights_end);
                self.detect(m, previous)
            })
            .collect()
    }
}
