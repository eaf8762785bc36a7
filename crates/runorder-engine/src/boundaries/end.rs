//! Match-end detection.
//!
//! By default a match ends where the next one starts, and the last match
//! ends with the episode. Two non-match hypotheses can override that:
//!
//! - **Interlude** (any match but the last): a secondary-programme teaser
//!   after the highlights. Needs a day/programme keyword co-occurrence and
//!   no further mention of the current teams before the next match starts.
//! - **Table review** (last match): a league-table discussion. Needs a
//!   table keyword with a modifier and enough mentions of other teams
//!   before the episode ends.
//!
//! A keyword alone never moves a boundary.

use runorder_models::{NonMatchSpan, SpanKind};
use tracing::{debug, info};

use super::keywords::CoOccurrence;
use crate::config::{AnalysisConfig, InterludeValidation};
use crate::consensus::ResolvedMatch;
use crate::metrics;
use crate::normalizer::NormalizedEvidence;

/// Where a match ends, plus the non-match span that follows it, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndDecision {
    pub match_end: f64,
    pub span: Option<NonMatchSpan>,
}

impl EndDecision {
    fn naive(match_end: f64) -> Self {
        Self {
            match_end,
            span: None,
        }
    }
}

pub struct MatchEndDetector<'a> {
    evidence: &'a NormalizedEvidence,
    config: &'a AnalysisConfig,
    interlude: CoOccurrence,
    table: CoOccurrence,
}

impl<'a> MatchEndDetector<'a> {
    pub fn new(evidence: &'a NormalizedEvidence, config: &'a AnalysisConfig) -> Self {
        let lexicon = &config.lexicon;
        Self {
            evidence,
            config,
            interlude: CoOccurrence::new(&lexicon.secondary_programme, &lexicon.programme_names),
            table: CoOccurrence::new(&lexicon.table_keywords, &lexicon.table_modifiers),
        }
    }

    /// Decide the end of every match. `starts[i]` is the start of
    /// `matches[i]`.
    pub fn detect_all(&self, matches: &[ResolvedMatch], starts: &[f64]) -> Vec<EndDecision> {
        matches
            .iter()
            .enumerate()
            .map(|(i, m)| match starts.get(i + 1) {
                Some(&next_start) => self.detect_interlude(m, next_start),
                None => self.detect_table_review(m),
            })
            .collect()
    }

    /// End of a match followed by another starting at `next_start`.
    pub fn detect_interlude(&self, m: &ResolvedMatch, next_start: f64) -> EndDecision {
        let window = self.evidence.sentences_between(m.highlights_end, next_start);

        let Some(keyword) = self.interlude.find(&window) else {
            return EndDecision::naive(next_start);
        };

        let team_mentions = window
            .iter()
            .filter(|s| s.start >= keyword && s.mentions_any(&m.teams))
            .count();
        let graphics = match self.config.interlude_validation {
            InterludeValidation::TeamAbsence => 0,
            InterludeValidation::TeamAndGraphicAbsence => {
                self.evidence.graphics_for(&m.teams.key(), keyword, next_start)
            }
        };

        let accepted = team_mentions == 0 && graphics == 0;
        metrics::record_non_match_decision("interlude", accepted);
        if !accepted {
            debug!(
                teams = %m.teams,
                keyword_at = keyword,
                team_mentions,
                graphics,
                "Interlude keyword rejected"
            );
            return EndDecision::naive(next_start);
        }

        info!(teams = %m.teams, match_end = keyword, "Interlude detected");
        EndDecision {
            match_end: keyword,
            span: Some(NonMatchSpan {
                kind: SpanKind::Interlude,
                start: keyword,
                end: next_start,
            }),
        }
    }

    /// End of the last match of the episode.
    pub fn detect_table_review(&self, last: &ResolvedMatch) -> EndDecision {
        let duration = self.evidence.episode_duration;
        let window = self.evidence.sentences_between(last.highlights_end, duration);

        let Some(keyword) = self.table.find(&window) else {
            return EndDecision::naive(duration);
        };

        let other_mentions: usize = window
            .iter()
            .filter(|s| s.start >= keyword)
            .map(|s| s.mentions.iter().filter(|team| !last.teams.contains(team)).count())
            .sum();

        let accepted = other_mentions >= self.config.table_min_other_team_mentions;
        metrics::record_non_match_decision("table_review", accepted);
        if !accepted {
            debug!(
                teams = %last.teams,
                keyword_at = keyword,
                other_mentions,
                "Table keyword rejected"
            );
            return EndDecision::naive(duration);
        }

        info!(teams = %last.teams, match_end = keyword, "Table review detected");
        EndDecision {
            match_end: keyword,
            span: Some(NonMatchSpan {
                kind: SpanKind::TableReview,
                start: keyword,
                end: duration,
            }),
        }
    }
}
