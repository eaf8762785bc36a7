//! Evidence normalisation.
//!
//! Resolves every detection event's free text to canonical team names and
//! splits the events into time-ordered per-kind series. Graphic events use
//! the strict matcher, transcript segments the fuzzy one. Nothing is mutated;
//! every kept event becomes a derived observation and every dropped or
//! adjusted event leaves an [`EvidenceNote`].

use std::collections::BTreeSet;

use runorder_models::{
    DetectionEvent, EpisodeEvidence, EventKind, EvidenceNote, FixtureKey, FixtureRoster,
    NoteReason, TeamPair, TranscriptWord,
};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::matching::{FuzzyMatcher, NormalizedText, StrictMatcher, TeamMatcher};
use crate::metrics;

/// A scoreboard or full-time graphic resolved to a fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicObservation {
    pub timestamp: f64,
    pub teams: TeamPair,
    pub confidence: f64,
}

/// One sentence of a transcript segment.
#[derive(Debug, Clone)]
pub struct Sentence {
    pub start: f64,
    pub end: f64,
    pub text: NormalizedText,
    /// Canonical names mentioned (fuzzy)
    pub mentions: BTreeSet<String>,
}

impl Sentence {
    pub fn mentions_any(&self, teams: &TeamPair) -> bool {
        self.mentions.contains(&teams.home) || self.mentions.contains(&teams.away)
    }
}

/// A transcript segment with its sentences and team mentions.
#[derive(Debug, Clone)]
pub struct TranscriptObservation {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub sentences: Vec<Sentence>,
    /// Union of sentence mentions
    pub mentions: BTreeSet<String>,
}

impl TranscriptObservation {
    pub fn mentions_any(&self, teams: &TeamPair) -> bool {
        self.mentions.contains(&teams.home) || self.mentions.contains(&teams.away)
    }
}

/// Per-kind, time-ordered evidence for one episode.
#[derive(Debug, Clone, Default)]
pub struct NormalizedEvidence {
    pub episode_duration: f64,
    pub roster: FixtureRoster,
    pub scoreboards: Vec<GraphicObservation>,
    pub full_time: Vec<GraphicObservation>,
    pub transcript: Vec<TranscriptObservation>,
    pub notes: Vec<EvidenceNote>,
}

impl NormalizedEvidence {
    /// True if no graphic identified any fixture.
    pub fn has_no_graphics(&self) -> bool {
        self.scoreboards.is_empty() && self.full_time.is_empty()
    }

    /// Every sentence of the transcript in time order.
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.transcript.iter().flat_map(|segment| segment.sentences.iter())
    }

    /// Sentences starting strictly after `after` and before `before`.
    pub fn sentences_between(&self, after: f64, before: f64) -> Vec<&Sentence> {
        self.sentences()
            .filter(|s| s.start > after && s.start < before)
            .collect()
    }

    /// Graphics of either kind for `key` with a timestamp inside `[from, to)`.
    pub fn graphics_for(&self, key: &FixtureKey, from: f64, to: f64) -> usize {
        self.scoreboards
            .iter()
            .chain(self.full_time.iter())
            .filter(|g| &g.teams.key() == key && g.timestamp >= from && g.timestamp < to)
            .count()
    }
}

/// Resolves raw detection events against the episode roster.
pub struct EvidenceNormalizer<'a> {
    roster: &'a FixtureRoster,
    strict: StrictMatcher,
    fuzzy: FuzzyMatcher,
    min_confidence: f64,
}

impl<'a> EvidenceNormalizer<'a> {
    pub fn new(roster: &'a FixtureRoster, config: &AnalysisConfig) -> Self {
        Self {
            roster,
            strict: StrictMatcher::new(roster),
            fuzzy: FuzzyMatcher::new(roster, config.fuzzy_similarity_threshold),
            min_confidence: config.min_recognition_confidence,
        }
    }

    /// Normalise every event of `evidence`.
    pub fn normalize(&self, evidence: &EpisodeEvidence) -> NormalizedEvidence {
        let duration = evidence.episode_duration;
        let mut out = NormalizedEvidence {
            episode_duration: duration,
            roster: self.roster.clone(),
            ..Default::default()
        };

        for event in evidence.detection_events() {
            if !event.timestamp.is_finite() || event.timestamp < 0.0 || event.timestamp >= duration {
                push_note(&mut out.notes, &event, NoteReason::OutOfRange);
                continue;
            }

            match event.kind {
                EventKind::Scoreboard | EventKind::FullTimeGraphic => {
                    if event.recognition_confidence < self.min_confidence {
                        let reason = NoteReason::LowConfidence {
                            confidence: event.recognition_confidence,
                        };
                        push_note(&mut out.notes, &event, reason);
                        continue;
                    }
                    if let Some(observation) = self.resolve_graphic(&event, &mut out.notes) {
                        if event.kind == EventKind::Scoreboard {
                            out.scoreboards.push(observation);
                        } else {
                            out.full_time.push(observation);
                        }
                    }
                }
                EventKind::TranscriptSegment => {
                    out.transcript.push(self.resolve_transcript(&event, duration));
                }
            }
        }

        sort_graphics(&mut out.scoreboards);
        sort_graphics(&mut out.full_time);
        out.transcript
            .sort_by(|a, b| a.start.total_cmp(&b.start).then(a.end.total_cmp(&b.end)));
        out.notes.sort_by(|a, b| {
            a.timestamp
                .total_cmp(&b.timestamp)
                .then(a.event_kind.cmp(&b.event_kind))
                .then_with(|| a.text.cmp(&b.text))
        });

        out
    }

    fn resolve_graphic(
        &self,
        event: &DetectionEvent,
        notes: &mut Vec<EvidenceNote>,
    ) -> Option<GraphicObservation> {
        let teams = self.strict.find_teams(&NormalizedText::new(&event.text));

        let pair = match teams.as_slice() {
            [] => {
                push_note(notes, event, NoteReason::NoTeams);
                return None;
            }
            [team] => {
                let mut fixtures = self.roster.fixtures_for(team);
                match (fixtures.next(), fixtures.next()) {
                    (Some(fixture), None) => {
                        let opponent = fixture.opponent_of(team).unwrap_or_default().to_string();
                        push_note(
                            notes,
                            event,
                            NoteReason::OpponentFromRoster {
                                team: team.clone(),
                                opponent,
                            },
                        );
                        fixture.clone()
                    }
                    _ => {
                        push_note(
                            notes,
                            event,
                            NoteReason::SingleTeamUnresolved { team: team.clone() },
                        );
                        return None;
                    }
                }
            }
            [home, away] => {
                let pair = TeamPair::new(home.clone(), away.clone());
                self.roster
                    .fixture_for_key(&pair.key())
                    .cloned()
                    .unwrap_or(pair)
            }
            _ => {
                push_note(notes, event, NoteReason::TooManyTeams { count: teams.len() });
                return None;
            }
        };

        Some(GraphicObservation {
            timestamp: event.timestamp,
            teams: pair,
            confidence: event.recognition_confidence,
        })
    }

    fn resolve_transcript(&self, event: &DetectionEvent, duration: f64) -> TranscriptObservation {
        let start = event.timestamp;
        let end = event
            .end
            .filter(|e| e.is_finite() && *e >= start)
            .unwrap_or(start)
            .min(duration);

        let sentences: Vec<Sentence> = split_sentences(&event.text, &event.words, start, end)
            .into_iter()
            .map(|(s_start, s_end, text)| {
                let text = NormalizedText::new(&text);
                let mentions = self.fuzzy.find_teams(&text).into_iter().collect();
                Sentence {
                    start: s_start,
                    end: s_end,
                    text,
                    mentions,
                }
            })
            .collect();

        let mentions = sentences
            .iter()
            .flat_map(|s| s.mentions.iter().cloned())
            .collect();

        TranscriptObservation {
            start,
            end,
            text: event.text.clone(),
            sentences,
            mentions,
        }
    }
}

fn push_note(notes: &mut Vec<EvidenceNote>, event: &DetectionEvent, reason: NoteReason) {
    if reason.is_drop() {
        metrics::record_dropped_event(event.kind.as_str());
    }
    debug!(
        event_kind = event.kind.as_str(),
        timestamp = event.timestamp,
        reason = ?reason,
        "Evidence note"
    );
    notes.push(EvidenceNote {
        event_kind: event.kind,
        timestamp: event.timestamp,
        text: event.text.clone(),
        reason,
    });
}

fn sort_graphics(graphics: &mut [GraphicObservation]) {
    graphics.sort_by(|a, b| {
        a.timestamp
            .total_cmp(&b.timestamp)
            .then_with(|| a.teams.sort_label().cmp(&b.teams.sort_label()))
    });
}

fn ends_sentence(word: &str) -> bool {
    word.trim_end_matches(['"', '\'', ')'])
        .ends_with(['.', '?', '!'])
}

/// Split a segment into `(start, end, text)` sentences.
///
/// Word timings give exact sentence bounds. Without them the segment span is
/// shared out in proportion to sentence length.
fn split_sentences(
    text: &str,
    words: &[TranscriptWord],
    start: f64,
    end: f64,
) -> Vec<(f64, f64, String)> {
    if !words.is_empty() {
        let mut sentences = Vec::new();
        let mut current: Vec<&TranscriptWord> = Vec::new();
        for word in words {
            current.push(word);
            if ends_sentence(&word.word) {
                sentences.push(join_words(&current));
                current.clear();
            }
        }
        if !current.is_empty() {
            sentences.push(join_words(&current));
        }
        return sentences;
    }

    let mut pieces: Vec<&str> = Vec::new();
    let mut piece_start = 0;
    for (i, c) in text.char_indices() {
        if matches!(c, '.' | '?' | '!') {
            pieces.push(&text[piece_start..i + c.len_utf8()]);
            piece_start = i + c.len_utf8();
        }
    }
    pieces.push(&text[piece_start..]);
    let pieces: Vec<&str> = pieces.into_iter().filter(|p| !p.trim().is_empty()).collect();

    if pieces.is_empty() {
        return vec![(start, end, String::new())];
    }

    let total: usize = pieces.iter().map(|p| p.len()).sum();
    let span = end - start;
    let mut cursor = start;
    let mut consumed = 0;
    pieces
        .into_iter()
        .map(|piece| {
            consumed += piece.len();
            let piece_end = start + span * consumed as f64 / total as f64;
            let sentence = (cursor, piece_end, piece.trim().to_string());
            cursor = piece_end;
            sentence
        })
        .collect()
}

fn join_words(words: &[&TranscriptWord]) -> (f64, f64, String) {
    let start = words.first().map(|w| w.start).unwrap_or_default();
    let end = words.last().map(|w| w.end).unwrap_or(start);
    let text = words.iter().map(|w| w.word.as_str()).collect::<Vec<_>>().join(" ");
    (start, end, text)
}
