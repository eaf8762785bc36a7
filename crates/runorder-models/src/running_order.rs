//! Running-order result document and the intermediate strategy records.

use std::collections::BTreeSet;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::detection_source::DetectionSource;
use crate::evidence::EventKind;
use crate::team::{FixtureKey, TeamPair};
use crate::timestamp::format_seconds;

/// Tolerance used when comparing boundaries that must coincide.
const COVERAGE_EPSILON: f64 = 1e-6;

/// Ordering strategy identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    ScoreboardOrder,
    FullTimeGraphicOrder,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::ScoreboardOrder => "scoreboard_order",
            StrategyKind::FullTimeGraphicOrder => "full_time_graphic_order",
        }
    }

    /// Signal the strategy reads.
    pub fn source(&self) -> DetectionSource {
        match self {
            StrategyKind::ScoreboardOrder => DetectionSource::Scoreboard,
            StrategyKind::FullTimeGraphicOrder => DetectionSource::FullTimeGraphic,
        }
    }

    pub fn precision_rank(&self) -> u8 {
        self.source().precision_rank()
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Partial match produced by one ordering strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchCandidate {
    pub teams: TeamPair,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights_start: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights_end: Option<f64>,

    pub detection_sources: BTreeSet<DetectionSource>,

    /// Number of raw events that backed this candidate
    pub evidence_count: u32,
}

impl MatchCandidate {
    pub fn new(teams: TeamPair, source: DetectionSource) -> Self {
        Self {
            teams,
            highlights_start: None,
            highlights_end: None,
            detection_sources: BTreeSet::from([source]),
            evidence_count: 0,
        }
    }

    /// The time this candidate was ordered by.
    pub fn anchor(&self) -> Option<f64> {
        self.highlights_start.or(self.highlights_end)
    }
}

/// One strategy's candidate ordering, kept for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StrategyResult {
    pub strategy: StrategyKind,
    pub candidates: Vec<MatchCandidate>,
}

impl StrategyResult {
    pub fn new(strategy: StrategyKind, candidates: Vec<MatchCandidate>) -> Self {
        Self { strategy, candidates }
    }

    /// Fixture identities in candidate order.
    pub fn ordering(&self) -> Vec<FixtureKey> {
        self.candidates.iter().map(|c| c.teams.key()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Segment of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    StudioIntro,
    Highlights,
    PostMatchAnalysis,
}

impl SegmentKind {
    pub fn label(&self) -> &'static str {
        match self {
            SegmentKind::StudioIntro => "Studio intro",
            SegmentKind::Highlights => "Highlights",
            SegmentKind::PostMatchAnalysis => "Analysis",
        }
    }
}

/// Half-open time span `[start, end)` of a match segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchSegment {
    pub kind: SegmentKind,
    pub start: f64,
    pub end: f64,
}

impl MatchSegment {
    pub fn duration_secs(&self) -> f64 {
        self.end - self.start
    }
}

/// One fixture within the episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Match {
    pub teams: TeamPair,

    /// 1-based running-order position
    pub position: u32,

    pub match_start: f64,
    pub highlights_start: f64,
    pub highlights_end: f64,
    pub match_end: f64,

    /// Confidence in identity and boundaries (0-1)
    pub confidence: f64,

    pub detection_sources: BTreeSet<DetectionSource>,
}

impl Match {
    /// Studio intro, highlights and post-match analysis spans.
    pub fn segments(&self) -> [MatchSegment; 3] {
        [
            MatchSegment {
                kind: SegmentKind::StudioIntro,
                start: self.match_start,
                end: self.highlights_start,
            },
            MatchSegment {
                kind: SegmentKind::Highlights,
                start: self.highlights_start,
                end: self.highlights_end,
            },
            MatchSegment {
                kind: SegmentKind::PostMatchAnalysis,
                start: self.highlights_end,
                end: self.match_end,
            },
        ]
    }

    pub fn duration_secs(&self) -> f64 {
        self.match_end - self.match_start
    }

    pub fn is_inferred(&self) -> bool {
        self.detection_sources.contains(&DetectionSource::Inferred)
    }

    fn boundaries_increase(&self) -> bool {
        self.match_start < self.highlights_start
            && self.highlights_start < self.highlights_end
            && self.highlights_end < self.match_end
    }
}

/// Kind of non-match content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    /// Titles and preamble before the first studio intro
    Opening,
    /// Secondary-programme teaser between two matches
    Interlude,
    /// League-table discussion after the final match
    TableReview,
}

impl SpanKind {
    pub fn label(&self) -> &'static str {
        match self {
            SpanKind::Opening => "Opening",
            SpanKind::Interlude => "Interlude",
            SpanKind::TableReview => "Table review",
        }
    }
}

/// Half-open span `[start, end)` of non-match content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NonMatchSpan {
    pub kind: SpanKind,
    pub start: f64,
    pub end: f64,
}

/// Which boundary a conflict concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryField {
    HighlightsStart,
    HighlightsEnd,
}

/// A conflict or omission found while reconciling strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Disagreement {
    /// A strategy placed a fixture at a different position than the canonical order
    OrderMismatch {
        strategy: StrategyKind,
        teams: TeamPair,
        canonical_position: u32,
        strategy_position: u32,
    },
    /// A strategy did not detect a fixture present in the canonical order
    MissingFromStrategy {
        strategy: StrategyKind,
        teams: TeamPair,
    },
    /// Two strategies reported the same boundary beyond tolerance
    BoundaryConflict {
        teams: TeamPair,
        field: BoundaryField,
        values: Vec<(StrategyKind, f64)>,
        resolved: f64,
    },
    /// Highlights of consecutive matches overlap
    BoundaryOverlap {
        teams: TeamPair,
        next: TeamPair,
        highlights_end: f64,
        next_highlights_start: f64,
    },
    /// An expected fixture has no detections and could not be inferred
    MissingMatch { teams: TeamPair },
    /// A candidate could not be given strictly increasing boundaries
    Unplaceable { teams: TeamPair, reason: String },
}

/// Why an evidence event was dropped or adjusted during normalisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NoteReason {
    NoTeams,
    TooManyTeams { count: usize },
    SingleTeamUnresolved { team: String },
    /// Kept: the missing opponent came from the fixture roster
    OpponentFromRoster { team: String, opponent: String },
    LowConfidence { confidence: f64 },
    OutOfRange,
}

impl NoteReason {
    /// True if the event was discarded.
    pub fn is_drop(&self) -> bool {
        !matches!(self, NoteReason::OpponentFromRoster { .. })
    }
}

/// Trace of a normalisation decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvidenceNote {
    pub event_kind: EventKind,
    pub timestamp: f64,
    pub text: String,
    #[serde(flatten)]
    pub reason: NoteReason,
}

/// A violated result invariant.
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    BoundaryOrder { position: u32 },
    Positions,
    NoSources { position: u32 },
    CoverageGap { at: f64 },
    CoverageOverlap { at: f64 },
    CoverageEnd { covered_until: f64 },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoundaryOrder { position } => {
                write!(f, "match {} boundaries are not strictly increasing", position)
            }
            Self::Positions => write!(f, "positions are not the contiguous range 1..=N"),
            Self::NoSources { position } => write!(f, "match {} has no detection sources", position),
            Self::CoverageGap { at } => write!(f, "timeline gap at {:.3}s", at),
            Self::CoverageOverlap { at } => write!(f, "timeline overlap at {:.3}s", at),
            Self::CoverageEnd { covered_until } => {
                write!(f, "timeline covered only until {:.3}s", covered_until)
            }
        }
    }
}

/// Chapter marker for export (e.g. video chapters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Chapter {
    pub start: f64,
    pub timestamp: String,
    pub title: String,
}

/// Final analysis document for one episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunningOrderResult {
    pub episode_id: String,
    pub episode_duration: f64,

    /// Matches in running order
    pub matches: Vec<Match>,

    /// Opening, interlude and table-review spans
    pub non_match_spans: Vec<NonMatchSpan>,

    /// Per-strategy candidate orderings
    pub strategy_results: Vec<StrategyResult>,

    /// Agreement between strategies (0-1)
    pub consensus_confidence: f64,

    pub disagreements: Vec<Disagreement>,

    /// Normalisation notes for dropped or adjusted evidence
    pub notes: Vec<EvidenceNote>,
}

impl RunningOrderResult {
    /// A valid result with no matches.
    pub fn empty(episode_id: impl Into<String>, episode_duration: f64) -> Self {
        Self {
            episode_id: episode_id.into(),
            episode_duration,
            matches: Vec::new(),
            non_match_spans: Vec::new(),
            strategy_results: Vec::new(),
            consensus_confidence: 0.0,
            disagreements: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Check boundary order, positions, provenance and timeline coverage.
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();

        for m in &self.matches {
            if !m.boundaries_increase() {
                violations.push(InvariantViolation::BoundaryOrder { position: m.position });
            }
            if m.detection_sources.is_empty() {
                violations.push(InvariantViolation::NoSources { position: m.position });
            }
        }

        let positions: Vec<u32> = self.matches.iter().map(|m| m.position).collect();
        let expected: Vec<u32> = (1..=self.matches.len() as u32).collect();
        if positions != expected {
            violations.push(InvariantViolation::Positions);
        }

        if self.matches.is_empty() {
            return violations;
        }

        let mut spans: Vec<(f64, f64)> = self
            .matches
            .iter()
            .map(|m| (m.match_start, m.match_end))
            .chain(self.non_match_spans.iter().map(|s| (s.start, s.end)))
            .collect();
        spans.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut covered = 0.0;
        for (start, end) in spans {
            if start > covered + COVERAGE_EPSILON {
                violations.push(InvariantViolation::CoverageGap { at: covered });
            } else if start < covered - COVERAGE_EPSILON {
                violations.push(InvariantViolation::CoverageOverlap { at: start });
            }
            covered = covered.max(end);
        }
        if (covered - self.episode_duration).abs() > COVERAGE_EPSILON {
            violations.push(InvariantViolation::CoverageEnd { covered_until: covered });
        }

        violations
    }

    /// Chapter list covering every match segment and non-match span.
    pub fn chapters(&self) -> Vec<Chapter> {
        let mut chapters: Vec<Chapter> = self
            .matches
            .iter()
            .flat_map(|m| {
                m.segments().into_iter().map(move |segment| Chapter {
                    start: segment.start,
                    timestamp: format_seconds(segment.start),
                    title: format!("{} - {}", m.teams, segment.kind.label()),
                })
            })
            .chain(self.non_match_spans.iter().map(|span| Chapter {
                start: span.start,
                timestamp: format_seconds(span.start),
                title: span.kind.label().to_string(),
            }))
            .collect();
        chapters.sort_by(|a, b| a.start.total_cmp(&b.start));
        chapters
    }
}
