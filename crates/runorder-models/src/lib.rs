//! Shared data models for episode running-order analysis.
//!
//! This crate provides Serde-serializable types for:
//! - Evidence consumed from OCR, speech-to-text and fixture collaborators
//! - Team identities, fixtures and the roster
//! - Detection sources and strategy candidates
//! - The running-order result document

pub mod detection_source;
pub mod evidence;
pub mod running_order;
pub mod team;
pub mod timestamp;

// Re-export common types
pub use detection_source::DetectionSource;
pub use evidence::{
    DetectionEvent, EpisodeEvidence, EventKind, OcrRecord, RegionKind, TranscriptSegment,
    TranscriptWord,
};
pub use running_order::{
    BoundaryField, Chapter, Disagreement, EvidenceNote, InvariantViolation, Match, MatchCandidate,
    MatchSegment, NonMatchSpan, NoteReason, RunningOrderResult, SegmentKind, SpanKind,
    StrategyKind, StrategyResult,
};
pub use team::{FixtureKey, FixtureRoster, TeamIdentity, TeamPair};
