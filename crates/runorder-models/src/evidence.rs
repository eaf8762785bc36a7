//! Evidence consumed from the recognition collaborators.
//!
//! The OCR subsystem reports recognised text per screen region, the
//! speech-to-text subsystem reports transcript segments with word timings,
//! and the fixture collaborator supplies the roster. All three arrive in one
//! [`EpisodeEvidence`] document per episode.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::team::FixtureRoster;
use crate::timestamp::seconds;

/// Screen region an OCR record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    /// Live score bug shown during match footage
    Scoreboard,
    /// Full-time result graphic
    FullTimeGraphic,
}

/// One OCR observation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OcrRecord {
    /// Seconds from episode start (number or HH:MM:SS string on input)
    #[serde(deserialize_with = "seconds::deserialize")]
    pub timestamp: f64,

    /// Raw recognised text
    pub recognized_text: String,

    pub region_kind: RegionKind,

    /// Engine confidence (0-1)
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

/// Word-level timing inside a transcript segment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

/// One speech-to-text segment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptSegment {
    #[serde(deserialize_with = "seconds::deserialize")]
    pub start: f64,

    #[serde(deserialize_with = "seconds::deserialize")]
    pub end: f64,

    pub text: String,

    #[serde(default)]
    pub words: Vec<TranscriptWord>,
}

/// Kind of a detection event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Scoreboard,
    FullTimeGraphic,
    TranscriptSegment,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Scoreboard => "scoreboard",
            EventKind::FullTimeGraphic => "full_time_graphic",
            EventKind::TranscriptSegment => "transcript_segment",
        }
    }

    /// Graphic events identify a fixture; transcript events carry speech.
    pub fn is_graphic(&self) -> bool {
        !matches!(self, EventKind::TranscriptSegment)
    }
}

impl From<RegionKind> for EventKind {
    fn from(region: RegionKind) -> Self {
        match region {
            RegionKind::Scoreboard => EventKind::Scoreboard,
            RegionKind::FullTimeGraphic => EventKind::FullTimeGraphic,
        }
    }
}

/// One observed artifact at a timestamp. Immutable once ingested.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DetectionEvent {
    pub kind: EventKind,

    /// Start of the observation in seconds
    pub timestamp: f64,

    /// End of the observation (transcript segments only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,

    pub text: String,

    /// Word timings (transcript segments only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<TranscriptWord>,

    pub recognition_confidence: f64,
}

impl From<&OcrRecord> for DetectionEvent {
    fn from(record: &OcrRecord) -> Self {
        Self {
            kind: record.region_kind.into(),
            timestamp: record.timestamp,
            end: None,
            text: record.recognized_text.clone(),
            words: Vec::new(),
            recognition_confidence: record.confidence,
        }
    }
}

impl From<&TranscriptSegment> for DetectionEvent {
    fn from(segment: &TranscriptSegment) -> Self {
        Self {
            kind: EventKind::TranscriptSegment,
            timestamp: segment.start,
            end: Some(segment.end),
            text: segment.text.clone(),
            words: segment.words.clone(),
            recognition_confidence: 1.0,
        }
    }
}

/// Everything known about one episode before analysis.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EpisodeEvidence {
    /// Episode identifier (used for logging and by the persistence layer)
    pub episode_id: String,

    /// Episode duration in seconds
    #[serde(deserialize_with = "seconds::deserialize")]
    pub episode_duration: f64,

    #[serde(default)]
    pub ocr: Vec<OcrRecord>,

    #[serde(default)]
    pub transcript: Vec<TranscriptSegment>,

    #[serde(default)]
    pub roster: FixtureRoster,
}

impl EpisodeEvidence {
    pub fn new(episode_id: impl Into<String>, episode_duration: f64, roster: FixtureRoster) -> Self {
        Self {
            episode_id: episode_id.into(),
            episode_duration,
            ocr: Vec::new(),
            transcript: Vec::new(),
            roster,
        }
    }

    /// Append an OCR observation.
    pub fn with_ocr(mut self, timestamp: f64, region_kind: RegionKind, text: impl Into<String>) -> Self {
        self.ocr.push(OcrRecord {
            timestamp,
            recognized_text: text.into(),
            region_kind,
            confidence: 1.0,
        });
        self
    }

    /// Append a transcript segment without word timings.
    pub fn with_transcript(mut self, start: f64, end: f64, text: impl Into<String>) -> Self {
        self.transcript.push(TranscriptSegment {
            start,
            end,
            text: text.into(),
            words: Vec::new(),
        });
        self
    }

    /// Flatten OCR records and transcript segments into detection events,
    /// in source order.
    pub fn detection_events(&self) -> Vec<DetectionEvent> {
        self.ocr
            .iter()
            .map(DetectionEvent::from)
            .chain(self.transcript.iter().map(DetectionEvent::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::TeamIdentity;

    #[test]
    fn test_evidence_deserializes_clock_timestamps() {
        let json = r#"{
            "episode_id": "ep-1",
            "episode_duration": "01:24:00",
            "ocr": [
                {"timestamp": "00:00:50", "recognized_text": "ARS 0-0 CHE", "region_kind": "scoreboard"},
                {"timestamp": 560, "recognized_text": "FT Arsenal 2 Chelsea 1", "region_kind": "full_time_graphic", "confidence": 0.9}
            ],
            "transcript": [
                {"start": 10.0, "end": 14.5, "text": "Arsenal host Chelsea."}
            ],
            "roster": {"teams": [{"name": "Arsenal", "alternates": ["ARS"]}]}
        }"#;

        let evidence: EpisodeEvidence = serde_json::from_str(json).unwrap();
        assert_eq!(evidence.episode_duration, 5040.0);
        assert_eq!(evidence.ocr[0].timestamp, 50.0);
        assert_eq!(evidence.ocr[0].confidence, 1.0);
        assert_eq!(evidence.ocr[1].region_kind, RegionKind::FullTimeGraphic);
        assert!(evidence.transcript[0].words.is_empty());
        assert!(evidence.roster.fixtures.is_empty());
    }

    #[test]
    fn test_detection_events_cover_all_sources() {
        let evidence = EpisodeEvidence::new(
            "ep-2",
            100.0,
            FixtureRoster::new(vec![TeamIdentity::new("Arsenal")]),
        )
        .with_ocr(5.0, RegionKind::Scoreboard, "ARS 0-0 CHE")
        .with_transcript(1.0, 3.0, "Hello");

        let events = evidence.detection_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::Scoreboard);
        assert!(events[0].kind.is_graphic());
        assert_eq!(events[1].kind, EventKind::TranscriptSegment);
        assert_eq!(events[1].end, Some(3.0));
    }
}
