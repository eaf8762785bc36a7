//! Result properties that hold for any evidence: determinism, coverage,
//! graceful degradation and evidence loading.

mod common;

use std::io::Write;

use common::{init_tracing, roster, with_graphics};
use runorder_engine::{load_evidence, AnalysisError, RunningOrderAnalyzer};
use runorder_models::{EpisodeEvidence, NoteReason, RegionKind, RunningOrderResult};

fn three_match_episode() -> EpisodeEvidence {
    let evidence = EpisodeEvidence::new(
        "three-matches",
        2400.0,
        roster(&[
            ("Liverpool", "Brentford"),
            ("Arsenal", "Chelsea"),
            ("Everton", "Fulham"),
        ]),
    );
    let evidence = with_graphics(evidence, "Liverpool", "Brentford", 40.0, 600.0);
    let evidence = with_graphics(evidence, "Arsenal", "Chelsea", 700.0, 1250.0);
    with_graphics(evidence, "Everton", "Fulham", 1400.0, 1900.0)
        .with_transcript(20.0, 30.0, "Welcome. We start at Anfield with Liverpool.")
        .with_transcript(660.0, 670.0, "Arsenal and Chelsea next.")
        .with_transcript(1700.0, 1710.0, "Everton pressing for a winner.")
        .with_transcript(2100.0, 2110.0, "Thanks for watching, see you next week.")
}

fn assert_tiles_timeline(result: &RunningOrderResult) {
    let mut spans: Vec<(f64, f64)> = result
        .matches
        .iter()
        .map(|m| (m.match_start, m.match_end))
        .chain(result.non_match_spans.iter().map(|s| (s.start, s.end)))
        .collect();
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));

    assert_eq!(spans.first().map(|s| s.0), Some(0.0));
    for pair in spans.windows(2) {
        assert_eq!(pair[0].1, pair[1].0);
    }
    assert_eq!(spans.last().map(|s| s.1), Some(result.episode_duration));
}

#[test]
fn test_full_agreement_gives_full_consensus() {
    init_tracing();
    let result = RunningOrderAnalyzer::default()
        .analyze(&three_match_episode())
        .unwrap();

    assert_eq!(result.consensus_confidence, 1.0);
    assert!(result.disagreements.is_empty());
    let home: Vec<&str> = result.matches.iter().map(|m| m.teams.home.as_str()).collect();
    assert_eq!(home, vec!["Liverpool", "Arsenal", "Everton"]);
}

#[test]
fn test_boundaries_positions_and_coverage() {
    let result = RunningOrderAnalyzer::default()
        .analyze(&three_match_episode())
        .unwrap();

    for (i, m) in result.matches.iter().enumerate() {
        assert_eq!(m.position as usize, i + 1);
        assert!(m.match_start < m.highlights_start);
        assert!(m.highlights_start < m.highlights_end);
        assert!(m.highlights_end < m.match_end);
        assert!(!m.detection_sources.is_empty());
        assert!((0.0..=1.0).contains(&m.confidence));
    }
    assert_tiles_timeline(&result);
    assert!(result.check_invariants().is_empty());

    // Transcript mentions place two of the three intros
    assert_eq!(result.matches[0].match_start, 20.0);
    assert_eq!(result.matches[1].match_start, 660.0);
}

#[test]
fn test_repeated_runs_serialize_identically() {
    let analyzer = RunningOrderAnalyzer::default();
    let evidence = three_match_episode();

    let first = serde_json::to_string(&analyzer.analyze(&evidence).unwrap()).unwrap();
    let second = serde_json::to_string(&analyzer.analyze(&evidence).unwrap()).unwrap();
    let fresh = serde_json::to_string(&RunningOrderAnalyzer::default().analyze(&evidence).unwrap()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, fresh);
}

#[test]
fn test_input_order_does_not_matter() {
    let evidence = three_match_episode()
        .with_ocr(300.0, RegionKind::Scoreboard, "REPLAY")
        .with_ocr(1300.0, RegionKind::FullTimeGraphic, "ARS EVE FUL");
    let mut shuffled = evidence.clone();
    shuffled.ocr.reverse();
    shuffled.transcript.reverse();

    let analyzer = RunningOrderAnalyzer::default();
    let a = serde_json::to_string(&analyzer.analyze(&evidence).unwrap()).unwrap();
    let b = serde_json::to_string(&analyzer.analyze(&shuffled).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_no_evidence_gives_empty_result() {
    let evidence = EpisodeEvidence::new("empty", 3600.0, roster(&[("Arsenal", "Chelsea")]))
        .with_transcript(10.0, 20.0, "Good evening and welcome.");
    let result = RunningOrderAnalyzer::default().analyze(&evidence).unwrap();

    assert!(result.is_empty());
    assert_eq!(result.consensus_confidence, 0.0);
    assert!(result.non_match_spans.is_empty());
    assert!(result.check_invariants().is_empty());
}

#[test]
fn test_unreadable_graphics_become_notes() {
    let evidence = with_graphics(
        EpisodeEvidence::new("noisy", 1500.0, roster(&[("Arsenal", "Chelsea")])),
        "Arsenal",
        "Chelsea",
        50.0,
        560.0,
    )
    .with_ocr(300.0, RegionKind::Scoreboard, "REPLAY")
    .with_ocr(310.0, RegionKind::Scoreboard, "ARS EVE FUL");

    let result = RunningOrderAnalyzer::default().analyze(&evidence).unwrap();
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.notes.len(), 2);
    assert_eq!(result.notes[0].reason, NoteReason::NoTeams);
    assert_eq!(result.notes[1].reason, NoteReason::TooManyTeams { count: 3 });
}

#[test]
fn test_load_evidence_from_file() {
    let json = r#"{
        "episode_id": "from-file",
        "episode_duration": "00:25:00",
        "ocr": [
            {"timestamp": "00:00:50", "recognized_text": "ARS 0-0 CHE", "region_kind": "scoreboard"},
            {"timestamp": 560, "recognized_text": "FT Arsenal 2-1 Chelsea", "region_kind": "full_time_graphic"},
            {"timestamp": "00:10:00", "recognized_text": "EVE 0-0 FUL", "region_kind": "scoreboard"},
            {"timestamp": "00:15:00", "recognized_text": "FT Everton 1-1 Fulham", "region_kind": "full_time_graphic", "confidence": 0.8}
        ],
        "transcript": [
            {"start": 10.0, "end": 15.0, "text": "Arsenal against Chelsea first.",
             "words": [
                {"word": "Arsenal", "start": 10.0, "end": 10.6},
                {"word": "against", "start": 10.7, "end": 11.2},
                {"word": "Chelsea", "start": 11.3, "end": 11.9},
                {"word": "first.", "start": 12.0, "end": 12.4}
             ]}
        ],
        "roster": {
            "teams": [
                {"name": "Arsenal", "alternates": ["ARS"]},
                {"name": "Chelsea", "alternates": ["CHE"]},
                {"name": "Everton", "alternates": ["EVE"]},
                {"name": "Fulham", "alternates": ["FUL"]}
            ],
            "fixtures": [
                {"home": "Arsenal", "away": "Chelsea"},
                {"home": "Everton", "away": "Fulham"}
            ]
        }
    }"#;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let evidence = load_evidence(file.path()).unwrap();
    assert_eq!(evidence.episode_duration, 1500.0);

    let result = RunningOrderAnalyzer::default().analyze_file(file.path()).unwrap();
    assert_eq!(result.episode_id, "from-file");
    assert_eq!(result.matches.len(), 2);
    assert_eq!(result.matches[0].match_start, 10.0);
    assert_eq!(result.matches[1].highlights_end, 900.0);
    assert!(result.check_invariants().is_empty());
}

#[test]
fn test_malformed_evidence_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{\"episode_id\": \"x\", \"episode_duration\": \"soon\"}").unwrap();

    let err = load_evidence(file.path()).unwrap_err();
    assert!(matches!(err, AnalysisError::JsonParse(_)));
}
