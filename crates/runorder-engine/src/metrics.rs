//! Analysis metrics collection.
//!
//! Standardized metrics for monitoring running-order analysis:
//! - Matches detected and inferred per run
//! - Disagreements by kind
//! - Start fallbacks and interlude / table-review decisions
//! - Stage latency

use metrics::{counter, gauge, histogram};
use runorder_models::Disagreement;

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Total analysis runs by outcome ("matches" or "empty").
    pub const RUNS_TOTAL: &str = "runorder_runs_total";

    /// Matches in the final result by provenance ("detected" or "inferred").
    pub const MATCHES_TOTAL: &str = "runorder_matches_total";

    /// Disagreements recorded by kind.
    pub const DISAGREEMENTS_TOTAL: &str = "runorder_disagreements_total";

    /// Evidence events dropped during normalisation by event kind.
    pub const EVENTS_DROPPED_TOTAL: &str = "runorder_events_dropped_total";

    /// Studio intros that used the default duration.
    pub const START_FALLBACKS_TOTAL: &str = "runorder_start_fallbacks_total";

    /// Interlude and table-review hypotheses by kind and decision.
    pub const NON_MATCH_DECISIONS_TOTAL: &str = "runorder_non_match_decisions_total";

    /// Consensus confidence of the latest run.
    pub const CONSENSUS_CONFIDENCE: &str = "runorder_consensus_confidence";

    /// Stage latency in seconds.
    pub const STAGE_SECONDS: &str = "runorder_stage_seconds";
}

// =============================================================================
// Recording Functions
// =============================================================================

/// Record the outcome of a completed run.
pub fn record_run(detected: usize, inferred: usize, consensus_confidence: f64) {
    let outcome = if detected + inferred == 0 { "empty" } else { "matches" };
    counter!(names::RUNS_TOTAL, "outcome" => outcome).increment(1);
    counter!(names::MATCHES_TOTAL, "provenance" => "detected").increment(detected as u64);
    counter!(names::MATCHES_TOTAL, "provenance" => "inferred").increment(inferred as u64);
    gauge!(names::CONSENSUS_CONFIDENCE).set(consensus_confidence);
}

/// Record every disagreement of a run by kind.
pub fn record_disagreements(disagreements: &[Disagreement]) {
    for disagreement in disagreements {
        counter!(
            names::DISAGREEMENTS_TOTAL,
            "kind" => disagreement_kind(disagreement)
        )
        .increment(1);
    }
}

/// Record a dropped evidence event.
pub fn record_dropped_event(event_kind: &'static str) {
    counter!(names::EVENTS_DROPPED_TOTAL, "event_kind" => event_kind).increment(1);
}

/// Record a studio intro that fell back to the default duration.
pub fn record_start_fallback() {
    counter!(names::START_FALLBACKS_TOTAL).increment(1);
}

/// Record an interlude or table-review decision.
pub fn record_non_match_decision(kind: &'static str, accepted: bool) {
    let decision = if accepted { "accepted" } else { "rejected" };
    counter!(
        names::NON_MATCH_DECISIONS_TOTAL,
        "kind" => kind,
        "decision" => decision
    )
    .increment(1);
}

/// Record how long a stage took.
pub fn record_stage_latency(stage: &'static str, seconds: f64) {
    histogram!(names::STAGE_SECONDS, "stage" => stage).record(seconds);
}

/// Label value for a disagreement.
pub fn disagreement_kind(disagreement: &Disagreement) -> &'static str {
    match disagreement {
        Disagreement::OrderMismatch { .. } => "order_mismatch",
        Disagreement::MissingFromStrategy { .. } => "missing_from_strategy",
        Disagreement::BoundaryConflict { .. } => "boundary_conflict",
        Disagreement::BoundaryOverlap { .. } => "boundary_overlap",
        Disagreement::MissingMatch { .. } => "missing_match",
        Disagreement::Unplaceable { .. } => "unplaceable",
    }
}

// =============================================================================
// Tests
// =============================================================================
