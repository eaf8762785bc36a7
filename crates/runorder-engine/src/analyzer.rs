//! Episode analysis entry point.
//!
//! [`RunningOrderAnalyzer`] wires the pipeline together:
//!
//! 1. normalise evidence against the roster
//! 2. run the ordering strategies and resolve consensus
//! 3. detect match starts, then match ends and non-match spans
//! 4. assemble the result document
//!
//! Every stage is a pure function of its inputs, so the same evidence always
//! serialises to the same result.

use std::path::Path;
use std::time::Instant;

use runorder_models::timestamp::MAX_EPISODE_DURATION_SECS;
use runorder_models::{EpisodeEvidence, RunningOrderResult};

use crate::assembler::ResultAssembler;
use crate::boundaries::{MatchEndDetector, MatchStartDetector};
use crate::config::AnalysisConfig;
use crate::consensus::ConsensusResolver;
use crate::error::{AnalysisError, AnalysisResult};
use crate::logging::EpisodeLogger;
use crate::metrics;
use crate::normalizer::EvidenceNormalizer;

/// Run `f` and record its latency under `stage`.
fn timed<T>(stage: &'static str, f: impl FnOnce() -> T) -> T {
    let started = Instant::now();
    let out = f();
    metrics::record_stage_latency(stage, started.elapsed().as_secs_f64());
    out
}

/// Determines the running order and segment boundaries of an episode.
pub struct RunningOrderAnalyzer {
    config: AnalysisConfig,
    resolver: ConsensusResolver,
}

impl RunningOrderAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            resolver: ConsensusResolver::default(),
        }
    }

    /// Analyzer configured from `RUNORDER_*` environment variables.
    pub fn from_env() -> AnalysisResult<Self> {
        Ok(Self::new(AnalysisConfig::from_env()?))
    }

    /// Use a custom resolver (e.g. a different strategy set).
    pub fn with_resolver(mut self, resolver: ConsensusResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one episode.
    ///
    /// Evidence problems never fail the run; they lower confidence or show
    /// up as disagreements and notes. Errors are reserved for an unusable
    /// duration or configuration.
    pub fn analyze(&self, evidence: &EpisodeEvidence) -> AnalysisResult<RunningOrderResult> {
        let duration = evidence.episode_duration;
        if !duration.is_finite() || duration <= 0.0 || duration > MAX_EPISODE_DURATION_SECS {
            return Err(AnalysisError::InvalidDuration(duration));
        }
        self.config.validate()?;

        let logger = EpisodeLogger::new(&evidence.episode_id, "normalize");
        let span = logger.create_span();
        let _enter = span.enter();
        logger.log_start(&format!(
            "{} OCR records, {} transcript segments, {} roster teams",
            evidence.ocr.len(),
            evidence.transcript.len(),
            evidence.roster.teams.len()
        ));

        let normalized = timed("normalize", || {
            EvidenceNormalizer::new(&evidence.roster, &self.config).normalize(evidence)
        });
        let dropped = normalized.notes.iter().filter(|n| n.reason.is_drop()).count();
        if dropped > 0 {
            logger.log_warning(&format!("{} evidence events dropped", dropped));
        }

        let consensus_logger = logger.for_stage("consensus");
        let consensus = timed("consensus", || self.resolver.resolve(&normalized, &self.config));
        consensus_logger.log_progress(&format!(
            "{} matches, consensus {:.2}, {} disagreements",
            consensus.matches.len(),
            consensus.consensus_confidence,
            consensus.disagreements.len()
        ));

        let (starts, ends) = timed("boundaries", || {
            let starts = MatchStartDetector::new(&normalized, &self.config).detect_all(&consensus.matches);
            let start_times: Vec<f64> = starts.iter().map(|s| s.match_start).collect();
            let ends = MatchEndDetector::new(&normalized, &self.config)
                .detect_all(&consensus.matches, &start_times);
            (starts, ends)
        });

        let inferred = consensus.matches.iter().filter(|m| m.is_inferred()).count();
        let detected = consensus.matches.len() - inferred;

        let assembler = ResultAssembler::new(&self.config, logger.for_stage("assemble"));
        let result = timed("assemble", || {
            assembler.assemble(duration, consensus, &starts, &ends, normalized.notes)
        });

        metrics::record_run(detected, inferred, result.consensus_confidence);
        metrics::record_disagreements(&result.disagreements);

        Ok(result)
    }

    /// Load an evidence document and analyze it.
    pub fn analyze_file(&self, path: impl AsRef<Path>) -> AnalysisResult<RunningOrderResult> {
        let evidence = load_evidence(path)?;
        self.analyze(&evidence)
    }
}

impl Default for RunningOrderAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

/// Read an [`EpisodeEvidence`] JSON document.
pub fn load_evidence(path: impl AsRef<Path>) -> AnalysisResult<EpisodeEvidence> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AnalysisError::FileNotFound(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path)?;
    let evidence: EpisodeEvidence = serde_json::from_str(&raw)?;
    if evidence.episode_id.trim().is_empty() {
        return Err(AnalysisError::invalid_evidence("episode_id must not be empty"));
    }
    Ok(evidence)
}
