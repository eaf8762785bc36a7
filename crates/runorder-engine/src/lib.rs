//! Running-order analysis for football highlights episodes.
//!
//! This crate provides:
//! - Evidence normalisation with strict and fuzzy team matching
//! - Scoreboard and full-time-graphic ordering strategies
//! - Consensus resolution across strategies, with missing-fixture inference
//! - Studio intro, interlude and table-review boundary detection
//! - Result assembly with invariant checks and chapter export
//! - Structured logging and metrics

pub mod analyzer;
pub mod assembler;
pub mod boundaries;
pub mod config;
pub mod consensus;
pub mod error;
pub mod logging;
pub mod matching;
pub mod metrics;
pub mod normalizer;
pub mod strategy;

pub use analyzer::{load_evidence, RunningOrderAnalyzer};
pub use config::{AnalysisConfig, InterludeValidation, KeywordLexicon};
pub use consensus::{Consensus, ConsensusResolver, ResolvedMatch};
pub use error::{AnalysisError, AnalysisResult};
pub use logging::EpisodeLogger;
pub use matching::{FuzzyMatcher, MatchDiscipline, StrictMatcher, TeamMatcher};
pub use normalizer::{EvidenceNormalizer, NormalizedEvidence};
pub use strategy::{default_strategies, FullTimeGraphicStrategy, OrderingStrategy, ScoreboardStrategy};
