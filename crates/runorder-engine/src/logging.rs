//! Structured episode logging utilities.
//!
//! Provides consistent, structured logging for analysis runs with tracing
//! spans and contextual information (episode ID, pipeline stage).

use tracing::{info, warn, Span};

/// Episode logger for structured logging with consistent formatting.
#[derive(Debug, Clone)]
pub struct EpisodeLogger {
    episode_id: String,
    stage: String,
}

impl EpisodeLogger {
    /// Create a new logger for an episode and pipeline stage
    /// (e.g. "normalize", "consensus", "match_end").
    pub fn new(episode_id: &str, stage: &str) -> Self {
        Self {
            episode_id: episode_id.to_string(),
            stage: stage.to_string(),
        }
    }

    /// Same episode, different stage.
    pub fn for_stage(&self, stage: &str) -> Self {
        Self::new(&self.episode_id, stage)
    }

    pub fn log_start(&self, message: &str) {
        info!(
            episode_id = %self.episode_id,
            stage = %self.stage,
            "Stage started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            episode_id = %self.episode_id,
            stage = %self.stage,
            "Stage progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            episode_id = %self.episode_id,
            stage = %self.stage,
            "Stage warning: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            episode_id = %self.episode_id,
            stage = %self.stage,
            "Stage completed: {}", message
        );
    }

    pub fn episode_id(&self) -> &str {
        &self.episode_id
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    /// Create a tracing span covering a whole analysis run.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "episode_analysis",
            episode_id = %self.episode_id,
            stage = %self.stage
        )
    }
}
