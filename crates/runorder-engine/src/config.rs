//! Configuration for running-order analysis.
//!
//! These parameters control tolerances, look-back windows, default segment
//! durations, confidence factors and the keyword lexicons used by the
//! interlude and table-review detectors. Defaults are tuned for a weekend
//! highlights programme with six to eight matches.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// How an interlude keyword hit is corroborated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterludeValidation {
    /// The current match's teams must not be mentioned after the keyword.
    #[default]
    TeamAbsence,

    /// Team absence, and no scoreboard or full-time graphic of the current
    /// match may appear after the keyword.
    TeamAndGraphicAbsence,
}

impl FromStr for InterludeValidation {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "team_absence" | "team" => Ok(Self::TeamAbsence),
            "team_and_graphic_absence" | "graphic" => Ok(Self::TeamAndGraphicAbsence),
            other => Err(AnalysisError::invalid_config(format!(
                "unknown interlude validation mode: {}",
                other
            ))),
        }
    }
}

/// Editorial keyword lists. Entries are matched as whole words or phrases
/// after case and punctuation normalisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordLexicon {
    /// Scheduling markers for a secondary programme (day-of-week etc.)
    pub secondary_programme: Vec<String>,

    /// Names of the secondary programme
    pub programme_names: Vec<String>,

    /// Words that name the league table
    pub table_keywords: Vec<String>,

    /// Modifiers that qualify a table mention as a table review
    pub table_modifiers: Vec<String>,
}

impl Default for KeywordLexicon {
    fn default() -> Self {
        fn words(list: &[&str]) -> Vec<String> {
            list.iter().map(|w| w.to_string()).collect()
        }

        Self {
            secondary_programme: words(&[
                "monday",
                "tuesday",
                "wednesday",
                "thursday",
                "friday",
                "saturday",
                "sunday",
                "tomorrow",
                "tomorrow night",
            ]),
            programme_names: words(&[
                "match of the day 2",
                "match of the day two",
                "motd2",
                "motd 2",
                "football focus",
                "final score",
            ]),
            table_keywords: words(&["table", "standings"]),
            table_modifiers: words(&[
                "look",
                "league",
                "quick",
                "premier league",
                "championship",
            ]),
        }
    }
}

/// Configuration for a running-order analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// OCR events below this engine confidence are dropped (0.0-1.0).
    pub min_recognition_confidence: f64,

    /// Full-time graphics for the same pair closer than this collapse into
    /// one occurrence (seconds).
    pub ft_dedup_window_secs: f64,

    /// Two strategies reporting the same boundary agree if within this many
    /// seconds.
    pub boundary_tolerance_secs: f64,

    /// How far before `highlights_start` the studio intro may begin.
    pub max_intro_lookback_secs: f64,

    /// Studio intro length assumed when the transcript gives no evidence.
    pub default_studio_intro_secs: f64,

    /// Highlights length assumed when only one end was detected.
    pub default_highlights_secs: f64,

    /// Post-match analysis length assumed for inferred matches.
    pub default_post_match_secs: f64,

    /// Smallest span kept between two boundaries that must differ.
    pub min_boundary_gap_secs: f64,

    /// Confidence of a match corroborated by a single strategy.
    pub single_source_confidence: f64,

    /// Confidence of an inferred match.
    pub inferred_confidence: f64,

    /// Multiplier applied when the studio intro fell back to the default.
    pub ambiguous_start_penalty: f64,

    /// Multiplier applied when strategies disagreed on a boundary.
    pub boundary_conflict_penalty: f64,

    /// Jaro-Winkler similarity at which a transcript token counts as a
    /// misrecognised team token.
    pub fuzzy_similarity_threshold: f64,

    /// Mentions of other teams required to accept a table review.
    pub table_min_other_team_mentions: usize,

    pub interlude_validation: InterludeValidation,

    pub lexicon: KeywordLexicon,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_recognition_confidence: 0.3,
            ft_dedup_window_secs: 30.0,
            boundary_tolerance_secs: 5.0,
            max_intro_lookback_secs: 180.0,
            default_studio_intro_secs: 30.0,
            default_highlights_secs: 480.0,
            default_post_match_secs: 120.0,
            min_boundary_gap_secs: 1.0,
            single_source_confidence: 0.75,
            inferred_confidence: 0.3,
            ambiguous_start_penalty: 0.85,
            boundary_conflict_penalty: 0.9,
            fuzzy_similarity_threshold: 0.92,
            table_min_other_team_mentions: 2,
            interlude_validation: InterludeValidation::TeamAbsence,
            lexicon: KeywordLexicon::default(),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AnalysisConfig {
    /// Create config from environment variables (`RUNORDER_*`), loading a
    /// `.env` file first if present.
    pub fn from_env() -> AnalysisResult<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let interlude_validation = match std::env::var("RUNORDER_INTERLUDE_VALIDATION") {
            Ok(mode) => mode.parse()?,
            Err(_) => defaults.interlude_validation,
        };

        let config = Self {
            min_recognition_confidence: env_or(
                "RUNORDER_MIN_RECOGNITION_CONFIDENCE",
                defaults.min_recognition_confidence,
            ),
            ft_dedup_window_secs: env_or("RUNORDER_FT_DEDUP_WINDOW_SECS", defaults.ft_dedup_window_secs),
            boundary_tolerance_secs: env_or(
                "RUNORDER_BOUNDARY_TOLERANCE_SECS",
                defaults.boundary_tolerance_secs,
            ),
            max_intro_lookback_secs: env_or(
                "RUNORDER_MAX_INTRO_LOOKBACK_SECS",
                defaults.max_intro_lookback_secs,
            ),
            default_studio_intro_secs: env_or(
                "RUNORDER_DEFAULT_STUDIO_INTRO_SECS",
                defaults.default_studio_intro_secs,
            ),
            default_highlights_secs: env_or(
                "RUNORDER_DEFAULT_HIGHLIGHTS_SECS",
                defaults.default_highlights_secs,
            ),
            default_post_match_secs: env_or(
                "RUNORDER_DEFAULT_POST_MATCH_SECS",
                defaults.default_post_match_secs,
            ),
            table_min_other_team_mentions: env_or(
                "RUNORDER_TABLE_MIN_OTHER_TEAM_MENTIONS",
                defaults.table_min_other_team_mentions,
            ),
            interlude_validation,
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that every window is finite and non-negative and every factor
    /// lies in 0..=1.
    pub fn validate(&self) -> AnalysisResult<()> {
        let windows = [
            ("ft_dedup_window_secs", self.ft_dedup_window_secs),
            ("boundary_tolerance_secs", self.boundary_tolerance_secs),
            ("max_intro_lookback_secs", self.max_intro_lookback_secs),
            ("default_studio_intro_secs", self.default_studio_intro_secs),
            ("default_highlights_secs", self.default_highlights_secs),
            ("default_post_match_secs", self.default_post_match_secs),
            ("min_boundary_gap_secs", self.min_boundary_gap_secs),
        ];
        for (name, value) in windows {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalysisError::invalid_config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if self.min_boundary_gap_secs <= 0.0 {
            return Err(AnalysisError::invalid_config(
                "min_boundary_gap_secs must be positive",
            ));
        }

        let factors = [
            ("min_recognition_confidence", self.min_recognition_confidence),
            ("single_source_confidence", self.single_source_confidence),
            ("inferred_confidence", self.inferred_confidence),
            ("ambiguous_start_penalty", self.ambiguous_start_penalty),
            ("boundary_conflict_penalty", self.boundary_conflict_penalty),
            ("fuzzy_similarity_threshold", self.fuzzy_similarity_threshold),
        ];
        for (name, value) in factors {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnalysisError::invalid_config(format!(
                    "{} must be within 0..=1, got {}",
                    name, value
                )));
            }
        }

        let lexicon = &self.lexicon;
        if lexicon.secondary_programme.is_empty()
            || lexicon.programme_names.is_empty()
            || lexicon.table_keywords.is_empty()
            || lexicon.table_modifiers.is_empty()
        {
            return Err(AnalysisError::invalid_config("keyword lexicons must not be empty"));
        }

        Ok(())
    }

    /// Builder-style setter for the interlude validation mode.
    pub fn with_interlude_validation(mut self, mode: InterludeValidation) -> Self {
        self.interlude_validation = mode;
        self
    }

    /// Builder-style setter for the default studio intro length.
    pub fn with_default_studio_intro_secs(mut self, secs: f64) -> Self {
        self.default_studio_intro_secs = secs;
        self
    }

    /// Builder-style setter for the boundary agreement tolerance.
    pub fn with_boundary_tolerance_secs(mut self, secs: f64) -> Self {
        self.boundary_tolerance_secs = secs;
        self
    }

    /// Builder-style setter for the full-time graphic de-duplication window.
    pub fn with_ft_dedup_window_secs(mut self, secs: f64) -> Self {
        self.ft_dedup_window_secs = secs;
        self
    }

    /// Builder-style setter for the OCR confidence floor.
    pub fn with_min_recognition_confidence(mut self, confidence: f64) -> Self {
        self.min_recognition_confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Builder-style setter for the keyword lexicons.
    pub fn with_lexicon(mut self, lexicon: KeywordLexicon) -> Self {
        self.lexicon = lexicon;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.interlude_validation, InterludeValidation::TeamAbsence);
        assert_eq!(config.table_min_other_team_mentions, 2);
    }

    #[test]
    fn test_builder_pattern() {
        let config = AnalysisConfig::default()
            .with_default_studio_intro_secs(45.0)
            .with_interlude_validation(InterludeValidation::TeamAndGraphicAbsence)
            .with_min_recognition_confidence(1.7);

        assert_eq!(config.default_studio_intro_secs, 45.0);
        assert_eq!(
            config.interlude_validation,
            InterludeValidation::TeamAndGraphicAbsence
        );
        assert_eq!(config.min_recognition_confidence, 1.0);
    }

    #[test]
    fn test_validate_rejects_negative_window() {
        let config = AnalysisConfig::default().with_boundary_tolerance_secs(-1.0);
        assert!(matches!(config.validate(), Err(AnalysisError::InvalidConfig(_))));

        let config = AnalysisConfig::default().with_ft_dedup_window_secs(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_lexicon() {
        let mut lexicon = KeywordLexicon::default();
        lexicon.table_modifiers.clear();
        let config = AnalysisConfig::default().with_lexicon(lexicon);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_interlude_validation_parse() {
        assert_eq!(
            "graphic".parse::<InterludeValidation>().unwrap(),
            InterludeValidation::TeamAndGraphicAbsence
        );
        assert_eq!(
            "TEAM_ABSENCE".parse::<InterludeValidation>().unwrap(),
            InterludeValidation::TeamAbsence
        );
        assert!("never".parse::<InterludeValidation>().is_err());
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let json = serde_json::to_string(&AnalysisConfig::default()).unwrap();
        assert!(json.contains("\"interlude_validation\":\"team_absence\""));
        let parsed: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.lexicon.programme_names.len(), 6);
    }
}
