//! Detection source definitions.
//!
//! A detection source is the provenance tag recorded on every match:
//!
//! - `Scoreboard`: live scoreboard text recognised during match footage
//! - `FullTimeGraphic`: the full-time result graphic (rare, high precision)
//! - `Transcript`: a studio mention located the introduction
//! - `Inferred`: fixture deduced from the roster, no direct detection

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Signal kind that corroborated a match identity or boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    Scoreboard,
    FullTimeGraphic,
    Transcript,
    Inferred,
}

impl DetectionSource {
    /// All detection sources.
    pub const ALL: &'static [DetectionSource] = &[
        DetectionSource::Scoreboard,
        DetectionSource::FullTimeGraphic,
        DetectionSource::Transcript,
        DetectionSource::Inferred,
    ];

    /// Returns the source name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionSource::Scoreboard => "scoreboard",
            DetectionSource::FullTimeGraphic => "full_time_graphic",
            DetectionSource::Transcript => "transcript",
            DetectionSource::Inferred => "inferred",
        }
    }

    /// Historical precision rank used to settle boundary conflicts
    /// (higher wins).
    pub fn precision_rank(&self) -> u8 {
        match self {
            DetectionSource::Inferred => 0,
            DetectionSource::Transcript => 1,
            DetectionSource::Scoreboard => 2,
            DetectionSource::FullTimeGraphic => 3,
        }
    }

    /// Returns true if this source comes from on-screen graphics.
    pub fn is_graphic(&self) -> bool {
        matches!(self, DetectionSource::Scoreboard | DetectionSource::FullTimeGraphic)
    }
}

impl fmt::Display for DetectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DetectionSource {
    type Err = DetectionSourceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scoreboard" => Ok(DetectionSource::Scoreboard),
            "full_time_graphic" | "full_time" | "ft" => Ok(DetectionSource::FullTimeGraphic),
            "transcript" => Ok(DetectionSource::Transcript),
            "inferred" => Ok(DetectionSource::Inferred),
            _ => Err(DetectionSourceParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown detection source: {0}")]
pub struct DetectionSourceParseError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parse() {
        assert_eq!("scoreboard".parse::<DetectionSource>().unwrap(), DetectionSource::Scoreboard);
        assert_eq!("FT".parse::<DetectionSource>().unwrap(), DetectionSource::FullTimeGraphic);
        assert_eq!("inferred".parse::<DetectionSource>().unwrap(), DetectionSource::Inferred);
        assert!("ocr".parse::<DetectionSource>().is_err());
    }

    #[test]
    fn test_source_display_roundtrips_serde_name() {
        for source in DetectionSource::ALL {
            let json = serde_json::to_string(source).unwrap();
            assert_eq!(json, format!("\"{}\"", source));
        }
    }

    #[test]
    fn test_precision_order() {
        assert!(
            DetectionSource::FullTimeGraphic.precision_rank()
                > DetectionSource::Scoreboard.precision_rank()
        );
        assert!(DetectionSource::Scoreboard.is_graphic());
        assert!(!DetectionSource::Inferred.is_graphic());
    }
}
