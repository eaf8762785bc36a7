//! Timestamp parsing and formatting utilities.
//!
//! Collaborators report times either as plain seconds or as clock strings
//! (`HH:MM:SS`, `HH:MM:SS.mmm`, `MM:SS`, `SS`). Everything inside the
//! analysis works in `f64` seconds.

use thiserror::Error;

/// Maximum reasonable episode duration (24 hours in seconds).
pub const MAX_EPISODE_DURATION_SECS: f64 = 86400.0;

/// Parse a timestamp string to total seconds.
///
/// # Examples
/// ```
/// use runorder_models::timestamp::parse_timestamp;
/// assert_eq!(parse_timestamp("01:30:00").unwrap(), 5400.0);
/// assert_eq!(parse_timestamp("05:30").unwrap(), 330.0);
/// assert_eq!(parse_timestamp("90").unwrap(), 90.0);
/// ```
pub fn parse_timestamp(ts: &str) -> Result<f64, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    let parts: Vec<&str> = ts.split(':').collect();
    if parts.len() > 3 {
        return Err(TimestampError::InvalidFormat(ts.to_string()));
    }

    const COMPONENTS: [&str; 3] = ["hours", "minutes", "seconds"];
    let offset = 3 - parts.len();
    let mut total = 0.0;
    for (i, part) in parts.iter().enumerate() {
        let component = COMPONENTS[offset + i];
        let value: f64 = part
            .parse()
            .map_err(|_| TimestampError::InvalidValue(component, part.to_string()))?;
        if value < 0.0 {
            return Err(TimestampError::Negative);
        }
        if !value.is_finite() {
            return Err(TimestampError::InvalidValue(component, part.to_string()));
        }
        total = total * 60.0 + value;
    }

    if total > MAX_EPISODE_DURATION_SECS {
        return Err(TimestampError::ExceedsMaxDuration(MAX_EPISODE_DURATION_SECS));
    }
    Ok(total)
}

/// Format seconds into HH:MM:SS or HH:MM:SS.mmm string.
pub fn format_seconds(total_secs: f64) -> String {
    let total_secs = total_secs.max(0.0);
    let hours = (total_secs / 3600.0).floor() as u32;
    let mins = ((total_secs % 3600.0) / 60.0).floor() as u32;
    let secs = total_secs % 60.0;

    if (secs - secs.floor()).abs() > 0.0001 {
        format!("{:02}:{:02}:{:06.3}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, mins, secs.floor() as u32)
    }
}

/// Timestamp parsing error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimestampError {
    #[error("Timestamp cannot be empty")]
    Empty,

    #[error("Timestamp cannot be negative")]
    Negative,

    #[error("Invalid {0} value: {1}")]
    InvalidValue(&'static str, String),

    #[error("Invalid timestamp format '{0}'. Use HH:MM:SS, HH:MM:SS.mmm, MM:SS, or SS")]
    InvalidFormat(String),

    #[error("Timestamp exceeds maximum allowed duration ({} hours)", .0 / 3600.0)]
    ExceedsMaxDuration(f64),
}

/// Serde helper accepting either a number of seconds or a clock string.
///
/// ```ignore
/// #[serde(deserialize_with = "runorder_models::timestamp::seconds::deserialize")]
/// pub timestamp: f64,
/// ```
pub mod seconds {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Clock(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Number(secs) => Ok(secs),
            Raw::Clock(s) => super::parse_timestamp(&s).map_err(serde::de::Error::custom),
        }
    }
}
