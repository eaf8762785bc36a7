//! Segment boundary detection around the resolved highlights.

pub mod end;
pub mod keywords;
pub mod start;

pub use end::{EndDecision, MatchEndDetector};
pub use keywords::CoOccurrence;
pub use start::{MatchStartDetector, StartDecision};
