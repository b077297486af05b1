pub mod vtt;

pub use vtt::{format_time, parse, parse_time, serialize};

use serde::Serialize;
use std::fmt;

/// Identifier carried by a cue in the subtitle file.
///
/// Cues with an id line keep that line verbatim; cues without one are
/// numbered by their position at parse time. Ids are labels only and may
/// repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CueId {
    Explicit(String),
    Positional(usize),
}

impl fmt::Display for CueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CueId::Explicit(id) => write!(f, "{}", id),
            CueId::Positional(n) => write!(f, "{}", n),
        }
    }
}

/// A timed subtitle entry. Times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cue {
    pub id: CueId,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Cue {
    pub fn new(id: CueId, start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            id,
            start,
            end,
            text: text.into(),
        }
    }

    /// Length of the cue in seconds.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Timing and text equality, ignoring the id.
    pub fn same_timing_and_text(&self, other: &Cue) -> bool {
        self.start == other.start && self.end == other.end && self.text == other.text
    }
}
