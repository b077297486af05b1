//! Cue editing engine.
//!
//! [`Editor`] owns the cue sequence and the audio analysis of the current
//! media. Every timing operation is total: out-of-order boundaries are
//! clamped (the violated edge moves exactly onto the other one), never
//! rejected, so `start <= end` holds after any call.

pub mod commands;
pub mod view;

pub use commands::{command_for_key, dispatch, Command, Outcome, PlaybackRequest};
pub use view::{build_view, CueView, EditorView, WaveformView};

use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::audio::{
    AnalysisTicket, AudioAnalysis, CueWaveform, Envelope, ValleyNavigator, WaveformSegmentBuilder,
};
use crate::error::{CuesyncError, Result};
use crate::subtitle::{self, Cue};

/// Position of a cue in the editor's sequence.
///
/// The editor never inserts, removes or reorders cues, so a handle stays
/// valid for the editor's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CueHandle(pub usize);

impl fmt::Display for CueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0 + 1)
    }
}

#[derive(Debug, Default, Clone)]
pub struct Editor {
    cues: Vec<Cue>,
    analysis: AudioAnalysis,
    selection: Option<CueHandle>,
}

impl Editor {
    pub fn new(cues: Vec<Cue>) -> Self {
        Self {
            cues,
            ..Default::default()
        }
    }

    pub fn from_vtt(text: &str) -> Self {
        Self::new(subtitle::parse(text))
    }

    pub fn to_vtt(&self) -> String {
        subtitle::serialize(&self.cues)
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = CueHandle> {
        (0..self.cues.len()).map(CueHandle)
    }

    pub fn cue(&self, handle: CueHandle) -> Result<&Cue> {
        self.cues
            .get(handle.0)
            .ok_or(CuesyncError::UnknownCue(handle.0))
    }

    fn cue_mut(&mut self, handle: CueHandle) -> Result<&mut Cue> {
        self.cues
            .get_mut(handle.0)
            .ok_or(CuesyncError::UnknownCue(handle.0))
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    pub fn selection(&self) -> Option<CueHandle> {
        self.selection
    }

    pub fn select(&mut self, handle: CueHandle) -> Result<()> {
        self.cue(handle)?;
        self.selection = Some(handle);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // ---------------------------------------------------------------------
    // Audio analysis
    // ---------------------------------------------------------------------

    /// Start analysing a new audio source. See [`AudioAnalysis::begin`].
    pub fn begin_analysis(&mut self) -> AnalysisTicket {
        self.analysis.begin()
    }

    /// Install a finished envelope if it belongs to the newest source.
    pub fn install_envelope(&mut self, ticket: AnalysisTicket, envelope: Envelope) -> bool {
        self.analysis.complete(ticket, envelope)
    }

    pub fn envelope(&self) -> Option<&Envelope> {
        self.analysis.envelope()
    }

    /// Whether valley snapping and waveforms are available.
    pub fn has_analysis(&self) -> bool {
        self.analysis.is_ready()
    }

    /// Valley frame indices of the current envelope; empty before analysis.
    pub fn valleys(&self) -> &[usize] {
        self.envelope().map(|e| e.valleys()).unwrap_or(&[])
    }

    pub fn navigator(&self) -> ValleyNavigator<'_> {
        ValleyNavigator::new(self.envelope())
    }

    /// Waveform segments around a cue, or `None` before analysis.
    pub fn waveform(
        &self,
        handle: CueHandle,
        builder: &WaveformSegmentBuilder,
    ) -> Result<Option<CueWaveform<'_>>> {
        let cue = self.cue(handle)?;
        Ok(self
            .envelope()
            .and_then(|envelope| builder.build(envelope, cue.start, cue.end)))
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Move the start to `time`, pulling the end along if it is overtaken.
    pub fn set_start_to_time(&mut self, handle: CueHandle, time: f64) -> Result<&Cue> {
        let time = playhead_time(time);
        let cue = self.cue_mut(handle)?;
        cue.start = time;
        if cue.start > cue.end {
            cue.end = cue.start;
        }
        debug!("{} start set to {:.3}", handle, cue.start);
        Ok(cue)
    }

    /// Move the end to `time`, pulling the start along if it is overtaken.
    pub fn set_end_to_time(&mut self, handle: CueHandle, time: f64) -> Result<&Cue> {
        let time = playhead_time(time);
        let cue = self.cue_mut(handle)?;
        cue.end = time;
        if cue.end < cue.start {
            cue.start = cue.end;
        }
        debug!("{} end set to {:.3}", handle, cue.end);
        Ok(cue)
    }

    pub fn nudge_start(&mut self, handle: CueHandle, delta: f64) -> Result<&Cue> {
        let cue = self.cue_mut(handle)?;
        if delta.is_finite() {
            cue.start = (cue.start + delta).max(0.0);
            if cue.start > cue.end {
                cue.end = cue.start;
            }
        }
        debug!("{} start nudged by {:+.3}", handle, delta);
        Ok(cue)
    }

    /// Move the end by `delta`; it never passes the start.
    pub fn nudge_end(&mut self, handle: CueHandle, delta: f64) -> Result<&Cue> {
        let cue = self.cue_mut(handle)?;
        if delta.is_finite() {
            cue.end = (cue.end + delta).max(cue.start);
        }
        debug!("{} end nudged by {:+.3}", handle, delta);
        Ok(cue)
    }

    /// Move the start back to the previous pause, pulling the end along if
    /// the cue was inverted. No-op without analysis.
    pub fn extend_start_backward(&mut self, handle: CueHandle) -> Result<&Cue> {
        let start = self.cue(handle)?.start;
        let time = self.navigator().prev_valley_time(start);
        let cue = self.cue_mut(handle)?;
        cue.start = time;
        if cue.start > cue.end {
            cue.end = cue.start;
        }
        debug!("{} start extended to {:.3}", handle, time);
        Ok(cue)
    }

    /// Move the end forward to the next pause, pulling the start along if
    /// the cue was inverted. No-op without analysis.
    pub fn extend_end_forward(&mut self, handle: CueHandle) -> Result<&Cue> {
        let end = self.cue(handle)?.end;
        let time = self.navigator().next_valley_time(end);
        let cue = self.cue_mut(handle)?;
        cue.end = time;
        if cue.end < cue.start {
            cue.start = cue.end;
        }
        debug!("{} end extended to {:.3}", handle, time);
        Ok(cue)
    }

    pub fn set_text(&mut self, handle: CueHandle, text: impl Into<String>) -> Result<&Cue> {
        let cue = self.cue_mut(handle)?;
        cue.text = text.into();
        Ok(cue)
    }
}

/// Playhead positions are never negative.
fn playhead_time(time: f64) -> f64 {
    if time.is_finite() && time > 0.0 {
        time
    } else {
        0.0
    }
}
