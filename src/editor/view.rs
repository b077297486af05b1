use serde::Serialize;

use super::{CueHandle, Editor};
use crate::audio::{CueWaveform, WaveformSegmentBuilder};
use crate::subtitle::format_time;

/// Warning shown while no envelope is available.
pub const ANALYSIS_UNAVAILABLE: &str = "waveform/snap unavailable: no audio analysis";

/// Snapshot of everything a front end draws.
#[derive(Debug, Clone, Serialize)]
pub struct EditorView {
    pub cues: Vec<CueView>,
    pub selected: Option<CueHandle>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CueView {
    pub handle: CueHandle,
    pub id: String,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    pub start_label: String,
    pub end_label: String,
    pub text: String,
    pub selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waveform: Option<WaveformView>,
}

/// SVG path data for the three waveform segments of a cue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveformView {
    pub prior: String,
    pub current: String,
    pub next: String,
}

impl From<CueWaveform<'_>> for WaveformView {
    fn from(waveform: CueWaveform<'_>) -> Self {
        Self {
            prior: waveform.prior.to_svg_path(),
            current: waveform.current.to_svg_path(),
            next: waveform.next.to_svg_path(),
        }
    }
}

/// Build the view from the editor's current state.
///
/// Rebuilding without an intervening mutation yields an identical view.
pub fn build_view(editor: &Editor, context_window: f64) -> EditorView {
    let builder = WaveformSegmentBuilder::new(context_window);
    let envelope = editor.envelope();
    let selected = editor.selection();

    let cues = editor
        .handles()
        .zip(editor.cues())
        .map(|(handle, cue)| CueView {
            handle,
            id: cue.id.to_string(),
            start: cue.start,
            end: cue.end,
            duration: cue.duration(),
            start_label: format_time(cue.start),
            end_label: format_time(cue.end),
            text: cue.text.clone(),
            selected: selected == Some(handle),
            waveform: envelope
                .and_then(|e| builder.build(e, cue.start, cue.end))
                .map(WaveformView::from),
        })
        .collect();

    let mut warnings = Vec::new();
    if !editor.has_analysis() {
        warnings.push(ANALYSIS_UNAVAILABLE.to_string());
    }

    EditorView {
        cues,
        selected,
        warnings,
    }
}
