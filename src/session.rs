use crate::audio::{analyze_media, decoder_for};
use crate::config::Config;
use crate::editor::Editor;
use crate::error::{CuesyncError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Statistics gathered while opening a session.
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    /// Number of cues parsed from the subtitle file.
    pub cue_count: usize,
    /// Time spent decoding and analysing audio.
    pub analysis_time: Duration,
    /// Envelope frames, if analysis succeeded.
    pub envelope_frames: Option<usize>,
    /// Detected valleys, if analysis succeeded.
    pub valley_count: Option<usize>,
    /// Seconds of audio covered by the envelope.
    pub audio_duration: Option<f64>,
}

/// A subtitle file opened for editing, with its media's analysis.
#[derive(Debug)]
pub struct Session {
    pub editor: Editor,
    pub subtitles_path: PathBuf,
    pub media_path: Option<PathBuf>,
    pub stats: SessionStats,
}

impl Session {
    /// Write the edited cues as VTT.
    pub fn save(&self, output: &Path) -> Result<()> {
        fs::write(output, self.editor.to_vtt())?;
        info!("Wrote {} cues to {}", self.editor.len(), output.display());
        Ok(())
    }

    /// Export path used when none is given.
    pub fn default_output_path(&self) -> PathBuf {
        derive_output_path(&self.subtitles_path)
    }
}

/// Open `subtitles` for editing and, if given, analyse `media`.
///
/// Audio problems never fail the session; they leave it without an
/// envelope so valley snapping and waveforms are unavailable.
pub async fn open_session(
    config: &Config,
    subtitles: &Path,
    media: Option<&Path>,
    show_progress: bool,
) -> Result<Session> {
    if !subtitles.exists() {
        return Err(CuesyncError::FileNotFound(subtitles.display().to_string()));
    }

    let text = fs::read_to_string(subtitles)?;
    let mut editor = Editor::from_vtt(&text);
    info!("Loaded {} cues from {}", editor.len(), subtitles.display());

    let mut stats = SessionStats {
        cue_count: editor.len(),
        ..Default::default()
    };

    if let Some(media) = media {
        let analysis_start = Instant::now();
        attach_media(&mut editor, media, config.window_size, show_progress).await;
        stats.analysis_time = analysis_start.elapsed();

        if let Some(envelope) = editor.envelope() {
            stats.envelope_frames = Some(envelope.len());
            stats.valley_count = Some(envelope.valleys().len());
            stats.audio_duration = Some(envelope.duration());
        }
    }

    Ok(Session {
        editor,
        subtitles_path: subtitles.to_path_buf(),
        media_path: media.map(Path::to_path_buf),
        stats,
    })
}

/// Decode and analyse `media`, installing the envelope into `editor`.
///
/// Returns whether an envelope was installed.
pub async fn attach_media(
    editor: &mut Editor,
    media: &Path,
    window_size: usize,
    show_progress: bool,
) -> bool {
    let ticket = editor.begin_analysis();
    let decoder = decoder_for(media);

    let spinner = show_progress.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Analysing audio of {}...", media.display()));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let result = analyze_media(decoder.as_ref(), media, window_size).await;

    match result {
        Ok(envelope) => {
            let frames = envelope.len();
            let valleys = envelope.valleys().len();
            let installed = editor.install_envelope(ticket, envelope);
            if let Some(pb) = spinner {
                pb.finish_with_message(format!(
                    "✓ Audio analysed ({} frames, {} valleys)",
                    frames, valleys
                ));
            }
            installed
        }
        Err(e) => {
            if let Some(pb) = spinner {
                pb.finish_with_message("✗ Audio analysis failed");
            }
            warn!("Audio analysis failed: {e}; waveform/snap unavailable");
            false
        }
    }
}

/// `<dir>/<stem>.adjusted.vtt` next to the input subtitles.
pub fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let mut output = input.to_path_buf();
    output.set_file_name(format!("{}.adjusted.vtt", stem.to_string_lossy()));
    debug!("Derived output path {}", output.display());
    output
}

/// Print a summary of an opened session.
pub fn print_summary(session: &Session) {
    let stats = &session.stats;
    println!();
    println!("  Subtitles:  {}", session.subtitles_path.display());
    println!("  Cues:       {}", stats.cue_count);
    if let Some(media) = &session.media_path {
        println!("  Media:      {}", media.display());
        match (stats.envelope_frames, stats.valley_count, stats.audio_duration) {
            (Some(frames), Some(valleys), Some(duration)) => {
                println!("  Audio:      {:.1}s, {} frames, {} valleys", duration, frames, valleys);
                println!("  Analysis:   {:.2}s", stats.analysis_time.as_secs_f64());
            }
            _ => println!("  Audio:      unavailable (waveform/snap disabled)"),
        }
    }
    println!();
}
