use tracing::debug;

use crate::error::{CuesyncError, Result};

/// Per-frame RMS amplitude of one audio channel, with the valleys
/// (local minima) detected in it.
///
/// An envelope is built once per audio source and never edited; a new
/// source produces a new envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    values: Vec<f32>,
    frame_duration: f64,
    valleys: Vec<usize>,
}

impl Envelope {
    /// Build an envelope from channel samples using non-overlapping frames
    /// of `window_size` samples. The last frame may be shorter.
    pub fn analyze(samples: &[f32], sample_rate: u32, window_size: usize) -> Result<Self> {
        if sample_rate == 0 {
            return Err(CuesyncError::InvalidAudio(
                "sample rate must be greater than 0".to_string(),
            ));
        }
        if window_size == 0 {
            return Err(CuesyncError::InvalidAudio(
                "window size must be greater than 0".to_string(),
            ));
        }

        let values = compute_rms_frames(samples, window_size);
        let frame_duration = window_size as f64 / sample_rate as f64;

        debug!(
            "Envelope: {} frames of {:.4}s from {} samples",
            values.len(),
            frame_duration,
            samples.len()
        );

        Ok(Self::from_values(values, frame_duration))
    }

    /// Wrap precomputed frame values and detect their valleys.
    pub fn from_values(values: Vec<f32>, frame_duration: f64) -> Self {
        let valleys = detect_valleys(&values);
        Self {
            values,
            frame_duration,
            valleys,
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Seconds covered by one frame.
    pub fn frame_duration(&self) -> f64 {
        self.frame_duration
    }

    /// Frame indices of valleys, ascending.
    pub fn valleys(&self) -> &[usize] {
        &self.valleys
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Total seconds covered by all frames.
    pub fn duration(&self) -> f64 {
        self.values.len() as f64 * self.frame_duration
    }

    /// Frame index containing `time`, which may lie past the last frame.
    pub fn frame_at(&self, time: f64) -> f64 {
        (time / self.frame_duration).floor()
    }

    /// Whether navigation and waveforms can use this envelope.
    pub fn is_usable(&self) -> bool {
        self.frame_duration.is_finite() && self.frame_duration > 0.0
    }
}

/// Calculate RMS (Root Mean Square) of a sample frame.
fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f64 = samples
        .iter()
        .map(|&s| {
            let s = s as f64;
            s * s
        })
        .sum();

    (sum_squares / samples.len() as f64).sqrt() as f32
}

fn compute_rms_frames(samples: &[f32], window_size: usize) -> Vec<f32> {
    samples.chunks(window_size).map(calculate_rms).collect()
}

/// Indices `i` in `1..len-1` with `env[i] < env[i-1]` and `env[i] <= env[i+1]`.
fn detect_valleys(envelope: &[f32]) -> Vec<usize> {
    if envelope.len() < 3 {
        return Vec::new();
    }

    (1..envelope.len() - 1)
        .filter(|&i| envelope[i] < envelope[i - 1] && envelope[i] <= envelope[i + 1])
        .collect()
}
