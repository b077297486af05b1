pub mod analysis;
pub mod decode;
pub mod envelope;
pub mod navigator;
pub mod waveform;

pub use analysis::{analyze_media, AnalysisTicket, AudioAnalysis};
pub use decode::{check_ffmpeg, decoder_for, read_wav, AudioDecoder, FfmpegDecoder, WavDecoder};
pub use envelope::Envelope;
pub use navigator::ValleyNavigator;
pub use waveform::{CueWaveform, Point, WaveformSegment, WaveformSegmentBuilder};

use std::time::Duration;

/// One channel of decoded audio.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Samples of the first channel, nominally in [-1, 1].
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    /// Channel count of the source.
    pub channels: u16,
}

impl DecodedAudio {
    /// Get the duration of the decoded audio.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}
