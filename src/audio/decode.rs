use std::path::{Path, PathBuf};
use std::process::Command;

use async_trait::async_trait;
use hound::{SampleFormat, WavReader};
use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::{CuesyncError, Result};

use super::DecodedAudio;

/// Turns a media file into channel-0 samples.
#[async_trait]
pub trait AudioDecoder: Send + Sync {
    async fn decode(&self, path: &Path) -> Result<DecodedAudio>;

    fn name(&self) -> &'static str;
}

/// Decodes WAV files directly.
pub struct WavDecoder;

#[async_trait]
impl AudioDecoder for WavDecoder {
    async fn decode(&self, path: &Path) -> Result<DecodedAudio> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || read_wav(&path))
            .await
            .map_err(|e| CuesyncError::AudioDecode(format!("Decode task failed: {e}")))?
    }

    fn name(&self) -> &'static str {
        "wav"
    }
}

/// Decodes any container FFmpeg understands by extracting its audio track
/// to a temporary WAV file.
pub struct FfmpegDecoder;

#[async_trait]
impl AudioDecoder for FfmpegDecoder {
    async fn decode(&self, path: &Path) -> Result<DecodedAudio> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || decode_with_ffmpeg(&path))
            .await
            .map_err(|e| CuesyncError::AudioDecode(format!("Decode task failed: {e}")))?
    }

    fn name(&self) -> &'static str {
        "ffmpeg"
    }
}

/// Pick a decoder for `path` by its extension.
pub fn decoder_for(path: &Path) -> Box<dyn AudioDecoder> {
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false);

    if is_wav {
        Box::new(WavDecoder)
    } else {
        Box::new(FfmpegDecoder)
    }
}

/// Check if FFmpeg is installed and accessible.
pub fn check_ffmpeg() -> Result<()> {
    let output = Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map_err(|e| {
            CuesyncError::AudioDecode(format!(
                "FFmpeg not found. Please install FFmpeg and ensure it's in your PATH. Error: {e}"
            ))
        })?;

    if !output.status.success() {
        return Err(CuesyncError::AudioDecode("FFmpeg check failed".to_string()));
    }

    debug!("FFmpeg is available");
    Ok(())
}

/// Read channel 0 of a WAV file as samples in [-1, 1].
pub fn read_wav(path: &Path) -> Result<DecodedAudio> {
    if !path.exists() {
        return Err(CuesyncError::FileNotFound(path.display().to_string()));
    }

    let reader = WavReader::open(path)
        .map_err(|e| CuesyncError::AudioDecode(format!("Failed to open WAV file: {e}")))?;

    let spec = reader.spec();
    let channels = spec.channels.max(1);

    debug!(
        "WAV: {} Hz, {} channels, {} bits",
        spec.sample_rate, spec.channels, spec.bits_per_sample
    );

    let samples: std::result::Result<Vec<f32>, hound::Error> = match spec.sample_format {
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            reader
                .into_samples::<i32>()
                .step_by(channels as usize)
                .map(|s| s.map(|v| v as f32 / scale))
                .collect()
        }
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .step_by(channels as usize)
            .collect(),
    };

    let samples = samples
        .map_err(|e| CuesyncError::AudioDecode(format!("Failed to read WAV samples: {e}")))?;

    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate,
        channels,
    })
}

fn decode_with_ffmpeg(input: &Path) -> Result<DecodedAudio> {
    if !input.exists() {
        return Err(CuesyncError::FileNotFound(input.display().to_string()));
    }

    check_ffmpeg()?;

    let temp_dir = TempDir::new()?;
    let wav_path: PathBuf = temp_dir.path().join("audio.wav");

    info!("Extracting audio track from {}", input.display());

    // Channel layout and sample rate are left as-is; only channel 0 is read.
    let status = Command::new("ffmpeg")
        .args(["-y", "-v", "error", "-i"])
        .arg(input)
        .args(["-vn", "-acodec", "pcm_s16le"])
        .arg(&wav_path)
        .status()
        .map_err(|e| CuesyncError::AudioDecode(format!("Failed to run FFmpeg: {e}")))?;

    if !status.success() {
        return Err(CuesyncError::AudioDecode(
            "FFmpeg audio extraction failed".to_string(),
        ));
    }

    if !wav_path.exists() {
        return Err(CuesyncError::AudioDecode(
            "Output file was not created".to_string(),
        ));
    }

    read_wav(&wav_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};

    fn write_wav(path: &Path, spec: WavSpec, frames: &[Vec<i16>]) {
        let mut writer = WavWriter::create(path, spec).unwrap();
        for frame in frames {
            for &s in frame {
                writer.write_sample(s).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_read_wav_mono() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mono.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        write_wav(&path, spec, &[vec![0], vec![16384], vec![-32768]]);

        let audio = read_wav(&path).unwrap();
        assert_eq!(audio.sample_rate, 8000);
        assert_eq!(audio.channels, 1);
        assert_eq!(audio.samples, vec![0.0, 0.5, -1.0]);
    }

    #[test]
    fn test_read_wav_takes_first_channel() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        write_wav(
            &path,
            spec,
            &[vec![16384, 0], vec![0, 16384], vec![-16384, 0]],
        );

        let audio = read_wav(&path).unwrap();
        assert_eq!(audio.channels, 2);
        assert_eq!(audio.samples, vec![0.5, 0.0, -0.5]);
    }

    #[test]
    fn test_read_wav_float() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("float.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(0.25f32).unwrap();
        writer.write_sample(-0.75f32).unwrap();
        writer.finalize().unwrap();

        let audio = read_wav(&path).unwrap();
        assert_eq!(audio.samples, vec![0.25, -0.75]);
    }

    #[test]
    fn test_read_wav_missing_file() {
        let result = read_wav(Path::new("/nonexistent/audio.wav"));
        match result {
            Err(CuesyncError::FileNotFound(path)) => assert!(path.contains("nonexistent")),
            other => panic!("Expected FileNotFound, got: {other:?}"),
        }
    }

    #[test]
    fn test_read_wav_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.wav");
        std::fs::write(&path, b"not a wav file").unwrap();

        assert!(matches!(read_wav(&path), Err(CuesyncError::AudioDecode(_))));
    }

    #[test]
    fn test_decoder_for_extension() {
        assert_eq!(decoder_for(Path::new("clip.wav")).name(), "wav");
        assert_eq!(decoder_for(Path::new("clip.WAV")).name(), "wav");
        assert_eq!(decoder_for(Path::new("movie.mp4")).name(), "ffmpeg");
        assert_eq!(decoder_for(Path::new("noext")).name(), "ffmpeg");
    }

    #[tokio::test]
    async fn test_wav_decoder_async() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mono.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        write_wav(&path, spec, &vec![vec![0]; 100]);

        let audio = WavDecoder.decode(&path).await.unwrap();
        assert_eq!(audio.samples.len(), 100);
    }

    #[tokio::test]
    async fn test_ffmpeg_decoder_missing_input() {
        let result = FfmpegDecoder.decode(Path::new("/nonexistent/movie.mp4")).await;
        assert!(matches!(result, Err(CuesyncError::FileNotFound(_))));
    }
}
