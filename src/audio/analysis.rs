use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{CuesyncError, Result};

use super::decode::AudioDecoder;
use super::Envelope;

/// Proof that an analysis was started; only the newest ticket may install
/// its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket(u64);

/// Holds the envelope of the current audio source, if analysis has
/// finished.
///
/// Results are swapped in whole. A result arriving for a source that has
/// since been replaced is dropped.
#[derive(Debug, Default, Clone)]
pub struct AudioAnalysis {
    envelope: Option<Arc<Envelope>>,
    generation: u64,
}

impl AudioAnalysis {
    /// Start analysing a new source. Earlier tickets become stale.
    pub fn begin(&mut self) -> AnalysisTicket {
        self.generation += 1;
        debug!("Audio analysis generation {}", self.generation);
        AnalysisTicket(self.generation)
    }

    /// Install `envelope` if `ticket` is still current. Returns whether it
    /// was installed.
    pub fn complete(&mut self, ticket: AnalysisTicket, envelope: Envelope) -> bool {
        if ticket.0 != self.generation {
            warn!(
                "Discarding stale audio analysis (generation {}, current {})",
                ticket.0, self.generation
            );
            return false;
        }

        info!(
            "Audio analysis ready: {} frames, {} valleys",
            envelope.len(),
            envelope.valleys().len()
        );
        self.envelope = Some(Arc::new(envelope));
        true
    }

    pub fn envelope(&self) -> Option<&Envelope> {
        self.envelope.as_deref()
    }

    pub fn is_ready(&self) -> bool {
        self.envelope.is_some()
    }
}

/// Decode `path` and build its envelope.
pub async fn analyze_media(
    decoder: &dyn AudioDecoder,
    path: &Path,
    window_size: usize,
) -> Result<Envelope> {
    info!("Decoding audio from {} ({})", path.display(), decoder.name());
    let audio = decoder.decode(path).await?;

    debug!(
        "Decoded {} samples at {} Hz ({} channels, {:.2}s)",
        audio.samples.len(),
        audio.sample_rate,
        audio.channels,
        audio.duration().as_secs_f64()
    );

    let sample_rate = audio.sample_rate;
    tokio::task::spawn_blocking(move || Envelope::analyze(&audio.samples, sample_rate, window_size))
        .await
        .map_err(|e| CuesyncError::AudioDecode(format!("Analysis task failed: {e}")))?
}
