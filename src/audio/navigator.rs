use super::Envelope;

/// Finds the valley times nearest to a cue boundary.
///
/// Without a usable envelope every query returns its input unchanged, so
/// callers never branch on whether audio analysis has finished.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValleyNavigator<'a> {
    envelope: Option<&'a Envelope>,
}

impl<'a> ValleyNavigator<'a> {
    pub fn new(envelope: Option<&'a Envelope>) -> Self {
        Self {
            envelope: envelope.filter(|e| e.is_usable()),
        }
    }

    /// Time of the first valley whose frame lies after the frame holding
    /// `after_time`, or `after_time` if there is none.
    pub fn next_valley_time(&self, after_time: f64) -> f64 {
        let Some(envelope) = self.envelope else {
            return after_time;
        };

        let start_index = envelope.frame_at(after_time);
        envelope
            .valleys()
            .iter()
            .find(|&&i| i as f64 > start_index)
            .map(|&i| i as f64 * envelope.frame_duration())
            .unwrap_or(after_time)
    }

    /// Time of the last valley that is both earlier than `before_time` and
    /// in an earlier frame, or `before_time` if there is none.
    pub fn prev_valley_time(&self, before_time: f64) -> f64 {
        let Some(envelope) = self.envelope else {
            return before_time;
        };

        let start_index = envelope.frame_at(before_time);
        let frame_duration = envelope.frame_duration();
        envelope
            .valleys()
            .iter()
            .rev()
            .map(|&i| (i, i as f64 * frame_duration))
            .find(|&(i, time)| time < before_time && (i as f64) < start_index)
            .map(|(_, time)| time)
            .unwrap_or(before_time)
    }
}
