//! Drawable amplitude data around a single cue.
//!
//! A cue's waveform is split into three segments: the context before the
//! cue, the cue body, and the context after it. Each segment receives a
//! share of the canvas width proportional to the time it actually covers,
//! and each is normalized to its own peak so quiet cues still fill the
//! full height.

use super::Envelope;
use crate::config::DEFAULT_CONTEXT_WINDOW;

/// Nominal canvas width in drawing units.
pub const CANVAS_WIDTH: f64 = 100.0;

/// Nominal canvas height in drawing units.
pub const CANVAS_HEIGHT: f64 = 40.0;

/// Blank space kept above and below the trace.
pub const CANVAS_PADDING: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One slice of the envelope mapped onto a horizontal span of the canvas.
#[derive(Debug, Clone, Copy)]
pub struct WaveformSegment<'a> {
    values: &'a [f32],
    x_start: f64,
    x_end: f64,
}

impl<'a> WaveformSegment<'a> {
    pub fn values(&self) -> &'a [f32] {
        self.values
    }

    /// Horizontal span allotted to this segment.
    pub fn x_range(&self) -> (f64, f64) {
        (self.x_start, self.x_end)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Canvas points, one per envelope frame, computed on demand.
    pub fn points(&self) -> impl Iterator<Item = Point> + 'a {
        let peak = self.values.iter().copied().fold(0.0f32, f32::max);
        let peak = if peak > 0.0 { peak as f64 } else { 1.0 };
        let dx = if self.values.len() > 1 {
            (self.x_end - self.x_start) / (self.values.len() - 1) as f64
        } else {
            0.0
        };
        let x_start = self.x_start;
        let drawable = CANVAS_HEIGHT - 2.0 * CANVAS_PADDING;

        self.values.iter().enumerate().map(move |(idx, &v)| {
            let norm = v as f64 / peak;
            Point {
                x: x_start + dx * idx as f64,
                y: CANVAS_HEIGHT - norm * drawable - CANVAS_PADDING,
            }
        })
    }

    /// SVG path data (`M x y L x y ...`), empty for an empty segment.
    pub fn to_svg_path(&self) -> String {
        self.points()
            .enumerate()
            .map(|(idx, p)| {
                let command = if idx == 0 { 'M' } else { 'L' };
                format!("{}{:.2} {:.2}", command, p.x, p.y)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The three segments drawn for one cue.
#[derive(Debug, Clone, Copy)]
pub struct CueWaveform<'a> {
    pub prior: WaveformSegment<'a>,
    pub current: WaveformSegment<'a>,
    pub next: WaveformSegment<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct WaveformSegmentBuilder {
    /// Seconds of context shown on each side of the cue.
    pub context_window: f64,
}

impl Default for WaveformSegmentBuilder {
    fn default() -> Self {
        Self {
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }
}

impl WaveformSegmentBuilder {
    pub fn new(context_window: f64) -> Self {
        Self { context_window }
    }

    /// Slice `envelope` around the cue `[start, end]`.
    ///
    /// Returns `None` when the envelope cannot be mapped to time.
    pub fn build<'a>(&self, envelope: &'a Envelope, start: f64, end: f64) -> Option<CueWaveform<'a>> {
        if !envelope.is_usable() {
            return None;
        }

        let values = envelope.values();
        let frame_duration = envelope.frame_duration();
        let context = self.context_window.max(0.0);

        let prior_start = (start - context).max(0.0);
        let next_end = (end + context).min(envelope.duration());

        let index = |time: f64| -> usize {
            let frame = envelope.frame_at(time);
            if frame.is_nan() || frame <= 0.0 {
                0
            } else {
                (frame as usize).min(values.len())
            }
        };

        let i0 = index(prior_start);
        let i1 = index(start).max(i0);
        let i2 = index(end).max(i1);
        let i3 = index(next_end).max(i2);

        let prior_duration = (i1 - i0) as f64 * frame_duration;
        let current_duration = (i2 - i1) as f64 * frame_duration;
        let next_duration = (i3 - i2) as f64 * frame_duration;

        let mut total = prior_duration + current_duration + next_duration;
        if total <= 0.0 {
            total = 1.0;
        }

        let prior_x_end = prior_duration / total * CANVAS_WIDTH;
        let current_x_end = prior_x_end + current_duration / total * CANVAS_WIDTH;

        Some(CueWaveform {
            prior: WaveformSegment {
                values: &values[i0..i1],
                x_start: 0.0,
                x_end: prior_x_end,
            },
            current: WaveformSegment {
                values: &values[i1..i2],
                x_start: prior_x_end,
                x_end: current_x_end,
            },
            next: WaveformSegment {
                values: &values[i2..i3],
                x_start: current_x_end,
                x_end: CANVAS_WIDTH,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(frames: usize, value: f32) -> Envelope {
        Envelope::from_values(vec![value; frames], 0.25)
    }

    #[test]
    fn test_segments_cover_context_and_body() {
        let env = flat(40, 0.5);
        let builder = WaveformSegmentBuilder::new(1.0);
        let wf = builder.build(&env, 2.0, 4.0).unwrap();

        assert_eq!(wf.prior.values().len(), 4);
        assert_eq!(wf.current.values().len(), 8);
        assert_eq!(wf.next.values().len(), 4);
    }

    #[test]
    fn test_width_proportional_to_covered_time() {
        let env = flat(40, 0.5);
        let builder = WaveformSegmentBuilder::new(1.0);
        let wf = builder.build(&env, 2.0, 4.0).unwrap();

        let (p0, p1) = wf.prior.x_range();
        let (c0, c1) = wf.current.x_range();
        let (n0, n1) = wf.next.x_range();
        assert_eq!(p0, 0.0);
        assert!((p1 - 25.0).abs() < 1e-9);
        assert_eq!(c0, p1);
        assert!((c1 - 75.0).abs() < 1e-9);
        assert_eq!(n0, c1);
        assert_eq!(n1, CANVAS_WIDTH);
    }

    #[test]
    fn test_prior_context_clipped_at_zero() {
        let env = flat(40, 0.5);
        let builder = WaveformSegmentBuilder::new(1.0);
        let wf = builder.build(&env, 0.0, 1.0).unwrap();

        assert!(wf.prior.is_empty());
        assert_eq!(wf.prior.points().count(), 0);
        assert_eq!(wf.current.x_range().0, 0.0);
    }

    #[test]
    fn test_next_context_clipped_at_end() {
        let env = flat(8, 0.5); // 2 seconds
        let builder = WaveformSegmentBuilder::new(1.0);
        let wf = builder.build(&env, 1.0, 2.0).unwrap();

        assert!(wf.next.is_empty());
        assert_eq!(wf.current.values().len(), 4);
    }

    #[test]
    fn test_cue_past_end_is_degenerate() {
        let env = flat(8, 0.5);
        let builder = WaveformSegmentBuilder::default();
        let wf = builder.build(&env, 10.0, 12.0).unwrap();

        assert!(wf.prior.is_empty());
        assert!(wf.current.is_empty());
        assert!(wf.next.is_empty());
        assert_eq!(wf.prior.x_range(), (0.0, 0.0));
        assert_eq!(wf.current.x_range(), (0.0, 0.0));
        assert_eq!(wf.next.x_range(), (0.0, CANVAS_WIDTH));
    }

    #[test]
    fn test_local_normalization() {
        let mut values = vec![0.01f32; 8];
        values.extend(vec![0.8f32; 8]);
        let env = Envelope::from_values(values, 0.25);
        let builder = WaveformSegmentBuilder::new(2.0);
        let wf = builder.build(&env, 2.0, 4.0).unwrap();

        // Both the quiet prior context and the loud cue reach the top padding.
        for p in wf.prior.points().chain(wf.current.points()) {
            assert!((p.y - CANVAS_PADDING).abs() < 1e-9);
        }
    }

    #[test]
    fn test_silent_segment_sits_on_baseline() {
        let env = flat(16, 0.0);
        let builder = WaveformSegmentBuilder::new(1.0);
        let wf = builder.build(&env, 1.0, 2.0).unwrap();

        for p in wf.current.points() {
            assert_eq!(p.y, CANVAS_HEIGHT - CANVAS_PADDING);
        }
    }

    #[test]
    fn test_points_span_segment() {
        let env = Envelope::from_values(vec![0.0, 1.0, 0.5, 1.0, 0.0], 1.0);
        let builder = WaveformSegmentBuilder::new(0.0);
        let wf = builder.build(&env, 0.0, 5.0).unwrap();

        let points: Vec<Point> = wf.current.points().collect();
        assert_eq!(points.len(), 5);
        assert_eq!(points[0].x, 0.0);
        assert_eq!(points[4].x, 100.0);
        assert_eq!(points[1].y, 2.0);
        assert_eq!(points[2].y, 20.0);
        assert_eq!(points[0].y, 38.0);
    }

    #[test]
    fn test_svg_path() {
        let env = Envelope::from_values(vec![0.0, 1.0], 1.0);
        let builder = WaveformSegmentBuilder::new(0.0);
        let wf = builder.build(&env, 0.0, 2.0).unwrap();

        assert_eq!(wf.current.to_svg_path(), "M0.00 38.00 L100.00 2.00");
        assert_eq!(wf.prior.to_svg_path(), "");
    }

    #[test]
    fn test_unusable_envelope() {
        let env = Envelope::from_values(vec![1.0, 2.0], 0.0);
        assert!(WaveformSegmentBuilder::default().build(&env, 0.0, 1.0).is_none());
    }
}
