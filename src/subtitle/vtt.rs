// WebVTT subtitle format (header + id/time/text blocks)
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::{Cue, CueId};

fn time_range_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+:\d+:\d+\.\d+)\s*-->\s*(\d+:\d+:\d+\.\d+)")
            .expect("time range pattern is valid")
    })
}

fn timestamp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+):(\d+):(\d+\.\d+)").expect("timestamp pattern is valid")
    })
}

/// Parse VTT text into cues, in file order.
///
/// Parsing never fails. A block whose time line does not look like
/// `H:MM:SS.mmm --> H:MM:SS.mmm` is dropped without a trace and parsing
/// resumes on the line after it.
pub fn parse(text: &str) -> Vec<Cue> {
    let normalized = text.replace('\r', "");
    let lines: Vec<&str> = normalized.split('\n').collect();
    let mut cues = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();
        i += 1;
        if line.is_empty() || line.starts_with("WEBVTT") {
            continue;
        }

        let (id, time_line) = if line.contains("-->") {
            (None, line)
        } else {
            let next = lines.get(i).map(|l| l.trim()).unwrap_or("");
            i += 1;
            (Some(line), next)
        };

        let Some((start, end)) = parse_time_range(time_line) else {
            debug!("Skipping block with unreadable time line: {:?}", time_line);
            continue;
        };

        let mut text_lines = Vec::new();
        while i < lines.len() && !lines[i].trim().is_empty() {
            text_lines.push(lines[i]);
            i += 1;
        }

        let id = match id {
            Some(id) => CueId::Explicit(id.to_string()),
            None => CueId::Positional(cues.len() + 1),
        };

        cues.push(Cue {
            id,
            start,
            end,
            text: text_lines.join("\n"),
        });
    }

    debug!("Parsed {} cues", cues.len());
    cues
}

/// Serialize cues back to VTT text.
pub fn serialize(cues: &[Cue]) -> String {
    let mut parts = vec!["WEBVTT\n".to_string()];

    for cue in cues {
        parts.push(cue.id.to_string());
        parts.push(format!(
            "{} --> {}",
            format_time(cue.start),
            format_time(cue.end)
        ));
        parts.push(cue.text.clone());
        parts.push(String::new());
    }

    parts.join("\n")
}

/// Format seconds as `HH:MM:SS.mmm`.
///
/// Negative and non-finite input formats as zero. Seconds are rounded to
/// three places after splitting off minutes, so a value just under a minute
/// boundary can print as `60.000`.
pub fn format_time(seconds: f64) -> String {
    let s = if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    };
    let hours = (s / 3600.0).floor() as u64;
    let minutes = ((s % 3600.0) / 60.0).floor() as u64;
    let secs = s % 60.0;
    format!("{:02}:{:02}:{:06.3}", hours, minutes, secs)
}

/// Parse the first `H:MM:SS.mmm` timestamp found in `s`, or 0.0 if none.
pub fn parse_time(s: &str) -> f64 {
    let Some(caps) = timestamp_pattern().captures(s) else {
        return 0.0;
    };

    let field = |n: usize| -> f64 {
        caps.get(n)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };

    field(1) * 3600.0 + field(2) * 60.0 + field(3)
}

fn parse_time_range(line: &str) -> Option<(f64, f64)> {
    let caps = time_range_pattern().captures(line)?;
    Some((parse_time(&caps[1]), parse_time(&caps[2])))
}
