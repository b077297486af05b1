mod interactive;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cuesync::audio::{analyze_media, decoder_for};
use cuesync::{build_view, format_time, open_session, print_summary, Config};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "cuesync")]
#[command(version, about = "Align subtitle cues to a video's audio")]
#[command(long_about = "Adjust WebVTT cue boundaries against the playhead or the pauses detected in a media file's audio, then export the corrected subtitles.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cues of a subtitle file
    Show {
        /// Subtitle file (.vtt)
        subtitles: PathBuf,

        /// Media file whose audio provides waveforms
        #[arg(short, long)]
        media: Option<PathBuf>,

        /// Print the full view as JSON, including waveform paths
        #[arg(long)]
        json: bool,
    },

    /// Analyse a media file's audio and list the detected pauses
    Analyze {
        /// Media file (.wav directly, anything else through FFmpeg)
        media: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Adjust cue timing interactively and save the result
    Edit {
        /// Subtitle file (.vtt)
        subtitles: PathBuf,

        /// Media file whose audio provides pause snapping
        #[arg(short, long)]
        media: Option<PathBuf>,

        /// Output file (defaults to <name>.adjusted.vtt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct AnalysisReport {
    frames: usize,
    frame_duration: f64,
    duration: f64,
    valleys: Vec<f64>,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Load and validate configuration
    let config = Config::load().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    match cli.command {
        Commands::Show {
            subtitles,
            media,
            json,
        } => {
            let session = open_session(&config, &subtitles, media.as_deref(), !json)
                .await
                .with_context(|| format!("Failed to open {}", subtitles.display()))?;
            let view = build_view(&session.editor, config.context_window);

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                for cue in &view.cues {
                    println!("{}", cue.id);
                    println!("{} --> {}", cue.start_label, cue.end_label);
                    println!("{}", cue.text);
                    println!();
                }
                print_summary(&session);
            }
        }
        Commands::Analyze { media, json } => {
            if !media.exists() {
                anyhow::bail!("Media file not found: {}", media.display());
            }

            let decoder = decoder_for(&media);
            let envelope = analyze_media(decoder.as_ref(), &media, config.window_size)
                .await
                .with_context(|| format!("Failed to analyse {}", media.display()))?;

            let report = AnalysisReport {
                frames: envelope.len(),
                frame_duration: envelope.frame_duration(),
                duration: envelope.duration(),
                valleys: envelope
                    .valleys()
                    .iter()
                    .map(|&i| i as f64 * envelope.frame_duration())
                    .collect(),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                info!(
                    "{} frames of {:.4}s ({:.1}s of audio)",
                    report.frames, report.frame_duration, report.duration
                );
                println!("{} pauses detected:", report.valleys.len());
                for time in &report.valleys {
                    println!("  {}", format_time(*time));
                }
            }
        }
        Commands::Edit {
            subtitles,
            media,
            output,
        } => {
            let mut session = open_session(&config, &subtitles, media.as_deref(), true)
                .await
                .with_context(|| format!("Failed to open {}", subtitles.display()))?;
            print_summary(&session);

            if let Some(path) = interactive::run_editor(&mut session, &config, output)? {
                info!("Adjusted subtitles written to {}", path.display());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["cuesync", "show", "subs.vtt", "--media", "movie.mp4", "--json"])
            .unwrap();
        match cli.command {
            Commands::Show {
                subtitles,
                media,
                json,
            } => {
                assert_eq!(subtitles, PathBuf::from("subs.vtt"));
                assert_eq!(media, Some(PathBuf::from("movie.mp4")));
                assert!(json);
            }
            _ => panic!("expected show"),
        }

        let cli = Cli::try_parse_from(["cuesync", "-v", "edit", "subs.vtt", "-o", "out.vtt"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Edit { output: Some(_), .. }));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["cuesync"]).is_err());
    }
}
