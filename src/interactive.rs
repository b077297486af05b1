use console::style;
use cuesync::editor::{dispatch, Command, Outcome, PlaybackRequest};
use cuesync::{format_time, parse_time, Config, Cue, CueHandle, Session};
use dialoguer::{Confirm, Input, Select};
use std::path::PathBuf;

const ACTIONS: &[&str] = &[
    "Set start to playhead",
    "Set end to playhead",
    "Nudge start earlier",
    "Nudge start later",
    "Nudge end earlier",
    "Nudge end later",
    "Extend start back to previous pause",
    "Extend end to next pause",
    "Edit text",
    "Play cue",
    "Jump to start",
    "Jump to end",
    "Back to cue list",
];

/// Run the interactive editing loop. Returns the path written, if saved.
pub fn run_editor(
    session: &mut Session,
    config: &Config,
    output: Option<PathBuf>,
) -> anyhow::Result<Option<PathBuf>> {
    print_header();

    if session.editor.is_empty() {
        println!("{} No cues found in {}", style("!").yellow(), session.subtitles_path.display());
        return Ok(None);
    }

    if !session.editor.has_analysis() {
        println!(
            "{} No audio analysis: waveform/snap unavailable",
            style("!").yellow()
        );
    }

    let output = output.unwrap_or_else(|| session.default_output_path());

    loop {
        let mut items: Vec<String> = session.editor.cues().iter().map(describe_cue).collect();
        let cue_count = items.len();
        items.push("Save and quit".to_string());
        items.push("Quit without saving".to_string());

        let default = session.editor.selection().map(|h| h.0).unwrap_or(0);
        let selection = Select::new()
            .with_prompt("Choose a cue")
            .items(&items)
            .default(default)
            .interact()?;

        if selection == cue_count {
            if output.exists()
                && !Confirm::new()
                    .with_prompt(format!("Overwrite {}?", output.display()))
                    .default(false)
                    .interact()?
            {
                continue;
            }
            session.save(&output)?;
            println!("{} Saved to {}", style("✓").green(), output.display());
            return Ok(Some(output));
        }
        if selection == cue_count + 1 {
            if Confirm::new()
                .with_prompt("Discard all changes?")
                .default(false)
                .interact()?
            {
                return Ok(None);
            }
            continue;
        }

        dispatch(&mut session.editor, 0.0, Command::Select(CueHandle(selection)))?;
        edit_cue(session, config)?;
    }
}

fn edit_cue(session: &mut Session, config: &Config) -> anyhow::Result<()> {
    loop {
        let Some(handle) = session.editor.selection() else {
            return Ok(());
        };
        println!("\n  {}", style(describe_cue(session.editor.cue(handle)?)).cyan());

        let action = Select::new()
            .with_prompt("Action")
            .items(ACTIONS)
            .default(0)
            .interact()?;

        let mut playhead = 0.0;
        let command = match action {
            0 | 1 => {
                playhead = prompt_playhead()?;
                if action == 0 {
                    Command::SnapStartToPlayhead
                } else {
                    Command::SnapEndToPlayhead
                }
            }
            6 | 7 if !session.editor.has_analysis() => {
                println!(
                    "{} No audio analysis, cue left unchanged",
                    style("!").yellow()
                );
                continue;
            }
            8 => {
                let current = session.editor.cue(handle)?.text.replace('\n', "\\n");
                let text: String = Input::new()
                    .with_prompt("Text (use \\n for line breaks)")
                    .with_initial_text(current)
                    .allow_empty(true)
                    .interact_text()?;
                Command::SetText(text.replace("\\n", "\n"))
            }
            _ => match menu_command(action, config.nudge_step) {
                Some(command) => command,
                None => return Ok(()),
            },
        };

        match dispatch(&mut session.editor, playhead, command)? {
            Outcome::Playback(PlaybackRequest::PlayRange { start, stop_at }) => {
                println!(
                    "  ▶ {} → {}",
                    format_time(start),
                    format_time(stop_at)
                );
            }
            Outcome::Playback(PlaybackRequest::PlayFrom(position)) => {
                println!("  ▶ {}", format_time(position));
            }
            Outcome::Playback(_) | Outcome::Selected(_) | Outcome::Updated(_) => {}
            Outcome::Ignored => println!("{} No cue selected", style("!").yellow()),
        }
    }
}

/// Command for a menu entry that needs no further input.
fn menu_command(action: usize, step: f64) -> Option<Command> {
    match action {
        2 => Some(Command::NudgeStart(-step)),
        3 => Some(Command::NudgeStart(step)),
        4 => Some(Command::NudgeEnd(-step)),
        5 => Some(Command::NudgeEnd(step)),
        6 => Some(Command::ExtendStartBackward),
        7 => Some(Command::ExtendEndForward),
        9 => Some(Command::PlayCue),
        10 => Some(Command::JumpToStart),
        11 => Some(Command::JumpToEnd),
        _ => None,
    }
}

/// Accept either plain seconds or `HH:MM:SS.mmm`.
fn parse_playhead(input: &str) -> Option<f64> {
    let input = input.trim();
    if input.contains(':') {
        let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        let fields: Vec<&str> = input.split(':').collect();
        let valid = fields.len() == 3
            && digits(fields[0])
            && digits(fields[1])
            && fields[2]
                .split_once('.')
                .is_some_and(|(secs, frac)| digits(secs) && digits(frac));
        valid.then(|| parse_time(input))
    } else {
        input.parse::<f64>().ok().filter(|s| s.is_finite() && *s >= 0.0)
    }
}

fn prompt_playhead() -> anyhow::Result<f64> {
    loop {
        let input: String = Input::new()
            .with_prompt("Playhead (seconds or HH:MM:SS.mmm)")
            .interact_text()?;
        match parse_playhead(&input) {
            Some(seconds) => return Ok(seconds),
            None => println!("{} Could not read time '{}'", style("!").yellow(), input),
        }
    }
}

fn describe_cue(cue: &Cue) -> String {
    let first_line = cue.text.lines().next().unwrap_or("");
    format!(
        "{:>4}  {} --> {}  {}",
        cue.id.to_string(),
        format_time(cue.start),
        format_time(cue.end),
        first_line
    )
}

fn print_header() {
    println!();
    println!(
        "{}",
        style("╔═══════════════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║          cuesync - Subtitle Timing Editor         ║").cyan()
    );
    println!(
        "{}",
        style("╚═══════════════════════════════════════════════════╝").cyan()
    );
    println!();
}
