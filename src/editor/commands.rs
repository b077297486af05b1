// Command dispatch against the selected cue
use tracing::debug;

use super::{CueHandle, Editor};
use crate::error::Result;

/// Everything a front end can ask of the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Select(CueHandle),
    SelectNext,
    SelectPrevious,
    SnapStartToPlayhead,
    SnapEndToPlayhead,
    NudgeStart(f64),
    NudgeEnd(f64),
    ExtendStartBackward,
    ExtendEndForward,
    SetText(String),
    JumpToStart,
    JumpToEnd,
    PlayCue,
    TogglePlayback,
}

/// Playback action the front end should perform on the media element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackRequest {
    Toggle,
    /// Seek to `position` and play.
    PlayFrom(f64),
    /// Seek to `start`, play, and pause once `stop_at` is reached.
    PlayRange { start: f64, stop_at: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Selected(CueHandle),
    Updated(CueHandle),
    Playback(PlaybackRequest),
    /// Nothing to act on (no cue selected, or no cues at all).
    Ignored,
}

/// Keyboard shortcut bindings.
pub fn command_for_key(key: &str) -> Option<Command> {
    match key {
        "Escape" | "Esc" => Some(Command::TogglePlayback),
        "[" => Some(Command::SnapStartToPlayhead),
        "]" => Some(Command::SnapEndToPlayhead),
        _ => None,
    }
}

/// Apply `command` to the editor.
///
/// Cue commands act on the current selection. `playhead` is the media
/// position in seconds, used by the snap commands.
pub fn dispatch(editor: &mut Editor, playhead: f64, command: Command) -> Result<Outcome> {
    debug!("Dispatching {:?} at {:.3}", command, playhead);

    match command {
        Command::TogglePlayback => Ok(Outcome::Playback(PlaybackRequest::Toggle)),
        Command::Select(handle) => {
            editor.select(handle)?;
            Ok(Outcome::Selected(handle))
        }
        Command::SelectNext => step_selection(editor, true),
        Command::SelectPrevious => step_selection(editor, false),
        Command::SnapStartToPlayhead => on_selection(editor, |e, h| {
            e.set_start_to_time(h, playhead)?;
            Ok(Outcome::Updated(h))
        }),
        Command::SnapEndToPlayhead => on_selection(editor, |e, h| {
            e.set_end_to_time(h, playhead)?;
            Ok(Outcome::Updated(h))
        }),
        Command::NudgeStart(delta) => on_selection(editor, |e, h| {
            e.nudge_start(h, delta)?;
            Ok(Outcome::Updated(h))
        }),
        Command::NudgeEnd(delta) => on_selection(editor, |e, h| {
            e.nudge_end(h, delta)?;
            Ok(Outcome::Updated(h))
        }),
        Command::ExtendStartBackward => on_selection(editor, |e, h| {
            e.extend_start_backward(h)?;
            Ok(Outcome::Updated(h))
        }),
        Command::ExtendEndForward => on_selection(editor, |e, h| {
            e.extend_end_forward(h)?;
            Ok(Outcome::Updated(h))
        }),
        Command::SetText(text) => on_selection(editor, move |e, h| {
            e.set_text(h, text)?;
            Ok(Outcome::Updated(h))
        }),
        Command::JumpToStart => on_selection(editor, |e, h| {
            let start = e.cue(h)?.start;
            Ok(Outcome::Playback(PlaybackRequest::PlayFrom(start)))
        }),
        Command::JumpToEnd => on_selection(editor, |e, h| {
            let end = e.cue(h)?.end;
            Ok(Outcome::Playback(PlaybackRequest::PlayFrom(end)))
        }),
        Command::PlayCue => on_selection(editor, |e, h| {
            let cue = e.cue(h)?;
            Ok(Outcome::Playback(PlaybackRequest::PlayRange {
                start: cue.start,
                stop_at: cue.end,
            }))
        }),
    }
}

fn on_selection<F>(editor: &mut Editor, action: F) -> Result<Outcome>
where
    F: FnOnce(&mut Editor, CueHandle) -> Result<Outcome>,
{
    match editor.selection() {
        Some(handle) => action(editor, handle),
        None => Ok(Outcome::Ignored),
    }
}

fn step_selection(editor: &mut Editor, forward: bool) -> Result<Outcome> {
    if editor.is_empty() {
        return Ok(Outcome::Ignored);
    }

    let last = editor.len() - 1;
    let target = match (forward, editor.selection()) {
        (true, Some(h)) => (h.0 + 1).min(last),
        (true, None) => 0,
        (false, Some(h)) => h.0.saturating_sub(1),
        (false, None) => last,
    };

    editor.select(CueHandle(target))?;
    Ok(Outcome::Selected(CueHandle(target)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtitle::{Cue, CueId};

    fn editor() -> Editor {
        Editor::new(vec![
            Cue::new(CueId::Positional(1), 1.0, 2.0, "one"),
            Cue::new(CueId::Positional(2), 3.0, 4.0, "two"),
            Cue::new(CueId::Positional(3), 5.0, 6.0, "three"),
        ])
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(command_for_key("Escape"), Some(Command::TogglePlayback));
        assert_eq!(command_for_key("["), Some(Command::SnapStartToPlayhead));
        assert_eq!(command_for_key("]"), Some(Command::SnapEndToPlayhead));
        assert_eq!(command_for_key("x"), None);
    }

    #[test]
    fn test_cue_command_without_selection_is_ignored() {
        let mut editor = editor();
        let outcome = dispatch(&mut editor, 9.0, Command::SnapStartToPlayhead).unwrap();
        assert_eq!(outcome, Outcome::Ignored);
        assert_eq!(editor.cues()[0].start, 1.0);
    }

    #[test]
    fn test_toggle_needs_no_selection() {
        let mut editor = editor();
        let outcome = dispatch(&mut editor, 0.0, Command::TogglePlayback).unwrap();
        assert_eq!(outcome, Outcome::Playback(PlaybackRequest::Toggle));
    }

    #[test]
    fn test_snap_acts_on_selection() {
        let mut editor = editor();
        dispatch(&mut editor, 0.0, Command::Select(CueHandle(1))).unwrap();

        let outcome = dispatch(&mut editor, 2.5, Command::SnapStartToPlayhead).unwrap();
        assert_eq!(outcome, Outcome::Updated(CueHandle(1)));
        assert_eq!(editor.cues()[1].start, 2.5);

        dispatch(&mut editor, 2.0, Command::SnapEndToPlayhead).unwrap();
        let cue = &editor.cues()[1];
        assert_eq!((cue.start, cue.end), (2.0, 2.0));
        assert_eq!(editor.cues()[0].start, 1.0);
    }

    #[test]
    fn test_select_next_and_previous() {
        let mut editor = editor();
        assert_eq!(
            dispatch(&mut editor, 0.0, Command::SelectNext).unwrap(),
            Outcome::Selected(CueHandle(0))
        );
        dispatch(&mut editor, 0.0, Command::SelectNext).unwrap();
        dispatch(&mut editor, 0.0, Command::SelectNext).unwrap();
        assert_eq!(
            dispatch(&mut editor, 0.0, Command::SelectNext).unwrap(),
            Outcome::Selected(CueHandle(2))
        );
        assert_eq!(
            dispatch(&mut editor, 0.0, Command::SelectPrevious).unwrap(),
            Outcome::Selected(CueHandle(1))
        );

        editor.clear_selection();
        assert_eq!(
            dispatch(&mut editor, 0.0, Command::SelectPrevious).unwrap(),
            Outcome::Selected(CueHandle(2))
        );
    }

    #[test]
    fn test_select_on_empty_editor() {
        let mut editor = Editor::default();
        assert_eq!(
            dispatch(&mut editor, 0.0, Command::SelectNext).unwrap(),
            Outcome::Ignored
        );
        assert!(dispatch(&mut editor, 0.0, Command::Select(CueHandle(0))).is_err());
    }

    #[test]
    fn test_play_cue_requests_range() {
        let mut editor = editor();
        editor.select(CueHandle(2)).unwrap();
        assert_eq!(
            dispatch(&mut editor, 0.0, Command::PlayCue).unwrap(),
            Outcome::Playback(PlaybackRequest::PlayRange {
                start: 5.0,
                stop_at: 6.0
            })
        );
        assert_eq!(
            dispatch(&mut editor, 0.0, Command::JumpToEnd).unwrap(),
            Outcome::Playback(PlaybackRequest::PlayFrom(6.0))
        );
    }

    #[test]
    fn test_nudge_and_text() {
        let mut editor = editor();
        editor.select(CueHandle(0)).unwrap();
        dispatch(&mut editor, 0.0, Command::NudgeStart(-0.25)).unwrap();
        dispatch(&mut editor, 0.0, Command::NudgeEnd(0.25)).unwrap();
        dispatch(&mut editor, 0.0, Command::SetText("uno".to_string())).unwrap();

        let cue = &editor.cues()[0];
        assert_eq!((cue.start, cue.end), (0.75, 2.25));
        assert_eq!(cue.text, "uno");
    }
}
