pub mod audio;
pub mod config;
pub mod editor;
pub mod error;
pub mod session;
pub mod subtitle;

pub use config::Config;
pub use editor::{build_view, dispatch, Command, CueHandle, Editor, EditorView, Outcome};
pub use error::{CuesyncError, Result};
pub use session::{open_session, print_summary, Session, SessionStats};
pub use subtitle::{format_time, parse, parse_time, serialize, Cue, CueId};
