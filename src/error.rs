use thiserror::Error;

#[derive(Error, Debug)]
pub enum CuesyncError {
    #[error("Audio decoding failed: {0}")]
    AudioDecode(String),

    #[error("Invalid audio input: {0}")]
    InvalidAudio(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No cue at position {0}")]
    UnknownCue(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CuesyncError>;
