use crate::error::{CuesyncError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Samples per envelope frame.
pub const DEFAULT_WINDOW_SIZE: usize = 2048;

/// Seconds of audio shown on either side of a cue's waveform.
pub const DEFAULT_CONTEXT_WINDOW: f64 = 0.75;

/// Seconds moved by a single nudge.
pub const DEFAULT_NUDGE_STEP: f64 = 0.1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window_size: usize,
    pub context_window: f64,
    pub nudge_step: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            context_window: DEFAULT_CONTEXT_WINDOW,
            nudge_step: DEFAULT_NUDGE_STEP,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                if let Ok(file_config) = toml::from_str::<Config>(&contents) {
                    config = file_config;
                }
            }
        }

        // Override with environment variables
        if let Ok(window) = std::env::var("CUESYNC_WINDOW_SIZE") {
            if let Ok(w) = window.parse() {
                config.window_size = w;
            }
        }
        if let Ok(context) = std::env::var("CUESYNC_CONTEXT_WINDOW") {
            if let Ok(c) = context.parse() {
                config.context_window = c;
            }
        }
        if let Ok(step) = std::env::var("CUESYNC_NUDGE_STEP") {
            if let Ok(s) = step.parse() {
                config.nudge_step = s;
            }
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(CuesyncError::Config(
                "window_size must be greater than 0".to_string(),
            ));
        }

        if !self.context_window.is_finite() || self.context_window < 0.0 {
            return Err(CuesyncError::Config(format!(
                "context_window must be a non-negative number of seconds, got {}",
                self.context_window
            )));
        }

        if !self.nudge_step.is_finite() || self.nudge_step <= 0.0 {
            return Err(CuesyncError::Config(format!(
                "nudge_step must be a positive number of seconds, got {}",
                self.nudge_step
            )));
        }

        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cuesync").join("config.toml"))
    }
}
