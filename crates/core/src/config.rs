//! Reader configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, Result};

/// How slide parts are ordered when assembling document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideOrder {
    /// Archive entry order. May not match the order slides are shown in.
    #[default]
    Discovery,
    /// The slide list declared in `ppt/presentation.xml`.
    Presentation,
}

/// Tunable settings for loading and playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Words skipped by rewind and fast-forward.
    pub step_words: usize,

    /// Speaking rate used until the user changes it.
    pub default_rate: f32,

    /// Milliseconds per word for the paced engine at rate 1.0.
    pub word_interval_ms: u64,

    /// Order in which slide parts are read.
    pub slide_order: SlideOrder,

    /// Text placed before the highlighted word.
    pub highlight_open: String,

    /// Text placed after the highlighted word.
    pub highlight_close: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            step_words: 10,
            default_rate: 1.0,
            word_interval_ms: 350,
            slide_order: SlideOrder::Discovery,
            highlight_open: "[".to_string(),
            highlight_close: "]".to_string(),
        }
    }
}

impl ReaderConfig {
    /// Parse a JSON configuration. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        log::debug!("Loaded configuration from {}", path.display());
        Self::from_json(&json)
    }

    /// Check that every setting is usable.
    pub fn validate(&self) -> Result<()> {
        if self.step_words == 0 {
            return Err(Error::InvalidConfig(
                "step_words must be at least 1".to_string(),
            ));
        }
        if self.word_interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "word_interval_ms must be at least 1".to_string(),
            ));
        }
        crate::playback::check_rate(self.default_rate)?;
        Ok(())
    }
}
