//! Domain types shared between the playback controller and speech engines.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Slowest accepted speaking rate multiplier.
pub const MIN_RATE: f32 = 0.1;

/// Fastest accepted speaking rate multiplier.
pub const MAX_RATE: f32 = 10.0;

/// ZIP local file header signature that every `.pptx` starts with.
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Checks that a selected file is a slide deck this reader can open.
pub struct DeckFormat;

impl DeckFormat {
    /// Accepted file extension.
    pub const EXTENSION: &'static str = "pptx";

    /// Accept only file names ending in `.pptx`, ignoring ASCII case.
    ///
    /// Looser than a plain suffix match on case (`DECK.PPTX` passes) and
    /// stricter on the stem (a bare `.pptx` is rejected).
    pub fn check_filename(name: &str) -> Result<()> {
        let accepted = name
            .rsplit_once('.')
            .map(|(stem, ext)| !stem.is_empty() && ext.eq_ignore_ascii_case(Self::EXTENSION))
            .unwrap_or(false);

        if accepted {
            Ok(())
        } else {
            Err(Error::UnsupportedFormat(name.to_string()))
        }
    }

    /// Accept only blobs that begin with a ZIP local file header.
    pub fn check_magic(bytes: &[u8]) -> Result<()> {
        if bytes.starts_with(&ZIP_MAGIC) {
            Ok(())
        } else {
            Err(Error::UnsupportedFormat(
                "file is not a ZIP container".to_string(),
            ))
        }
    }
}

/// A synthesis voice reported by a speech engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Display name of the voice.
    pub name: String,

    /// BCP 47 language tag, e.g. `en-US`.
    pub lang: String,
}

impl Voice {
    /// Create a new voice.
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }

    /// User-facing label in the form `name (lang)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.lang)
    }
}

/// Current state of the playback controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing submitted to the engine.
    #[default]
    Idle,
    /// An utterance is being spoken.
    Playing,
    /// The engine has been asked to pause the current utterance.
    Paused,
}

/// A single unit of text submitted to the speech engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// Identifier used to match engine events to this utterance.
    pub id: u64,

    /// Words joined by single spaces.
    pub text: String,

    /// Speaking rate multiplier.
    pub rate: f32,

    /// Voice to speak with; `None` lets the engine choose.
    pub voice: Option<Voice>,
}

/// Notifications sent by a speech engine while it speaks an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// The engine reached a word boundary at `char_index` characters into
    /// the utterance text.
    Boundary { utterance: u64, char_index: usize },

    /// The utterance finished on its own.
    End { utterance: u64 },
}

impl EngineEvent {
    /// Id of the utterance this event belongs to.
    pub fn utterance(&self) -> u64 {
        match *self {
            Self::Boundary { utterance, .. } | Self::End { utterance } => utterance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_filename() {
        assert!(DeckFormat::check_filename("deck.pptx").is_ok());
        assert!(DeckFormat::check_filename("Quarterly Review.PPTX").is_ok());
        assert!(DeckFormat::check_filename("deck.txt").is_err());
        assert!(DeckFormat::check_filename("deck.ppt").is_err());
        assert!(DeckFormat::check_filename("deck.pptx.zip").is_err());
        assert!(DeckFormat::check_filename("pptx").is_err());
        assert!(DeckFormat::check_filename(".pptx").is_err());
    }

    #[test]
    fn test_check_magic() {
        assert!(DeckFormat::check_magic(b"PK\x03\x04rest").is_ok());
        assert!(DeckFormat::check_magic(b"PK").is_err());
        assert!(DeckFormat::check_magic(&[0xD0, 0xCF, 0x11, 0xE0]).is_err());
        assert!(DeckFormat::check_magic(b"").is_err());
    }

    #[test]
    fn test_voice_label() {
        let voice = Voice::new("Samantha", "en-US");
        assert_eq!(voice.label(), "Samantha (en-US)");
    }

    #[test]
    fn test_event_utterance() {
        let boundary = EngineEvent::Boundary {
            utterance: 3,
            char_index: 12,
        };
        assert_eq!(boundary.utterance(), 3);
        assert_eq!(EngineEvent::End { utterance: 7 }.utterance(), 7);
    }

    #[test]
    fn test_default_state_is_idle() {
        assert_eq!(PlaybackState::default(), PlaybackState::Idle);
    }
}
