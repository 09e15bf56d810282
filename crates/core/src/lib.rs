//! Core types for reading slide decks aloud: document text, voice
//! selection, word highlighting, and playback control.

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod playback;
pub mod render;
pub mod types;
pub mod voices;

pub use config::{ReaderConfig, SlideOrder};
pub use document::Document;
pub use engine::PacedEngine;
pub use error::{Error, Result};
pub use playback::{PlaybackController, SpeechEngine};
pub use render::{DisplayUnit, Renderer};
pub use types::{DeckFormat, EngineEvent, PlaybackState, Utterance, Voice, MAX_RATE, MIN_RATE};
pub use voices::VoiceRegistry;
