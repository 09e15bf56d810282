//! Error types for slide deck loading and playback control.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a deck or driving playback.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read the input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file is not a `.pptx` container.
    #[error("Please upload a valid .pptx file: {0}")]
    UnsupportedFormat(String),

    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error in a slide part.
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// Speaking rate outside the accepted range.
    #[error("Invalid speaking rate {0}: expected a value between {min} and {max}", min = crate::MIN_RATE, max = crate::MAX_RATE)]
    InvalidRate(f32),

    /// No voice at the requested index.
    #[error("No voice at index {0}")]
    UnknownVoice(usize),

    /// Configuration file could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
