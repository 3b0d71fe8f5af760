//! # Decode Error Types

use std::path::PathBuf;

use symphonia::core::errors::Error as SymphoniaError;
use thiserror::Error;

/// Errors that can occur while turning an audio file into a signal.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The input path does not exist.
    #[error("audio file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// No registered source handles this file extension.
    #[error("unsupported audio format '{extension}', supported: {supported:?}")]
    UnsupportedFormat {
        /// Extension of the rejected file (empty if none).
        extension: String,
        /// Extensions that are supported.
        supported: Vec<String>,
    },

    /// The file decoded to zero samples.
    #[error("audio file contains no samples: {}", .0.display())]
    Empty(PathBuf),

    /// The WAV container or its samples are malformed.
    #[error("wav decode failed: {0}")]
    Wav(#[from] hound::Error),

    /// The MP3 stream could not be probed or decoded.
    #[error("mp3 decode failed: {0}")]
    Mp3(#[from] SymphoniaError),

    /// The input path could not be inspected or opened.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;
