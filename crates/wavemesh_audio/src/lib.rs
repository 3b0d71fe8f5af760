//! # WAVEMESH Audio
//!
//! Everything between an audio file on disk and a [`Signal`].
//!
//! ## Core Components
//!
//! - `SignalSource`: decoder for one family of formats
//! - `DecoderRegistry`: picks a source by file extension
//! - `WavSource`: PCM / float WAV via `hound`, mixed to mono
//! - `Mp3Source`: MPEG audio via `symphonia`, mixed to mono
//! - `WaveformPreview`: optional sparkline + level statistics
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::path::Path;
//! use wavemesh_audio::{DecoderRegistry, WaveformPreview};
//!
//! let registry = DecoderRegistry::new();
//! let signal = registry.load(Path::new("track.wav"))?;
//! if let Some(preview) = WaveformPreview::from_signal(&signal, 72) {
//!     println!("{preview}");
//! }
//! ```
//!
//! [`Signal`]: wavemesh_core::Signal

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod mp3;
pub mod preview;
pub mod source;
pub mod wav;

pub use error::{DecodeError, DecodeResult};
pub use mp3::{decode_mp3_file, Mp3Source};
pub use preview::WaveformPreview;
pub use source::{DecoderRegistry, SignalSource};
pub use wav::{decode_wav_bytes, mix_to_mono, WavSource};
