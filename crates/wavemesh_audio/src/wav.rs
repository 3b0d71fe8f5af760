//! # WAV Source
//!
//! Decodes RIFF WAVE files with `hound`.
//!
//! - Integer PCM (8/16/24/32-bit) is scaled by `2^(bits - 1)` into [-1, 1).
//! - 32-bit float is passed through unchanged.
//! - Multi-channel frames are averaged to mono. A trailing partial frame is
//!   dropped.

use std::io::{Cursor, Read};
use std::path::Path;

use hound::{SampleFormat, WavReader};
use tracing::debug;
use wavemesh_core::Signal;

use crate::error::{DecodeError, DecodeResult};
use crate::source::SignalSource;

/// WAV decoder.
#[derive(Clone, Copy, Debug, Default)]
pub struct WavSource;

impl WavSource {
    /// Creates the WAV source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SignalSource for WavSource {
    fn supported_extensions(&self) -> &'static [&'static str] {
        &["wav", "wave"]
    }

    fn name(&self) -> &'static str {
        "WAV decoder"
    }

    fn load(&self, path: &Path) -> DecodeResult<Signal> {
        let reader = WavReader::open(path)?;
        let signal = decode_reader(reader)?;
        if signal.is_empty() {
            return Err(DecodeError::Empty(path.to_path_buf()));
        }
        Ok(signal)
    }
}

/// Decodes an in-memory WAV file.
///
/// # Errors
///
/// Returns [`DecodeError::Wav`] if the bytes are not a supported WAV stream.
pub fn decode_wav_bytes(bytes: &[u8]) -> DecodeResult<Signal> {
    decode_reader(WavReader::new(Cursor::new(bytes))?)
}

/// Decodes every sample from an open reader and mixes to mono.
///
/// # Errors
///
/// Returns [`DecodeError::Wav`] on malformed or unsupported sample data.
pub fn decode_reader<R: Read>(reader: WavReader<R>) -> DecodeResult<Signal> {
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = int_scale(spec.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| to_f32(v) * scale))
                .collect::<Result<_, _>>()?
        }
    };

    let mono = mix_to_mono(&interleaved, channels);
    debug!(
        channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        frames = mono.len(),
        "decoded wav"
    );
    Ok(Signal::with_sample_rate(mono, spec.sample_rate))
}

/// Averages interleaved frames down to one channel.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    let inv = 1.0 / channels as f32;
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * inv)
        .collect()
}

/// Multiplier mapping a signed integer sample of `bits` width into [-1, 1).
#[allow(clippy::cast_precision_loss)]
fn int_scale(bits: u16) -> f32 {
    let bits = bits.clamp(1, 32);
    1.0 / (1u64 << (bits - 1)) as f32
}

#[inline]
#[allow(clippy::cast_precision_loss)]
fn to_f32(v: i32) -> f32 {
    v as f32
}
