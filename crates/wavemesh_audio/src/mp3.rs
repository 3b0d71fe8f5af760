//! # MP3 Source
//!
//! Decodes MPEG audio with `symphonia`. Each decoded packet is converted to
//! interleaved `f32` and averaged to mono before it is appended, so a
//! channel-count change mid-stream is handled per packet.
//!
//! Packets that fail to decode are skipped. Anything else ends the load
//! with an error.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};
use wavemesh_core::Signal;

use crate::error::{DecodeError, DecodeResult};
use crate::source::SignalSource;
use crate::wav::mix_to_mono;

/// MP3 decoder.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mp3Source;

impl Mp3Source {
    /// Creates the MP3 source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SignalSource for Mp3Source {
    fn supported_extensions(&self) -> &'static [&'static str] {
        &["mp3"]
    }

    fn name(&self) -> &'static str {
        "MP3 decoder"
    }

    fn load(&self, path: &Path) -> DecodeResult<Signal> {
        let signal = decode_mp3_file(path)?;
        if signal.is_empty() {
            return Err(DecodeError::Empty(path.to_path_buf()));
        }
        Ok(signal)
    }
}

/// Decodes every packet of the default track in `path` and mixes to mono.
///
/// # Errors
///
/// Returns [`DecodeError::Io`] if the file can't be opened, or
/// [`DecodeError::Mp3`] if the stream is not decodable MPEG audio.
pub fn decode_mp3_file(path: &Path) -> DecodeResult<Signal> {
    let file = File::open(path)?;
    let stream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    hint.with_extension("mp3");

    let probed = symphonia::default::get_probe().format(
        &hint,
        stream,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or(SymphoniaError::Unsupported("no audio track"))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut mono = Vec::new();
    let mut skipped = 0usize;
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(reason)) => {
                skipped += 1;
                debug!(reason, "skipping undecodable mp3 packet");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        sample_rate.get_or_insert(spec.rate);
        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        mono.extend(mix_to_mono(buffer.samples(), spec.channels.count()));
    }

    if skipped > 0 {
        warn!(packets = skipped, "mp3 packets skipped during decode");
    }
    debug!(
        sample_rate = sample_rate.unwrap_or_default(),
        frames = mono.len(),
        "decoded mp3"
    );

    Ok(match sample_rate {
        Some(rate) => Signal::with_sample_rate(mono, rate),
        None => Signal::new(mono),
    })
}
