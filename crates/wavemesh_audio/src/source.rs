//! # Signal Sources
//!
//! A [`SignalSource`] turns a file into a [`Signal`]. The [`DecoderRegistry`]
//! holds every available source and picks one by file extension.

use std::path::Path;

use tracing::info;
use wavemesh_core::Signal;

use crate::error::{DecodeError, DecodeResult};
use crate::mp3::Mp3Source;
use crate::wav::WavSource;

/// Decoder for one family of audio formats.
pub trait SignalSource: Send + Sync {
    /// File extensions handled (lowercase, no dot), e.g. `"wav"`.
    fn supported_extensions(&self) -> &'static [&'static str];

    /// Checks whether an extension is handled, ignoring case.
    fn supports(&self, extension: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }

    /// Decodes the whole file into a mono signal.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the file is corrupt or unsupported.
    fn load(&self, path: &Path) -> DecodeResult<Signal>;

    /// Name for logs and error messages.
    fn name(&self) -> &'static str;
}

/// All available sources, matched by extension.
pub struct DecoderRegistry {
    sources: Vec<Box<dyn SignalSource>>,
}

impl DecoderRegistry {
    /// Creates a registry with every built-in source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: vec![Box::new(WavSource::new()), Box::new(Mp3Source::new())],
        }
    }

    /// Creates a registry with no sources.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Adds a source. Earlier sources win on overlapping extensions.
    pub fn register(&mut self, source: Box<dyn SignalSource>) {
        self.sources.push(source);
    }

    /// Finds the source for an extension (no dot).
    #[must_use]
    pub fn find_source(&self, extension: &str) -> Option<&dyn SignalSource> {
        self.sources
            .iter()
            .find(|source| source.supports(extension))
            .map(|source| source.as_ref())
    }

    /// Finds the source for a path by its extension.
    #[must_use]
    pub fn find_source_for_file(&self, path: &Path) -> Option<&dyn SignalSource> {
        let extension = path.extension().and_then(|ext| ext.to_str())?;
        self.find_source(extension)
    }

    /// Sorted, deduplicated list of supported extensions.
    #[must_use]
    pub fn supported_extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = self
            .sources
            .iter()
            .flat_map(|source| source.supported_extensions().iter())
            .map(|ext| ext.to_lowercase())
            .collect();
        extensions.sort();
        extensions.dedup();
        extensions
    }

    /// Decodes `path` with the matching source.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::NotFound`] if the path does not exist
    /// - [`DecodeError::Io`] if the path can't be inspected
    /// - [`DecodeError::UnsupportedFormat`] if no source matches
    /// - any error from the source itself
    pub fn load(&self, path: &Path) -> DecodeResult<Signal> {
        if !path.try_exists()? {
            return Err(DecodeError::NotFound(path.to_path_buf()));
        }

        let Some(source) = self.find_source_for_file(path) else {
            return Err(DecodeError::UnsupportedFormat {
                extension: path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .unwrap_or_default()
                    .to_string(),
                supported: self.supported_extensions(),
            });
        };

        let signal = source.load(path)?;
        info!(
            path = %path.display(),
            decoder = source.name(),
            samples = signal.len(),
            sample_rate = signal.sample_rate().unwrap_or_default(),
            "loaded audio"
        );
        Ok(signal)
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource;

    impl SignalSource for FixedSource {
        fn supported_extensions(&self) -> &'static [&'static str] {
            &["raw", "wav"]
        }

        fn load(&self, _path: &Path) -> DecodeResult<Signal> {
            Ok(Signal::new(vec![0.5; 4]))
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let registry = DecoderRegistry::new();
        assert!(registry.find_source("wav").is_some());
        assert!(registry.find_source("WAV").is_some());
        assert!(registry.find_source("Wave").is_some());
        assert!(registry.find_source("ogg").is_none());
    }

    #[test]
    fn test_mp3_is_registered() {
        let registry = DecoderRegistry::new();
        assert_eq!(registry.find_source("mp3").unwrap().name(), "MP3 decoder");
        assert_eq!(
            registry
                .find_source_for_file(Path::new("Track.MP3"))
                .unwrap()
                .name(),
            "MP3 decoder"
        );
        assert!(registry.supported_extensions().contains(&"mp3".to_string()));
    }

    #[test]
    fn test_find_source_for_file() {
        let registry = DecoderRegistry::new();
        assert!(registry.find_source_for_file(Path::new("song.wav")).is_some());
        assert!(registry.find_source_for_file(Path::new("song")).is_none());
        assert!(registry.find_source_for_file(Path::new("song.flac")).is_none());
    }

    #[test]
    fn test_supported_extensions_sorted_and_deduped() {
        let mut registry = DecoderRegistry::new();
        registry.register(Box::new(FixedSource));
        assert_eq!(
            registry.supported_extensions(),
            vec!["mp3", "raw", "wav", "wave"]
        );
    }

    #[test]
    fn test_first_registered_source_wins() {
        let mut registry = DecoderRegistry::empty();
        registry.register(Box::new(FixedSource));
        registry.register(Box::new(WavSource::new()));
        assert_eq!(registry.find_source("wav").unwrap().name(), "fixed");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let registry = DecoderRegistry::new();
        let err = registry
            .load(Path::new("/definitely/not/here/track.wav"))
            .unwrap_err();
        assert!(matches!(err, DecodeError::NotFound(_)));
    }

    #[test]
    #[cfg(unix)]
    fn test_uninspectable_path_is_io_not_missing() {
        let id = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let file = std::env::temp_dir().join(format!("test_not_a_dir_{id}"));
        std::fs::write(&file, b"plain file").unwrap();

        // A regular file used as a directory: stat fails with ENOTDIR.
        let err = DecoderRegistry::new()
            .load(&file.join("track.wav"))
            .unwrap_err();
        assert!(matches!(err, DecodeError::Io(_)), "unexpected error: {err}");

        std::fs::remove_file(&file).ok();
    }

    #[test]
    fn test_empty_registry_rejects_everything() {
        let registry = DecoderRegistry::empty();
        assert!(registry.supported_extensions().is_empty());
        assert!(registry.find_source("wav").is_none());
    }
}
