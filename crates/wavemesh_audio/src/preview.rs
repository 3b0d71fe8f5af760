//! # Waveform Preview
//!
//! A terminal-friendly look at a decoded signal before it is meshed:
//! peak envelope as a one-line sparkline plus basic level statistics.
//!
//! Building a preview is pure. Printing it is up to the caller.

use std::fmt;

use wavemesh_core::Signal;

/// Sparkline glyphs from quiet to loud.
const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Peak envelope and level statistics of a signal.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveformPreview {
    /// Peak absolute amplitude per column.
    pub peaks: Vec<f32>,
    /// Smallest sample.
    pub min: f32,
    /// Largest sample.
    pub max: f32,
    /// Root mean square level.
    pub rms: f32,
    /// Number of samples summarised.
    pub sample_count: usize,
    /// Duration in seconds, if the sample rate is known.
    pub duration_secs: Option<f64>,
}

impl WaveformPreview {
    /// Bins `signal` into `width` columns. Returns `None` for an empty
    /// signal or zero width.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn from_signal(signal: &Signal, width: usize) -> Option<Self> {
        let samples = signal.samples();
        if samples.is_empty() || width == 0 {
            return None;
        }

        let columns = width.min(samples.len());
        let peaks = (0..columns)
            .map(|c| {
                let start = c * samples.len() / columns;
                let end = (c + 1) * samples.len() / columns;
                samples[start..end]
                    .iter()
                    .fold(0.0f32, |peak, s| peak.max(s.abs()))
            })
            .collect();

        let (min, max) = samples
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &s| {
                (lo.min(s), hi.max(s))
            });
        let energy: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
        let rms = (energy / samples.len() as f64).sqrt() as f32;

        Some(Self {
            peaks,
            min,
            max,
            rms,
            sample_count: samples.len(),
            duration_secs: signal.duration_secs(),
        })
    }

    /// Renders the peak envelope as a single line, scaled to the loudest
    /// column.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn sparkline(&self) -> String {
        let loudest = self.peaks.iter().copied().fold(0.0f32, f32::max);
        if loudest <= 0.0 {
            return LEVELS[0].to_string().repeat(self.peaks.len());
        }
        let top = (LEVELS.len() - 1) as f32;
        self.peaks
            .iter()
            .map(|&p| LEVELS[((p / loudest) * top).round() as usize])
            .collect()
    }
}

impl fmt::Display for WaveformPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.sparkline())?;
        write!(
            f,
            "samples: {}  min: {:.3}  max: {:.3}  rms: {:.3}",
            self.sample_count, self.min, self.max, self.rms
        )?;
        if let Some(secs) = self.duration_secs {
            write!(f, "  duration: {secs:.2}s")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_signal_has_no_preview() {
        assert!(WaveformPreview::from_signal(&Signal::new(Vec::new()), 40).is_none());
        assert!(WaveformPreview::from_signal(&Signal::new(vec![1.0]), 0).is_none());
    }

    #[test]
    fn test_width_capped_by_sample_count() {
        let preview = WaveformPreview::from_signal(&Signal::new(vec![0.1, 0.2, 0.3]), 80).unwrap();
        assert_eq!(preview.peaks.len(), 3);
    }

    #[test]
    fn test_stats() {
        let signal = Signal::new(vec![1.0, -1.0, 1.0, -1.0]);
        let preview = WaveformPreview::from_signal(&signal, 2).unwrap();
        assert_eq!(preview.min, -1.0);
        assert_eq!(preview.max, 1.0);
        assert!((preview.rms - 1.0).abs() < 1e-6);
        assert_eq!(preview.peaks, vec![1.0, 1.0]);
    }

    #[test]
    fn test_sparkline_scales_to_loudest() {
        let signal = Signal::new(vec![0.0, 0.0, 0.5, -0.5, 0.0, 1.0]);
        let preview = WaveformPreview::from_signal(&signal, 3).unwrap();
        let line: Vec<char> = preview.sparkline().chars().collect();
        assert_eq!(line.len(), 3);
        assert_eq!(line[0], '▁');
        assert_eq!(line[2], '█');
    }

    #[test]
    fn test_silence_renders_flat() {
        let preview = WaveformPreview::from_signal(&Signal::new(vec![0.0; 100]), 10).unwrap();
        assert_eq!(preview.sparkline(), "▁".repeat(10));
    }

    #[test]
    fn test_display_includes_duration() {
        let signal = Signal::with_sample_rate(vec![0.5; 8_000], 8_000);
        let text = WaveformPreview::from_signal(&signal, 8).unwrap().to_string();
        assert!(text.contains("samples: 8000"));
        assert!(text.contains("duration: 1.00s"));
    }
}
