//! # Signal and Resampler
//!
//! A [`Signal`] is the decoded amplitude sequence. It is never mutated after
//! construction; every stage produces a new value.
//!
//! ## Resampling
//!
//! [`resample`] evaluates the piecewise-linear interpolant of the input at
//! `count` evenly spaced positions from the first to the last sample:
//!
//! ```text
//! position(i) = i * (len - 1) / (count - 1)
//! ```
//!
//! With `count == len` every position lands on an exact sample, so the
//! signal comes back unchanged.

use crate::error::{MeshError, MeshResult};

/// Ordered sequence of amplitude samples.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Signal {
    samples: Vec<f32>,
    /// Sample rate in Hz, if the signal came from a decoder.
    sample_rate: Option<u32>,
}

impl Signal {
    /// Creates a signal without sample-rate information.
    #[must_use]
    pub fn new(samples: Vec<f32>) -> Self {
        Self {
            samples,
            sample_rate: None,
        }
    }

    /// Creates a signal tagged with its sample rate.
    #[must_use]
    pub fn with_sample_rate(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate: Some(sample_rate),
        }
    }

    /// Returns the samples.
    #[inline]
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Consumes the signal and returns its samples.
    #[must_use]
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Number of samples.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if there are no samples.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample rate in Hz, if known.
    #[must_use]
    pub const fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    /// Duration in seconds, if the sample rate is known.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_secs(&self) -> Option<f64> {
        self.sample_rate
            .filter(|&rate| rate > 0)
            .map(|rate| self.samples.len() as f64 / f64::from(rate))
    }

    /// Resamples to exactly `count` points. The sample rate is dropped since
    /// the result is no longer evenly timed at the original rate.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidArgument`] if the signal is empty and
    /// `count > 0`.
    pub fn resample(&self, count: usize) -> MeshResult<Signal> {
        resample(&self.samples, count).map(Signal::new)
    }
}

impl From<Vec<f32>> for Signal {
    fn from(samples: Vec<f32>) -> Self {
        Self::new(samples)
    }
}

/// Reduces (or stretches) `samples` to exactly `count` points by linear
/// interpolation.
///
/// - `count == 0` returns an empty vector.
/// - `count == 1` returns the first sample.
///
/// # Errors
///
/// Returns [`MeshError::InvalidArgument`] if `samples` is empty and
/// `count > 0`.
#[allow(clippy::cast_precision_loss)]
pub fn resample(samples: &[f32], count: usize) -> MeshResult<Vec<f32>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    if samples.is_empty() {
        return Err(MeshError::invalid_argument(format!(
            "cannot resample an empty signal to {count} points"
        )));
    }
    if count == 1 {
        return Ok(vec![samples[0]]);
    }

    let step = (samples.len() - 1) as f64 / (count - 1) as f64;
    Ok((0..count)
        .map(|i| interpolate(samples, i as f64 * step))
        .collect())
}

/// Piecewise-linear lookup. Positions outside the sample range clamp to the
/// nearest end.
#[inline]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn interpolate(samples: &[f32], position: f64) -> f32 {
    let last = samples.len() - 1;
    if position <= 0.0 {
        return samples[0];
    }
    if position >= last as f64 {
        return samples[last];
    }

    let left = position.floor() as usize;
    let frac = position - left as f64;
    let a = f64::from(samples[left]);
    let b = f64::from(samples[left + 1]);
    (a + (b - a) * frac) as f32
}
