//! SINAD (signal to noise and distortion ratio) measurement
//!
//! A [`Sinad`] estimator converts one block of demodulated audio into one
//! ratio in decibels. The block is tapered with a [`Window`], Fourier
//! transformed, and the power within the voice passband (by default
//! 300 Hz to 3000 Hz) is compared with the power within the same passband
//! excluding a narrow window around the known reference tone.
//!
//! # Example
//!
//! ```
//! use radiosinad::sinad::{Sinad, SinadConfig};
//!
//! let sinad = Sinad::<f64>::new(SinadConfig::new(1000.0, 48000.0)).unwrap();
//! let block: Vec<f64> = (0..1000)
//!     .map(|idx| (2.0 * std::f64::consts::PI * 1000.0 * idx as f64 / 48000.0).sin())
//!     .collect();
//! let db = sinad.estimate(&block).unwrap();
//! assert!(db > 10.0);
//! ```

use crate::math::*;
use crate::metering::energy;
use crate::numbers::*;
use crate::windowing::Window;

use rustfft::{Fft, FftPlanner};
use tracing::{debug, trace};

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Width of the window around the reference tone, in hertz
pub const DEFAULT_REFERENCE_BANDWIDTH: f64 = 20.0;
/// Lower edge of the voice passband, in hertz
pub const VOICE_BAND_LOW: f64 = 300.0;
/// Upper edge of the voice passband, in hertz
pub const VOICE_BAND_HIGH: f64 = 3000.0;

/// Defect found in an input block
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum BlockDefect {
    /// Block contains no samples
    #[error("block is empty")]
    Empty,
    /// Block length differs from the configured block length
    #[error("expected {expected} samples, got {actual}")]
    LengthMismatch {
        /// Configured block length
        expected: usize,
        /// Length of the rejected block
        actual: usize,
    },
    /// Block contains NaN or an infinite value
    #[error("sample {index} is not finite")]
    NonFinite {
        /// Position of the first offending sample
        index: usize,
    },
    /// Block was recorded at a different sample rate
    #[error("sample rate {actual} Hz differs from configured {expected} Hz")]
    SampleRateMismatch {
        /// Configured sample rate
        expected: f64,
        /// Sample rate of the rejected block
        actual: f64,
    },
    /// Spectral power exceeded the floating point range
    #[error("spectral power overflowed")]
    Overflow,
}

/// Error returned by [`Sinad::new`], [`Sinad::estimate`], and
/// [`Sinad::analyze`]
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SinadError {
    /// Construction parameter out of range
    #[error("invalid configuration: {parameter} = {value}")]
    InvalidConfiguration {
        /// Name of the offending parameter
        parameter: &'static str,
        /// Rejected value
        value: f64,
    },
    /// Sample block cannot be analyzed
    #[error("invalid input block: {0}")]
    InvalidInputBlock(#[from] BlockDefect),
    /// Noise power is zero while [`DegeneratePolicy::Reject`] is in effect
    #[error("noise power is zero (signal power {signal_power})")]
    DegenerateRatio {
        /// Power within the signal region
        signal_power: f64,
    },
}

/// Behavior when the noise region carries no power at all
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DegeneratePolicy {
    /// Report [`SinadError::DegenerateRatio`]
    #[default]
    Reject,
    /// Report the given ceiling (in dB) instead; finite results above the
    /// ceiling are capped as well
    Saturate(f64),
}

/// Construction parameters of a [`Sinad`] estimator
///
/// [`SinadConfig::new`] reproduces the classic measurement setup: 20 Hz
/// reference window, 300 Hz to 3000 Hz passband, Hamming window, no fixed
/// block length, and rejection of a zero noise power.
#[derive(Clone, Debug, PartialEq)]
pub struct SinadConfig {
    reference_frequency: f64,
    sample_rate: f64,
    reference_bandwidth: f64,
    passband_low: f64,
    passband_high: f64,
    window: Window,
    block_len: Option<usize>,
    degenerate_policy: DegeneratePolicy,
}

impl SinadConfig {
    /// Configuration for a reference tone at `reference_frequency` in audio
    /// sampled at `sample_rate` (both in hertz)
    ///
    /// The reference frequency should lie within the passband for results
    /// to be meaningful; this is not enforced.
    pub fn new(reference_frequency: f64, sample_rate: f64) -> Self {
        Self {
            reference_frequency,
            sample_rate,
            reference_bandwidth: DEFAULT_REFERENCE_BANDWIDTH,
            passband_low: VOICE_BAND_LOW,
            passband_high: VOICE_BAND_HIGH,
            window: Window::Hamming,
            block_len: None,
            degenerate_policy: DegeneratePolicy::Reject,
        }
    }
    /// Set width of the window excluded around the reference tone
    pub fn with_reference_bandwidth(mut self, bandwidth: f64) -> Self {
        self.reference_bandwidth = bandwidth;
        self
    }
    /// Set passband edges
    pub fn with_passband(mut self, low: f64, high: f64) -> Self {
        self.passband_low = low;
        self.passband_high = high;
        self
    }
    /// Set window function
    pub fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }
    /// Require every block to have exactly `len` samples
    ///
    /// This also allows the estimator to prepare the Fourier transform and
    /// window table once instead of on every call.
    pub fn with_block_len(mut self, len: usize) -> Self {
        self.block_len = Some(len);
        self
    }
    /// Set behavior for a zero noise power
    pub fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate_policy = policy;
        self
    }
    /// Reference tone frequency in hertz
    pub fn reference_frequency(&self) -> f64 {
        self.reference_frequency
    }
    /// Sample rate in hertz
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
    /// Width of the reference window in hertz
    pub fn reference_bandwidth(&self) -> f64 {
        self.reference_bandwidth
    }
    /// Lower and upper passband edge in hertz
    pub fn passband(&self) -> (f64, f64) {
        (self.passband_low, self.passband_high)
    }
    /// Window function
    pub fn window(&self) -> Window {
        self.window
    }
    /// Required block length, if any
    pub fn block_len(&self) -> Option<usize> {
        self.block_len
    }
    /// Behavior for a zero noise power
    pub fn degenerate_policy(&self) -> DegeneratePolicy {
        self.degenerate_policy
    }
    /// Check all parameters
    pub fn validate(&self) -> Result<(), SinadError> {
        fn positive(parameter: &'static str, value: f64) -> Result<(), SinadError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SinadError::InvalidConfiguration { parameter, value })
            }
        }
        positive("reference_frequency", self.reference_frequency)?;
        positive("sample_rate", self.sample_rate)?;
        positive("reference_bandwidth", self.reference_bandwidth)?;
        positive("passband_low", self.passband_low)?;
        positive("passband_high", self.passband_high)?;
        if self.passband_high <= self.passband_low {
            return Err(SinadError::InvalidConfiguration {
                parameter: "passband_high",
                value: self.passband_high,
            });
        }
        if let Some(len) = self.block_len {
            if len == 0 {
                return Err(SinadError::InvalidConfiguration {
                    parameter: "block_len",
                    value: 0.0,
                });
            }
        }
        if let DegeneratePolicy::Saturate(ceiling) = self.degenerate_policy {
            if !(ceiling.is_finite() && ceiling >= 0.0) {
                return Err(SinadError::InvalidConfiguration {
                    parameter: "saturation_ceiling",
                    value: ceiling,
                });
            }
        }
        Ok(())
    }
    /// Bin layout for a transform of `len` samples
    pub fn bins(&self, len: usize) -> BinLayout {
        let half_width = self.reference_bandwidth / 2.0;
        BinLayout {
            low: freq_to_bin(self.passband_low, self.sample_rate, len, Rounding::Floor),
            reference_low: freq_to_bin(
                self.reference_frequency - half_width,
                self.sample_rate,
                len,
                Rounding::Floor,
            ),
            reference_high: freq_to_bin(
                self.reference_frequency + half_width,
                self.sample_rate,
                len,
                Rounding::Ceil,
            ),
            high: freq_to_bin(self.passband_high, self.sample_rate, len, Rounding::Floor),
        }
    }
}

/// Bin indices bounding the signal and noise regions
///
/// Indices are signed as returned by [`freq_to_bin`]. Ranges derived from
/// them are clamped to the transform length, and a range whose end does not
/// exceed its start is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BinLayout {
    /// First bin of the passband
    pub low: isize,
    /// First bin excluded around the reference tone
    pub reference_low: isize,
    /// Last bin excluded around the reference tone
    pub reference_high: isize,
    /// End (exclusive) of the passband
    pub high: isize,
}

fn clamped_range(start: isize, end: isize, len: usize) -> Range<usize> {
    let clamp = |idx: isize| -> usize { usize::try_from(idx).unwrap_or(0).min(len) };
    let start = clamp(start);
    let end = clamp(end).max(start);
    start..end
}

impl BinLayout {
    /// Bins integrated as signal (the whole passband)
    pub fn signal_range(&self, len: usize) -> Range<usize> {
        clamped_range(self.low, self.high, len)
    }
    /// Bins integrated as noise and distortion (the passband below and
    /// above the reference window)
    ///
    /// Both ranges lie within [`BinLayout::signal_range`], also when the
    /// reference window extends beyond the passband.
    pub fn noise_ranges(&self, len: usize) -> [Range<usize>; 2] {
        let inside = |idx: isize| idx.max(self.low).min(self.high);
        [
            clamped_range(self.low, inside(self.reference_low), len),
            clamped_range(inside(self.reference_high.saturating_add(1)), self.high, len),
        ]
    }
}

/// Result of [`Sinad::analyze`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SinadReport {
    /// Power within the signal region
    pub signal_power: f64,
    /// Power within the noise region
    pub noise_power: f64,
    /// SINAD in dB (never negative)
    pub sinad_db: f64,
    /// Bins used for the measurement
    pub bins: BinLayout,
}

/// Transform and window table prepared for a fixed block length
struct Plan<Flt>
where
    Flt: Float,
{
    fft: Arc<dyn Fft<Flt>>,
    window: Vec<Flt>,
    bins: BinLayout,
}

impl<Flt> Clone for Plan<Flt>
where
    Flt: Float,
{
    fn clone(&self) -> Self {
        Self {
            fft: self.fft.clone(),
            window: self.window.clone(),
            bins: self.bins,
        }
    }
}

/// SINAD estimator
///
/// The estimator holds no mutable state: [`Sinad::estimate`] takes `&self`,
/// identical blocks always give identical results, and an estimator may be
/// shared between threads (e.g. in an [`Arc`]) without locking.
pub struct Sinad<Flt>
where
    Flt: Float,
{
    config: SinadConfig,
    plan: Option<Plan<Flt>>,
}

impl<Flt> Clone for Sinad<Flt>
where
    Flt: Float,
{
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            plan: self.plan.clone(),
        }
    }
}

impl<Flt> fmt::Debug for Sinad<Flt>
where
    Flt: Float,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sinad")
            .field("config", &self.config)
            .field("planned", &self.plan.is_some())
            .finish()
    }
}

impl<Flt> Sinad<Flt>
where
    Flt: Float,
{
    /// Create estimator with given configuration
    ///
    /// Fails with [`SinadError::InvalidConfiguration`] if any parameter is
    /// non-finite or out of range.
    pub fn new(config: SinadConfig) -> Result<Self, SinadError> {
        config.validate()?;
        let plan = config.block_len.map(|len| Plan {
            fft: FftPlanner::<Flt>::new().plan_fft_forward(len),
            window: config.window.coefficients(len),
            bins: config.bins(len),
        });
        debug!(
            reference_frequency = config.reference_frequency,
            sample_rate = config.sample_rate,
            block_len = ?config.block_len,
            window = %config.window,
            "SINAD estimator configured"
        );
        Ok(Self { config, plan })
    }
    /// Create estimator with default settings for a reference tone at
    /// `reference_frequency` in audio sampled at `sample_rate`
    pub fn with_frequencies(reference_frequency: f64, sample_rate: f64) -> Result<Self, SinadError> {
        Self::new(SinadConfig::new(reference_frequency, sample_rate))
    }
    /// Configuration
    pub fn config(&self) -> &SinadConfig {
        &self.config
    }
    /// Calculate SINAD in dB for one block of samples
    pub fn estimate(&self, samples: &[Flt]) -> Result<f64, SinadError> {
        self.analyze(samples).map(|report| report.sinad_db)
    }
    /// Calculate SINAD and report the underlying powers
    pub fn analyze(&self, samples: &[Flt]) -> Result<SinadReport, SinadError> {
        let n = samples.len();
        if n == 0 {
            return Err(BlockDefect::Empty.into());
        }
        if let Some(expected) = self.config.block_len {
            if n != expected {
                return Err(BlockDefect::LengthMismatch {
                    expected,
                    actual: n,
                }
                .into());
            }
        }
        if let Some(index) = first_non_finite(samples) {
            return Err(BlockDefect::NonFinite { index }.into());
        }
        let (fft, bins, mut spectrum): (_, _, Vec<Complex<Flt>>) = match &self.plan {
            Some(plan) => (
                plan.fft.clone(),
                plan.bins,
                samples
                    .iter()
                    .zip(plan.window.iter())
                    .map(|(&sample, &w)| Complex::new(sample * w, Flt::zero()))
                    .collect(),
            ),
            None => {
                let mut tapered = samples.to_vec();
                self.config.window.apply(&mut tapered);
                (
                    FftPlanner::<Flt>::new().plan_fft_forward(n),
                    self.config.bins(n),
                    tapered
                        .into_iter()
                        .map(|sample| Complex::new(sample, Flt::zero()))
                        .collect(),
                )
            }
        };
        fft.process(&mut spectrum);
        let signal_power = energy(&spectrum[bins.signal_range(n)]);
        let noise_power: f64 = bins
            .noise_ranges(n)
            .into_iter()
            .map(|range| energy(&spectrum[range]))
            .sum();
        if !(signal_power.is_finite() && noise_power.is_finite()) {
            return Err(BlockDefect::Overflow.into());
        }
        let sinad_db = self.ratio_db(signal_power, noise_power)?;
        trace!(signal_power, noise_power, sinad_db, "block analyzed");
        Ok(SinadReport {
            signal_power,
            noise_power,
            sinad_db,
            bins,
        })
    }
    fn ratio_db(&self, signal_power: f64, noise_power: f64) -> Result<f64, SinadError> {
        if noise_power <= 0.0 {
            return match self.config.degenerate_policy {
                DegeneratePolicy::Reject => Err(SinadError::DegenerateRatio { signal_power }),
                DegeneratePolicy::Saturate(ceiling) => Ok(ceiling),
            };
        }
        let db = power_ratio_db(signal_power, noise_power);
        // covers 0/x, whose logarithm is negative infinity
        let db = if db < 0.0 { 0.0 } else { db };
        Ok(match self.config.degenerate_policy {
            DegeneratePolicy::Reject => db,
            DegeneratePolicy::Saturate(ceiling) => db.min(ceiling),
        })
    }
}
