//! Test signal sources
//!
//! A reference tone with optional additive white Gaussian noise is the
//! classic stimulus for a SINAD measurement. Both sources here are
//! reproducible: a [`Tone`] keeps its phase across calls and
//! [`GaussianNoise`] is fully determined by its seed.

use crate::math::amplitude_from_db;

use std::f64::consts::TAU;

/// Sinusoid with continuous phase
#[derive(Clone, Debug)]
pub struct Tone {
    frequency: f64,
    amplitude: f64,
    phase: f64,
}

impl Tone {
    /// Tone with given `frequency` (in hertz) and peak `amplitude`
    pub fn new(frequency: f64, amplitude: f64) -> Self {
        Self {
            frequency,
            amplitude,
            phase: 0.0,
        }
    }
    /// Tone with given `frequency` and level in dB relative to full scale
    pub fn with_level_db(frequency: f64, level_db: f64) -> Self {
        Self::new(frequency, amplitude_from_db(level_db))
    }
    /// Frequency in hertz
    pub fn frequency(&self) -> f64 {
        self.frequency
    }
    /// Peak amplitude
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }
    /// Produce the next `len` samples at `sample_rate`
    pub fn generate(&mut self, sample_rate: f64, len: usize) -> Vec<f64> {
        let step = TAU * self.frequency / sample_rate;
        let mut output = Vec::with_capacity(len);
        for _ in 0..len {
            output.push(self.amplitude * self.phase.sin());
            self.phase = (self.phase + step) % TAU;
        }
        output
    }
}

const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// White Gaussian noise from a seeded xorshift64* generator
#[derive(Clone, Debug)]
pub struct GaussianNoise {
    state: u64,
    std_dev: f64,
    spare: Option<f64>,
}

impl GaussianNoise {
    /// Noise with given standard deviation
    ///
    /// Equal seeds produce equal sequences.
    pub fn new(seed: u64, std_dev: f64) -> Self {
        let state = match seed ^ SEED_MIX {
            0 => SEED_MIX,
            mixed => mixed,
        };
        Self {
            state,
            std_dev,
            spare: None,
        }
    }
    /// Noise with RMS level in dB relative to full scale (`1.0`)
    pub fn with_level_db(seed: u64, level_db: f64) -> Self {
        Self::new(seed, amplitude_from_db(level_db))
    }
    /// Standard deviation
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }
    /// Uniform in `(0, 1]`
    fn next_uniform(&mut self) -> f64 {
        ((self.next_u64() >> 11) as f64 + 1.0) / (1u64 << 53) as f64
    }
    /// Next sample
    pub fn sample(&mut self) -> f64 {
        if let Some(spare) = self.spare.take() {
            return spare * self.std_dev;
        }
        // Box-Muller
        let radius = (-2.0 * self.next_uniform().ln()).sqrt();
        let angle = TAU * self.next_uniform();
        self.spare = Some(radius * angle.sin());
        radius * angle.cos() * self.std_dev
    }
    /// Produce the next `len` samples
    pub fn generate(&mut self, len: usize) -> Vec<f64> {
        (0..len).map(|_| self.sample()).collect()
    }
}
