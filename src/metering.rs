//! Metering (level and spectral energy measurement)

use crate::math::power_ratio_db;
use crate::numbers::*;

/// Calculate mean square of real valued samples
///
/// Returns `0.0` for an empty slice.
///
/// # Example
///
/// ```
/// use radiosinad::metering::level;
///
/// let chunk = vec![0.0, -0.5, 1.0];
///
/// assert!((level(&chunk) - 0.41666667).abs() < 0.001);
/// ```
pub fn level<Flt>(chunk: &[Flt]) -> f64
where
    Flt: Float,
{
    if chunk.is_empty() {
        return 0.0;
    }
    let mut square_sum: f64 = 0.0;
    for &sample in chunk.iter() {
        let value = widen(sample);
        square_sum += value * value;
    }
    square_sum / chunk.len() as f64
}

/// Level in dB relative to a full scale sine wave of amplitude `1.0`
///
/// Silence yields negative infinity.
pub fn level_db<Flt>(chunk: &[Flt]) -> f64
where
    Flt: Float,
{
    power_ratio_db(level(chunk), 0.5)
}

/// Sum of squared magnitudes of Fourier transformed samples
///
/// Note: The data (`bins`) must be already in Fourier transformed form. The
/// sum is accumulated in double precision regardless of `Flt`.
pub fn energy<Flt>(bins: &[Complex<Flt>]) -> f64
where
    Flt: Float,
{
    bins.iter().map(|bin| widen(bin.norm_sqr())).sum()
}
