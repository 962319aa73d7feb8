//! Mathematic functions helpful for spectral measurements

/// Rounding mode used when mapping a frequency onto a bin index
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    /// Round towards negative infinity
    Floor,
    /// Round towards positive infinity
    Ceil,
}

/// Map `frequency` onto the index of a Fourier bin of a transform with
/// `len` bins
///
/// The index is `round(frequency / sample_rate * len) - 1`, where `round` is
/// selected by `rounding`. Note the offset of `-1`: the result may be
/// negative for frequencies below the first bin. Positions beyond the
/// range of [`isize`] saturate.
///
/// # Example
///
/// ```
/// use radiosinad::math::{freq_to_bin, Rounding};
///
/// assert_eq!(freq_to_bin(300.0, 48000.0, 1000, Rounding::Floor), 5);
/// assert_eq!(freq_to_bin(1010.0, 48000.0, 1000, Rounding::Ceil), 21);
/// ```
pub fn freq_to_bin(frequency: f64, sample_rate: f64, len: usize, rounding: Rounding) -> isize {
    let position = frequency / sample_rate * len as f64;
    let rounded = match rounding {
        Rounding::Floor => position.floor(),
        Rounding::Ceil => position.ceil(),
    };
    (rounded as isize).saturating_sub(1)
}

/// Ratio of two powers in decibels
pub fn power_ratio_db(numerator: f64, denominator: f64) -> f64 {
    10.0 * (numerator / denominator).log10()
}

/// Convert decibels (relative to full scale) to a linear amplitude
pub fn amplitude_from_db(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::assert_approx;
    #[test]
    fn test_freq_to_bin_rounding() {
        assert_eq!(freq_to_bin(990.0, 48000.0, 1000, Rounding::Floor), 19);
        assert_eq!(freq_to_bin(990.0, 48000.0, 1000, Rounding::Ceil), 20);
        assert_eq!(freq_to_bin(1010.0, 48000.0, 1000, Rounding::Floor), 20);
        assert_eq!(freq_to_bin(3000.0, 48000.0, 1000, Rounding::Floor), 61);
    }
    #[test]
    fn test_freq_to_bin_exact_multiple() {
        // 3000 Hz is exactly bin 64 of 1024 at 48 kHz
        assert_eq!(freq_to_bin(3000.0, 48000.0, 1024, Rounding::Floor), 63);
        assert_eq!(freq_to_bin(3000.0, 48000.0, 1024, Rounding::Ceil), 63);
    }
    #[test]
    fn test_freq_to_bin_negative() {
        assert_eq!(freq_to_bin(300.0, 48000.0, 16, Rounding::Floor), -1);
        assert_eq!(freq_to_bin(0.0, 48000.0, 1000, Rounding::Ceil), -1);
    }
    #[test]
    fn test_freq_to_bin_saturates() {
        assert_eq!(
            freq_to_bin(-5e299, 48000.0, 1000, Rounding::Floor),
            isize::MIN
        );
        assert_eq!(
            freq_to_bin(5e299, 48000.0, 1000, Rounding::Ceil),
            isize::MAX - 1
        );
    }
    #[test]
    fn test_power_ratio_db() {
        assert_approx(power_ratio_db(100.0, 1.0), 20.0);
        assert_approx(power_ratio_db(2.0, 2.0), 0.0);
        assert_approx(power_ratio_db(1.0, 1000.0), -30.0);
        assert_eq!(power_ratio_db(1.0, 0.0), f64::INFINITY);
    }
    #[test]
    fn test_amplitude_from_db() {
        assert_approx(amplitude_from_db(0.0), 1.0);
        assert_approx(amplitude_from_db(-20.0), 0.1);
        assert!((amplitude_from_db(-4.77) - 0.577431).abs() < 1e-6);
    }
}
