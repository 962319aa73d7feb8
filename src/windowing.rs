//! Window functions

use crate::flt;
use crate::numbers::*;

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Window function applied to a block before the Fourier transform
///
/// Values are defined on `x` ranging from `-1.0` (first sample) to `1.0`
/// (last sample), so every window is symmetric and has its peak (`1.0`) in
/// the middle of the block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Window {
    /// No tapering
    Rectangular,
    /// Hamming window (raised cosine on a pedestal of `0.08`)
    #[default]
    Hamming,
    /// Hann window (raised cosine reaching zero at the edges)
    Hann,
    /// Blackman window
    Blackman,
}

impl Window {
    /// Get value at position `x` (where `x` ranges from `-1.0` to `1.0`)
    pub fn relative_value_at(&self, x: f64) -> f64 {
        let t = PI * x;
        match self {
            Window::Rectangular => 1.0,
            Window::Hamming => 0.54 + 0.46 * t.cos(),
            Window::Hann => 0.5 + 0.5 * t.cos(),
            Window::Blackman => 0.42 + 0.5 * t.cos() + 0.08 * (2.0 * t).cos(),
        }
    }
    /// Symmetric window table of length `len`
    ///
    /// The first and last entries sit at `x = -1.0` and `x = 1.0`,
    /// respectively. A table of length `1` contains the center value only.
    pub fn coefficients<Flt: Float>(&self, len: usize) -> Vec<Flt> {
        match len {
            0 => return Vec::new(),
            1 => return vec![flt!(self.relative_value_at(0.0))],
            _ => (),
        }
        let denom = (len - 1) as f64;
        (0..len)
            .map(|idx| flt!(self.relative_value_at(2.0 * idx as f64 / denom - 1.0)))
            .collect()
    }
    /// Multiply `samples` element-wise with the window
    pub fn apply<Flt: Float>(&self, samples: &mut [Flt]) {
        if *self == Window::Rectangular {
            return;
        }
        let coefficients = self.coefficients::<Flt>(samples.len());
        for (sample, w) in samples.iter_mut().zip(coefficients) {
            *sample *= w;
        }
    }
    /// Name as accepted by [`FromStr`]
    pub fn name(&self) -> &'static str {
        match self {
            Window::Rectangular => "rectangular",
            Window::Hamming => "hamming",
            Window::Hann => "hann",
            Window::Blackman => "blackman",
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown window name
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown window function: {0}")]
pub struct UnknownWindow(pub String);

impl FromStr for Window {
    type Err = UnknownWindow;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rectangular" | "rect" | "none" => Ok(Window::Rectangular),
            "hamming" => Ok(Window::Hamming),
            "hann" | "hanning" => Ok(Window::Hann),
            "blackman" => Ok(Window::Blackman),
            _ => Err(UnknownWindow(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::assert_approx;
    #[test]
    fn test_hamming_classic_formula() {
        let n = 11;
        let table: Vec<f64> = Window::Hamming.coefficients(n);
        for (idx, &value) in table.iter().enumerate() {
            let expected = 0.54 - 0.46 * (2.0 * PI * idx as f64 / (n - 1) as f64).cos();
            assert_approx(value, expected);
        }
        assert_approx(table[0], 0.08);
        assert_approx(table[5], 1.0);
        assert_approx(table[10], 0.08);
    }
    #[test]
    fn test_symmetry() {
        for window in [Window::Hamming, Window::Hann, Window::Blackman] {
            let table: Vec<f64> = window.coefficients(8);
            for idx in 0..8 {
                assert_approx(table[idx], table[7 - idx]);
            }
        }
    }
    #[test]
    fn test_edges() {
        assert_approx(Window::Hann.relative_value_at(-1.0), 0.0);
        assert_approx(Window::Blackman.relative_value_at(1.0), 0.0);
        assert_approx(Window::Rectangular.relative_value_at(0.3), 1.0);
    }
    #[test]
    fn test_single_coefficient() {
        let table = Window::Hamming.coefficients::<f32>(1);
        assert_eq!(table.len(), 1);
        assert_approx(table[0] as f64, 1.0);
        assert!(Window::Hamming.coefficients::<f32>(0).is_empty());
    }
    #[test]
    fn test_apply() {
        let mut samples = vec![2.0f64; 3];
        Window::Hamming.apply(&mut samples);
        assert_approx(samples[0], 0.16);
        assert_approx(samples[1], 2.0);
        assert_approx(samples[2], 0.16);
        let mut untouched = vec![2.0f64; 3];
        Window::Rectangular.apply(&mut untouched);
        assert_eq!(untouched, vec![2.0; 3]);
        let mut nothing: Vec<f32> = Vec::new();
        Window::Blackman.apply(&mut nothing);
        assert!(nothing.is_empty());
    }
    #[test]
    fn test_parse() {
        assert_eq!("Hamming".parse::<Window>(), Ok(Window::Hamming));
        assert_eq!("hanning".parse::<Window>(), Ok(Window::Hann));
        assert_eq!("none".parse::<Window>(), Ok(Window::Rectangular));
        assert_eq!(
            "kaiser".parse::<Window>(),
            Err(UnknownWindow("kaiser".to_string()))
        );
        assert_eq!(Window::Blackman.to_string(), "blackman");
    }
}
