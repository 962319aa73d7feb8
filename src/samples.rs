//! Sample data type
//!
//! See [`Samples`].

/// A chunk of samples with a specified sample rate
///
/// Passing this data structure between [blocks] allows each block to be
/// aware of the current sample rate, e.g. for detecting that the audio was
/// produced at a rate different from the one an estimator was configured
/// for.
///
/// [blocks]: crate::blocks
#[derive(Clone, Debug, PartialEq)]
pub struct Samples<T> {
    /// Sample rate
    pub sample_rate: f64,
    /// Sample data
    pub chunk: Vec<T>,
}

impl<T> Samples<T> {
    /// Wrap `chunk` recorded at `sample_rate`
    pub fn new(sample_rate: f64, chunk: Vec<T>) -> Self {
        Self { sample_rate, chunk }
    }
    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.chunk.len() as f64 / self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::assert_approx;
    #[test]
    fn test_duration() {
        assert_approx(Samples::new(48000.0, vec![0.0f32; 1000]).duration(), 1.0 / 48.0);
        assert_eq!(Samples::<f64>::new(8000.0, vec![]).duration(), 0.0);
    }
}
