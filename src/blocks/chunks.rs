//! Reorganizing chunks

use crate::samples::*;

use tracing::debug;

/// Regroups [`Samples`] with arbitrary chunk lengths into `Samples` with a
/// fixed chunk length
///
/// Samples that do not fill a complete chunk yet are kept until the next
/// call to [`Rechunker::push`]. If the sample rate changes, the incomplete
/// chunk is discarded, as it would otherwise mix audio of different rates.
#[derive(Clone, Debug)]
pub struct Rechunker<T> {
    chunk_len: usize,
    sample_rate: Option<f64>,
    patchwork: Vec<T>,
}

impl<T> Rechunker<T>
where
    T: Clone,
{
    /// Create new `Rechunker` with given output chunk length
    pub fn new(chunk_len: usize) -> Self {
        assert!(chunk_len > 0, "chunk length must be positive");
        Self {
            chunk_len,
            sample_rate: None,
            patchwork: Vec::with_capacity(chunk_len),
        }
    }
    /// Output chunk length
    pub fn chunk_len(&self) -> usize {
        self.chunk_len
    }
    /// Change output chunk length
    ///
    /// Pending samples are kept and become part of the next chunk(s).
    pub fn set_chunk_len(&mut self, chunk_len: usize) {
        assert!(chunk_len > 0, "chunk length must be positive");
        self.chunk_len = chunk_len;
    }
    /// Number of samples waiting for the chunk to be completed
    pub fn pending(&self) -> usize {
        self.patchwork.len()
    }
    /// Discard pending samples
    pub fn reset(&mut self) {
        self.patchwork.clear();
        self.sample_rate = None;
    }
    /// Append `samples` and return all chunks completed thereby
    pub fn push(&mut self, samples: Samples<T>) -> Vec<Samples<T>> {
        if let Some(sample_rate) = self.sample_rate {
            if sample_rate != samples.sample_rate && !self.patchwork.is_empty() {
                debug!(
                    discarded = self.patchwork.len(),
                    old_rate = sample_rate,
                    new_rate = samples.sample_rate,
                    "sample rate changed, discarding incomplete chunk"
                );
                self.patchwork.clear();
            }
        }
        self.sample_rate = Some(samples.sample_rate);
        let mut output = Vec::new();
        let mut input: &[T] = &samples.chunk;
        while !input.is_empty() {
            let missing = self.chunk_len.saturating_sub(self.patchwork.len());
            let take = missing.min(input.len());
            self.patchwork.extend_from_slice(&input[..take]);
            input = &input[take..];
            while self.patchwork.len() >= self.chunk_len {
                let rest = self.patchwork.split_off(self.chunk_len);
                let chunk = std::mem::replace(&mut self.patchwork, rest);
                output.push(Samples::new(samples.sample_rate, chunk));
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_exact_chunks() {
        let mut rechunker = Rechunker::new(3);
        let out = rechunker.push(Samples::new(10.0, vec![1, 2, 3, 4, 5, 6]));
        assert_eq!(
            out,
            vec![
                Samples::new(10.0, vec![1, 2, 3]),
                Samples::new(10.0, vec![4, 5, 6])
            ]
        );
        assert_eq!(rechunker.pending(), 0);
    }
    #[test]
    fn test_patchwork() {
        let mut rechunker = Rechunker::new(4);
        assert!(rechunker.push(Samples::new(10.0, vec![1, 2])).is_empty());
        assert_eq!(rechunker.pending(), 2);
        let out = rechunker.push(Samples::new(10.0, vec![3, 4, 5]));
        assert_eq!(out, vec![Samples::new(10.0, vec![1, 2, 3, 4])]);
        assert_eq!(rechunker.pending(), 1);
        let out = rechunker.push(Samples::new(10.0, vec![6, 7, 8, 9, 10, 11, 12]));
        assert_eq!(
            out,
            vec![
                Samples::new(10.0, vec![5, 6, 7, 8]),
                Samples::new(10.0, vec![9, 10, 11, 12])
            ]
        );
    }
    #[test]
    fn test_rate_change_discards() {
        let mut rechunker = Rechunker::new(3);
        assert!(rechunker.push(Samples::new(10.0, vec![1, 2])).is_empty());
        let out = rechunker.push(Samples::new(20.0, vec![3, 4, 5]));
        assert_eq!(out, vec![Samples::new(20.0, vec![3, 4, 5])]);
    }
    #[test]
    fn test_shrink_chunk_len() {
        let mut rechunker = Rechunker::new(4);
        assert!(rechunker.push(Samples::new(10.0, vec![1, 2, 3])).is_empty());
        rechunker.set_chunk_len(2);
        let out = rechunker.push(Samples::new(10.0, vec![4]));
        assert_eq!(
            out,
            vec![Samples::new(10.0, vec![1, 2]), Samples::new(10.0, vec![3, 4])]
        );
        assert_eq!(rechunker.chunk_len(), 2);
    }
    #[test]
    fn test_reset() {
        let mut rechunker = Rechunker::new(3);
        rechunker.push(Samples::new(10.0, vec![1.0, 2.0]));
        rechunker.reset();
        assert_eq!(rechunker.pending(), 0);
        let out = rechunker.push(Samples::new(10.0, vec![3.0, 4.0, 5.0]));
        assert_eq!(out, vec![Samples::new(10.0, vec![3.0, 4.0, 5.0])]);
    }
    #[test]
    #[should_panic]
    fn test_zero_chunk_len() {
        Rechunker::<f32>::new(0);
    }
}
