//! Raw audio input

use crate::samples::Samples;

use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::debug;

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Byte order of raw samples
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ByteOrder {
    /// Least significant byte first
    #[default]
    LittleEndian,
    /// Most significant byte first
    BigEndian,
}

impl ByteOrder {
    fn decode(self, bytes: [u8; 4]) -> f32 {
        match self {
            ByteOrder::LittleEndian => f32::from_le_bytes(bytes),
            ByteOrder::BigEndian => f32::from_be_bytes(bytes),
        }
    }
}

/// Read until `buf` is full or the end of the stream is reached
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

/// Block which reads single precision float mono samples from a
/// [reader][Read] and forwards them as [`Samples`]
///
/// Reading happens on a blocking task (see [`spawn_blocking`]), so that the
/// reader may be a pipe or terminal. An incomplete trailing sample (fewer
/// than four bytes) at the end of the stream is ignored.
pub struct F32Reader {
    join_handle: JoinHandle<io::Result<u64>>,
}

impl F32Reader {
    /// Start reading from `reader`, sending chunks of `chunk_len` samples
    /// (the last one may be shorter) recorded at `sample_rate` into `output`
    ///
    /// Reading stops early when the receiving side of `output` is dropped.
    /// Panics if `chunk_len` is zero or its size in bytes overflows.
    pub fn new<R>(
        mut reader: R,
        byte_order: ByteOrder,
        sample_rate: f64,
        chunk_len: usize,
        output: mpsc::Sender<Samples<f32>>,
    ) -> Self
    where
        R: Read + Send + 'static,
    {
        assert!(chunk_len > 0, "chunk length must be positive");
        let byte_len = chunk_len.checked_mul(4).expect("chunk length too large");
        let join_handle = spawn_blocking(move || {
            let mut bytes = vec![0u8; byte_len];
            let mut total: u64 = 0;
            loop {
                let filled = fill(&mut reader, &mut bytes)?;
                let chunk: Vec<f32> = bytes[..filled - filled % 4]
                    .chunks_exact(4)
                    .map(|sample| byte_order.decode([sample[0], sample[1], sample[2], sample[3]]))
                    .collect();
                if !chunk.is_empty() {
                    total += chunk.len() as u64;
                    if output.blocking_send(Samples::new(sample_rate, chunk)).is_err() {
                        debug!(samples = total, "receiver dropped, stop reading");
                        return Ok(total);
                    }
                }
                if filled < bytes.len() {
                    debug!(samples = total, "end of raw input");
                    return Ok(total);
                }
            }
        });
        Self { join_handle }
    }
    /// Start reading all samples from a file
    pub fn with_path<P: AsRef<Path>>(
        path: P,
        byte_order: ByteOrder,
        sample_rate: f64,
        chunk_len: usize,
        output: mpsc::Sender<Samples<f32>>,
    ) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(
            BufReader::new(file),
            byte_order,
            sample_rate,
            chunk_len,
            output,
        ))
    }
    /// Wait for the input to be exhausted and return the number of samples
    /// read
    pub async fn wait(self) -> io::Result<u64> {
        self.join_handle.await.expect("task panicked")
    }
}
